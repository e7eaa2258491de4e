#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use geococo2tfrecord::tfrecord::{decode_example, read_tfrecord_file, Example};
use geococo2tfrecord::ConvertConfig;
use serde_json::{json, Value};
use tempfile::TempDir;

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

/// A dataset root in a temp dir with `images/`, `preview/` and
/// `annotations/` created.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        for sub in ["images", "preview", "annotations"] {
            fs::create_dir_all(dir.path().join(sub)).expect("create dataset dir");
        }
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root().join("images")
    }

    pub fn preview_dir(&self) -> PathBuf {
        self.root().join("preview")
    }

    pub fn train_path(&self) -> PathBuf {
        self.root().join("train.record")
    }

    pub fn valid_path(&self) -> PathBuf {
        self.root().join("valid.record")
    }

    pub fn write_annotations(&self, coco: &Value) {
        fs::write(
            self.root().join("annotations/geococo.json"),
            serde_json::to_vec_pretty(coco).expect("serialize coco"),
        )
        .expect("write annotations");
    }

    /// Writes a BMP of the given size into `images/`.
    pub fn add_image(&self, name: &str, width: u32, height: u32) {
        fs::write(self.images_dir().join(name), bmp_bytes(width, height)).expect("write image");
    }

    /// Marks `name` as kept by writing a copy into `preview/`.
    pub fn add_preview(&self, name: &str, width: u32, height: u32) {
        fs::write(self.preview_dir().join(name), bmp_bytes(width, height))
            .expect("write preview");
    }

    /// Adds the image to both `images/` and `preview/`.
    pub fn add_kept(&self, name: &str, width: u32, height: u32) {
        self.add_image(name, width, height);
        self.add_preview(name, width, height);
    }

    pub fn config(&self) -> ConvertConfig {
        ConvertConfig::from_root(self.root(), self.train_path(), self.valid_path())
    }
}

/// COCO document with categories `1: building` and `2: road`.
///
/// `images` are `(id, file_name, width, height)`, annotations are
/// `(id, image_id, category_id, [x, y, w, h])`.
pub fn coco_json(images: &[(u64, &str, u32, u32)], annotations: &[(u64, u64, u64, [f64; 4])]) -> Value {
    json!({
        "info": {"description": "fixture"},
        "images": images
            .iter()
            .map(|(id, name, w, h)| json!({"id": id, "file_name": name, "width": w, "height": h}))
            .collect::<Vec<_>>(),
        "categories": [
            {"id": 1, "name": "building"},
            {"id": 2, "name": "road"}
        ],
        "annotations": annotations
            .iter()
            .map(|(id, image_id, category_id, bbox)| json!({
                "id": id,
                "image_id": image_id,
                "category_id": category_id,
                "bbox": bbox,
                "iscrowd": 0
            }))
            .collect::<Vec<_>>(),
    })
}

pub fn read_examples(path: &Path) -> Vec<Example> {
    read_tfrecord_file(path)
        .expect("read tfrecord")
        .iter()
        .map(|bytes| decode_example(bytes).expect("decode example"))
        .collect()
}

pub fn int64s(example: &Example, key: &str) -> Vec<i64> {
    example
        .get(key)
        .and_then(|f| f.as_int64_list())
        .unwrap_or_else(|| panic!("missing int64 feature {key}"))
        .to_vec()
}

pub fn floats(example: &Example, key: &str) -> Vec<f32> {
    example
        .get(key)
        .and_then(|f| f.as_float_list())
        .unwrap_or_else(|| panic!("missing float feature {key}"))
        .to_vec()
}

pub fn bytes_list(example: &Example, key: &str) -> Vec<Vec<u8>> {
    example
        .get(key)
        .and_then(|f| f.as_bytes_list())
        .unwrap_or_else(|| panic!("missing bytes feature {key}"))
        .to_vec()
}
