//! COCO JSON annotation reader.
//!
//! Only the parts of the COCO schema that feed a detection record are
//! modelled: `images`, `categories` and `annotations`. Everything else
//! (`info`, `licenses`, `segmentation`, `area`, `iscrowd`, ...) is accepted
//! and ignored.
//!
//! # COCO Format Reference
//!
//! COCO bounding boxes use `[x, y, width, height]` where `(x, y)` is the
//! top-left corner in absolute pixel coordinates.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::model::{Annotation, AnnotationSet, Category, Image};
use super::{AnnotationId, BBoxXYWH, CategoryId, ImageId, Pixel};
use crate::error::ConvertError;

// ============================================================================
// COCO Schema Types (internal to this module)
// ============================================================================

#[derive(Debug, Deserialize)]
struct CocoDataset {
    images: Vec<CocoImage>,

    #[serde(default)]
    annotations: Vec<CocoAnnotation>,

    categories: Vec<CocoCategory>,
}

#[derive(Debug, Deserialize)]
struct CocoImage {
    id: u64,
    width: u32,
    height: u32,
    file_name: String,
}

#[derive(Debug, Deserialize)]
struct CocoCategory {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CocoAnnotation {
    id: u64,
    image_id: u64,
    category_id: u64,
    bbox: BBoxXYWH<Pixel>,
}

// ============================================================================
// Public API
// ============================================================================

/// Reads an annotation set from a COCO JSON file.
///
/// # Errors
/// [`ConvertError::AnnotationParse`] if the file is missing, unreadable or
/// not COCO-shaped JSON; [`ConvertError::AnnotationInvalid`] if ids repeat
/// within a table.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use geococo2tfrecord::ir::io_coco_json::read_coco_json;
///
/// let set = read_coco_json(Path::new("annotations/geococo.json"))?;
/// println!("{} images", set.images().len());
/// # Ok::<(), geococo2tfrecord::ConvertError>(())
/// ```
pub fn read_coco_json(path: &Path) -> Result<AnnotationSet, ConvertError> {
    let parse_err = |source: serde_json::Error| ConvertError::AnnotationParse {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| parse_err(serde_json::Error::io(e)))?;
    let reader = BufReader::new(file);
    let coco: CocoDataset = serde_json::from_reader(reader).map_err(parse_err)?;

    coco_to_set(coco, path)
}

/// Reads an annotation set from a COCO JSON string.
///
/// Useful for testing without file I/O.
pub fn from_coco_str(json: &str) -> Result<AnnotationSet, ConvertError> {
    from_coco_slice(json.as_bytes())
}

/// Reads an annotation set from COCO JSON bytes.
///
/// Useful for fuzzing.
pub fn from_coco_slice(bytes: &[u8]) -> Result<AnnotationSet, ConvertError> {
    let dummy_path = Path::new("<bytes>");
    let coco: CocoDataset =
        serde_json::from_slice(bytes).map_err(|source| ConvertError::AnnotationParse {
            path: dummy_path.to_path_buf(),
            source,
        })?;

    coco_to_set(coco, dummy_path)
}

// ============================================================================
// Conversion: COCO -> AnnotationSet
// ============================================================================

fn coco_to_set(coco: CocoDataset, path: &Path) -> Result<AnnotationSet, ConvertError> {
    let images = coco
        .images
        .into_iter()
        .map(|img| Image::new(ImageId::new(img.id), img.file_name, img.width, img.height))
        .collect();

    let categories = coco
        .categories
        .into_iter()
        .map(|cat| Category::new(CategoryId::new(cat.id), cat.name))
        .collect();

    let annotations = coco
        .annotations
        .into_iter()
        .map(|ann| {
            Annotation::new(
                AnnotationId::new(ann.id),
                ImageId::new(ann.image_id),
                CategoryId::new(ann.category_id),
                ann.bbox,
            )
        })
        .collect();

    AnnotationSet::new(images, categories, annotations).map_err(|duplicate| {
        ConvertError::AnnotationInvalid {
            path: path.to_path_buf(),
            message: duplicate.to_string(),
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
