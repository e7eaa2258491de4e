//! The conversion run: COCO + images in, two TFRecord files out.
//!
//! Everything is loaded and built before anything is written, because the
//! train/validation boundary depends on how many images survive filtering.

mod report;

use std::fs;
use std::path::{Path, PathBuf};

pub use report::ConvertReport;

use crate::error::ConvertError;
use crate::filter;
use crate::ir::io_coco_json::read_coco_json;
use crate::ir::{Annotation, AnnotationSet, Image};
use crate::record::{build_record, ImageRecord};
use crate::split::{self, DEFAULT_TRAIN_RATIO};
use crate::tfrecord::{encode_record, write_tfrecord_file};

/// Directory under the dataset root holding the source images.
pub const IMAGES_DIR: &str = "images";
/// Directory under the dataset root holding the reviewed images.
pub const PREVIEW_DIR: &str = "preview";
/// Annotation file, relative to the dataset root.
pub const ANNOTATIONS_FILE: &str = "annotations/geococo.json";

/// Settings for one conversion run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertConfig {
    /// Dataset root containing `images/`, `preview/` and the annotation file.
    pub label_input: PathBuf,
    pub train_path: PathBuf,
    pub valid_path: PathBuf,
    /// Fraction of records that go to the training file.
    pub split_ratio: f64,
    /// Shuffle image order with this seed before building records.
    pub shuffle_seed: Option<u64>,
    /// Delete images that are not in `preview/` after building records.
    pub prune: bool,
}

impl ConvertConfig {
    /// Config with the tool's defaults: 80/20 split, file order, pruning on.
    pub fn from_root(
        label_input: impl Into<PathBuf>,
        train_path: impl Into<PathBuf>,
        valid_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            label_input: label_input.into(),
            train_path: train_path.into(),
            valid_path: valid_path.into(),
            split_ratio: DEFAULT_TRAIN_RATIO,
            shuffle_seed: None,
            prune: true,
        }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.label_input.join(IMAGES_DIR)
    }

    pub fn preview_dir(&self) -> PathBuf {
        self.label_input.join(PREVIEW_DIR)
    }

    pub fn annotations_path(&self) -> PathBuf {
        self.label_input.join(ANNOTATIONS_FILE)
    }

    /// Checks the dataset directories and the split parameters.
    ///
    /// The annotation file is not checked here; a missing file surfaces as
    /// [`ConvertError::AnnotationParse`] from the reader.
    pub fn validate(&self) -> Result<(), ConvertError> {
        let invalid = |message: String| -> Result<(), ConvertError> {
            Err(ConvertError::InvalidConfig { message })
        };

        if !self.label_input.is_dir() {
            return invalid(format!(
                "label input '{}' is not a directory",
                self.label_input.display()
            ));
        }
        for dir in [self.images_dir(), self.preview_dir()] {
            if !dir.is_dir() {
                return invalid(format!("missing directory '{}'", dir.display()));
            }
        }
        if !(0.0..=1.0).contains(&self.split_ratio) {
            return invalid(format!(
                "split ratio must be in [0.0, 1.0], got {}",
                self.split_ratio
            ));
        }
        if output_key(&self.train_path) == output_key(&self.valid_path) {
            return invalid(format!(
                "train and validation outputs are the same file '{}'",
                self.train_path.display()
            ));
        }
        Ok(())
    }
}

/// Identity of an output path for the same-file check: made absolute,
/// lexically cleaned, and with an existing parent directory resolved through
/// symlinks. `out/a.record` and `./out/a.record` map to the same key.
fn output_key(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let resolved = match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent).ok().map(|dir| dir.join(name)),
        _ => None,
    };
    resolved.unwrap_or(absolute)
}

/// Runs the whole conversion described by `config`.
///
/// # Errors
/// Any error aborts the run. Annotation and prune errors happen before
/// either output file is created. Unreadable images are not errors; they
/// are logged and counted in [`ConvertReport::unreadable`].
pub fn run_pipeline(config: &ConvertConfig) -> Result<ConvertReport, ConvertError> {
    config.validate()?;

    let annotations = read_coco_json(&config.annotations_path())?;
    log::info!(
        "loaded {} images, {} categories, {} annotations from {}",
        annotations.images().len(),
        annotations.categories().len(),
        annotations.annotations().len(),
        config.annotations_path().display()
    );

    let mut report = ConvertReport {
        images: annotations.images().len(),
        ..Default::default()
    };

    let records = build_records(config, &annotations, &mut report)?;
    report.records = records.len();
    report.annotations = records.iter().map(|r| r.boxes.len()).sum();

    if config.prune {
        let removed = filter::prune(&config.images_dir(), &config.preview_dir(), &annotations)?;
        log::info!("pruned {} image(s) not present in preview", removed.len());
        report.pruned = removed.len();
    }

    let (train, validation) = split::split(records, config.split_ratio);

    report.train = write_records(&config.train_path, &train)?;
    log::info!(
        "wrote {} training records to {}",
        report.train,
        config.train_path.display()
    );

    report.validation = write_records(&config.valid_path, &validation)?;
    log::info!(
        "wrote {} validation records to {}",
        report.validation,
        config.valid_path.display()
    );

    Ok(report)
}

/// Builds a record for every eligible, readable image, in image order.
fn build_records(
    config: &ConvertConfig,
    annotations: &AnnotationSet,
    report: &mut ConvertReport,
) -> Result<Vec<ImageRecord>, ConvertError> {
    let images_dir = config.images_dir();
    let preview_dir = config.preview_dir();

    let mut image_ids = annotations.image_ids();
    if let Some(seed) = config.shuffle_seed {
        split::shuffle_seeded(&mut image_ids, seed);
    }
    let category_ids = annotations.category_ids();

    let mut records = Vec::new();
    for image_id in image_ids {
        let Some(image) = annotations.image(image_id) else {
            continue;
        };

        if !filter::is_eligible(&image.file_name, &preview_dir) {
            log::debug!("{} is not in preview, skipping", image.file_name);
            report.ineligible += 1;
            continue;
        }

        let encoded = match read_image(&images_dir.join(&image.file_name)) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("{e}; skipping");
                report.unreadable += 1;
                continue;
            }
        };
        warn_on_size_mismatch(image, &encoded);

        let image_annotations: Vec<&Annotation> = annotations
            .annotation_ids(image_id, &category_ids)
            .into_iter()
            .filter_map(|id| annotations.annotation(id))
            .collect();

        let record = build_record(
            image,
            &image_annotations,
            |id| annotations.category_name(id),
            encoded,
        )?;
        records.push(record);
    }

    Ok(records)
}

fn read_image(path: &Path) -> Result<Vec<u8>, ConvertError> {
    fs::read(path).map_err(|source| ConvertError::ImageRead {
        path: path.to_path_buf(),
        source,
    })
}

/// The record keeps the annotated size either way; a mismatch usually means
/// the boxes were drawn on a different rendition of the image.
fn warn_on_size_mismatch(image: &Image, encoded: &[u8]) {
    match imagesize::blob_size(encoded) {
        Ok(size) => {
            if size.width != image.width as usize || size.height != image.height as usize {
                log::warn!(
                    "{} is {}x{} but annotated as {}x{}",
                    image.file_name,
                    size.width,
                    size.height,
                    image.width,
                    image.height
                );
            }
        }
        Err(e) => log::debug!("could not read header of {}: {e}", image.file_name),
    }
}

fn write_records(path: &Path, records: &[ImageRecord]) -> Result<usize, ConvertError> {
    write_tfrecord_file(path, records.iter().map(encode_record))
}
