use std::path::PathBuf;
use thiserror::Error;

/// The main error type for geococo2tfrecord operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Missing, unreadable or malformed annotation file. Open failures are
    /// carried as `serde_json::Error::io`.
    #[error("Failed to read COCO annotations from {path}: {source}")]
    AnnotationParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid COCO annotations in {path}: {message}")]
    AnnotationInvalid { path: PathBuf, message: String },

    /// Per-image read failure. The pipeline logs and skips these.
    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Cannot prune {path}: file does not exist (annotations and image directory are out of sync)"
    )]
    PruneMissingImage { path: PathBuf },

    #[error("Image '{file_name}' has size {width}x{height}; boxes cannot be normalized")]
    InvalidImageSize {
        file_name: String,
        width: u32,
        height: u32,
    },

    #[error("Annotation references undeclared category {category_id}")]
    MissingCategory { category_id: u64 },

    #[error("Failed to serialize record: {message}")]
    Serialization { message: String },

    #[error("Failed to write TFRecord to {path}: {source}")]
    RecordWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt TFRecord in {path}: {message}")]
    RecordCorrupt { path: PathBuf, message: String },
}
