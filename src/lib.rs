//! geococo2tfrecord: turn a reviewed COCO detection dataset into TFRecords.
//!
//! The input is a dataset root laid out as
//!
//! ```text
//! <root>/images/                   all rendered images
//! <root>/preview/                  the images kept after manual review
//! <root>/annotations/geococo.json  COCO annotations for images/
//! ```
//!
//! Every annotated image that survived review becomes one `tf.train.Example`
//! with normalized boxes, class ids and class names. The examples are split
//! positionally into a training and a validation TFRecord file.
//!
//! # Modules
//!
//! - [`ir`]: COCO annotation model and reader
//! - [`filter`]: preview-based selection and pruning
//! - [`record`]: per-image record building and box normalization
//! - [`split`]: train/validation partitioning
//! - [`tfrecord`]: Example encoding and TFRecord framing
//! - [`pipeline`]: the end-to-end run
//! - [`error`]: error types

pub mod error;
pub mod filter;
pub mod ir;
pub mod pipeline;
pub mod record;
pub mod split;
pub mod tfrecord;

use std::path::PathBuf;

use clap::Parser;

pub use error::ConvertError;
pub use pipeline::{run_pipeline, ConvertConfig, ConvertReport};

/// Convert a COCO dataset into TFRecord files for object detection training.
#[derive(Parser, Debug)]
#[command(name = "geococo2tfrecord")]
#[command(version, about)]
struct Cli {
    /// Dataset root containing images/, preview/ and annotations/geococo.json.
    #[arg(long = "label_input", value_name = "DIR")]
    label_input: PathBuf,

    /// Output path of the training TFRecord.
    #[arg(long = "train_rd_path", value_name = "FILE")]
    train_rd_path: PathBuf,

    /// Output path of the validation TFRecord.
    #[arg(long = "valid_rd_path", value_name = "FILE")]
    valid_rd_path: PathBuf,
}

impl Cli {
    fn into_config(self) -> ConvertConfig {
        ConvertConfig::from_root(self.label_input, self.train_rd_path, self.valid_rd_path)
    }
}

/// Run the command-line tool.
///
/// This is the main entry point for the CLI, called from `main.rs`. Usage
/// errors exit through clap with status 2; the config is validated by
/// [`run_pipeline`] before anything is read.
pub fn run() -> Result<(), ConvertError> {
    let config = Cli::parse().into_config();
    log::info!("converting {}", config.label_input.display());
    let report = run_pipeline(&config)?;
    print!("{}", report);
    Ok(())
}
