//! Preview-based image selection.
//!
//! The `preview/` directory holds the images a person kept after reviewing
//! the dataset. Only those images are converted, and [`prune`] can delete
//! the rejected ones from `images/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::ir::AnnotationSet;

/// True iff a regular file named `file_name` exists under `preview_dir`.
pub fn is_eligible(file_name: &str, preview_dir: &Path) -> bool {
    preview_dir.join(file_name).is_file()
}

/// Deletes from `images_dir` every annotated image that is not in
/// `preview_dir`, and returns the deleted paths.
///
/// This is irreversible and is never run as part of record building.
///
/// # Errors
/// [`ConvertError::PruneMissingImage`] if a rejected image is already absent
/// from `images_dir`: the annotation file and the image directory disagree
/// and the run should stop. Deletions made before the error are not undone.
pub fn prune(
    images_dir: &Path,
    preview_dir: &Path,
    annotations: &AnnotationSet,
) -> Result<Vec<PathBuf>, ConvertError> {
    let mut removed = Vec::new();

    for image in annotations.images() {
        if is_eligible(&image.file_name, preview_dir) {
            continue;
        }

        let path = images_dir.join(&image.file_name);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("pruned {}", path.display());
                removed.push(path);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConvertError::PruneMissingImage { path });
            }
            Err(e) => return Err(ConvertError::Io(e)),
        }
    }

    Ok(removed)
}
