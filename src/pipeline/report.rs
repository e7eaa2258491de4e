//! Summary of a conversion run.

use serde::Serialize;
use std::fmt;

/// Counts collected while converting a dataset.
///
/// `images == ineligible + unreadable + records` always holds, as does
/// `records == train + validation`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConvertReport {
    /// Images listed in the annotation file.
    pub images: usize,
    /// Images skipped because they are not in `preview/`.
    pub ineligible: usize,
    /// Images in `preview/` whose source bytes could not be read.
    pub unreadable: usize,
    /// Records built (eligible and readable images).
    pub records: usize,
    /// Annotations carried by the built records.
    pub annotations: usize,
    /// Records written to the training file.
    pub train: usize,
    /// Records written to the validation file.
    pub validation: usize,
    /// Image files deleted from `images/` by pruning.
    pub pruned: usize,
}

impl fmt::Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Read {} images: {} converted, {} not in preview, {} unreadable",
            self.images, self.records, self.ineligible, self.unreadable
        )?;
        writeln!(f, "  {} annotations", self.annotations)?;
        if self.pruned > 0 {
            writeln!(f, "  {} rejected image(s) pruned", self.pruned)?;
        }
        writeln!(f, "Converted in total {} images for training", self.train)?;
        writeln!(f, "Converted in total {} images for validation", self.validation)
    }
}
