//! Train/validation partitioning.

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};

/// Ratio used by the command-line tool.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Index of the first validation item: `floor(total * ratio)`.
///
/// `ratio` is clamped to `[0.0, 1.0]`; NaN counts as `0.0`.
pub fn split_index(total: usize, ratio: f64) -> usize {
    let ratio = if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    };
    ((total as f64 * ratio).floor() as usize).min(total)
}

/// Splits `items` positionally into a training prefix and a validation
/// suffix. Order within each side is preserved.
pub fn split<T>(mut items: Vec<T>, ratio: f64) -> (Vec<T>, Vec<T>) {
    let at = split_index(items.len(), ratio);
    let validation = items.split_off(at);
    (items, validation)
}

/// Shuffles `items` in place with a generator seeded from `seed`, so the
/// same seed always produces the same order.
pub fn shuffle_seeded<T>(items: &mut [T], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
}
