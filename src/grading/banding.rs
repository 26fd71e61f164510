// src/grading/banding.rs

/// Banded score by number of misses: none, one, two. Three or more misses band to zero.
const BANDS: [u32; 3] = [10, 5, 2];

/// Maps a correct count to the coarse banded score.
///
/// This is a step function over the number of wrong answers, not a percentage.
/// A correct count above `total` is treated as zero misses.
pub fn band(correct_count: usize, total: usize) -> u32 {
    let misses = total.saturating_sub(correct_count);
    BANDS.get(misses).copied().unwrap_or(0)
}
