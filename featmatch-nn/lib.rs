use featmatch_core::{Descriptor, Match};
use rayon::prelude::*;

/// Total number of descriptor bits, used to normalize Hamming distances
const DESCRIPTOR_BITS: f32 = 256.0;

/// Absolute floor for the good-match threshold. Guards against a
/// near-zero minimum distance collapsing the filter to exact duplicates.
pub const GOOD_MATCH_FLOOR: f32 = 0.02;

/// Hamming distance between two descriptors, normalized to [0, 1]
pub fn normalized_hamming(a: &Descriptor, b: &Descriptor) -> f32 {
    let bits: u32 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum();
    bits as f32 / DESCRIPTOR_BITS
}

/// Brute-force nearest-neighbor matcher over binary descriptors
pub struct HammingMatcher;

impl HammingMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Find the nearest train descriptor for every query descriptor.
    ///
    /// Produces exactly one match per query descriptor, so the output
    /// length equals the query count whenever `train` is non-empty.
    pub fn match_descriptors(&self, query: &[Descriptor], train: &[Descriptor]) -> Vec<Match> {
        if train.is_empty() {
            return Vec::new();
        }

        query
            .par_iter()
            .enumerate()
            .map(|(query_idx, q)| {
                let mut best_distance = f32::INFINITY;
                let mut best_train_idx = 0;

                for (train_idx, t) in train.iter().enumerate() {
                    let distance = normalized_hamming(q, t);
                    if distance < best_distance {
                        best_distance = distance;
                        best_train_idx = train_idx;
                    }
                }

                Match {
                    query_idx,
                    train_idx: best_train_idx,
                    distance: best_distance,
                }
            })
            .collect()
    }
}

impl Default for HammingMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimum and maximum match distance for one image pair
#[derive(Debug, Clone, Copy)]
pub struct MatchStats {
    pub min: f32,
    pub max: f32,
}

impl MatchStats {
    /// Scan all matches for the distance extremes. An empty match set
    /// reports min = 1.0 and max = 0.0 (the sentinel initializers).
    pub fn from_matches(matches: &[Match]) -> Self {
        let mut min = 1.0f32;
        let mut max = 0.0f32;
        for m in matches {
            if m.distance < min {
                min = m.distance;
            }
            if m.distance > max {
                max = m.distance;
            }
        }
        Self { min, max }
    }

    /// Threshold below which a match counts as good
    pub fn good_threshold(&self) -> f32 {
        (2.0 * self.min).max(GOOD_MATCH_FLOOR)
    }
}

/// Retain matches whose distance is at most max(2 * min_distance, 0.02)
pub fn good_matches(matches: &[Match], stats: MatchStats) -> Vec<Match> {
    let threshold = stats.good_threshold();
    matches
        .iter()
        .copied()
        .filter(|m| m.distance <= threshold)
        .collect()
}
