// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::iter::once;

use itertools::Itertools;

use crate::errors::{Result, SeqFeatError};
use crate::features::FeatureMap;

/// Iterates over the k-character windows of `seq` (characters, not bytes), left to right.
pub fn windows(seq: &str, k: usize) -> impl Iterator<Item = &str> + Clone {
    let bounds: Vec<usize> = seq
        .char_indices()
        .map(|(i, _)| i)
        .chain(once(seq.len()))
        .collect();
    // bounds holds one more entry than there are characters
    let n_windows = bounds.len().saturating_sub(k);
    (0..n_windows).map(move |i| &seq[bounds[i]..bounds[i + k]])
}

// Relative frequency of each distinct window, keyed in order of first occurrence. An empty map if
// there is no complete window.
pub(crate) fn window_frequencies(seq: &str, k: usize) -> FeatureMap {
    // one scan of the sequence; the window slices are then counted and deduplicated
    let all: Vec<&str> = windows(seq, k).collect();
    if all.is_empty() {
        return FeatureMap::new();
    }
    let total = all.len() as f64;
    let counts = all.iter().counts();
    all.iter()
        .unique()
        .map(|w| (*w, counts[w] as f64 / total))
        .collect()
}

/// Frequencies of all k-mers of `seq`. There are `len - k + 1` windows; when k exceeds the length
/// the result is empty. k must be at least 1.
pub fn kmer_frequencies(seq: &str, k: usize) -> Result<FeatureMap> {
    if k == 0 {
        return Err(SeqFeatError::InvalidK(k));
    }
    Ok(window_frequencies(seq, k))
}
