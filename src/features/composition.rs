// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use crate::errors::{Result, SeqFeatError};
use crate::features::{kmers::window_frequencies, FeatureMap};

/// Frequency of each distinct residue: count / length. Symbols are taken as they appear (no case
/// folding). The composition of an empty sequence is undefined and reported as an error.
pub fn amino_acid_composition(seq: &str) -> Result<FeatureMap> {
    if seq.is_empty() {
        return Err(SeqFeatError::EmptySequence);
    }
    Ok(window_frequencies(seq, 1))
}

/// Frequency of each distinct adjacent residue pair over the `len - 1` pairs of the sequence.
/// Sequences shorter than two residues have no pairs and give an empty map.
pub fn dipeptide_composition(seq: &str) -> FeatureMap {
    window_frequencies(seq, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_amino_acid_composition_uniform() {
        let seq = "ARNDCEQGHILKMFPSTWYV";
        let comp = amino_acid_composition(seq).unwrap();
        assert_eq!(comp.len(), 20);
        for aa in seq.chars() {
            assert_eq!(comp.get(&aa.to_string()), Some(0.05));
        }
    }

    #[test]
    fn test_amino_acid_composition_aarnd() {
        let comp = amino_acid_composition("AARND").unwrap();
        assert_eq!(comp.len(), 4);
        assert_abs_diff_eq!(comp.get("A").unwrap(), 0.4, epsilon = 1e-9);
        assert_abs_diff_eq!(comp.get("R").unwrap(), 0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(comp.get("N").unwrap(), 0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(comp.get("D").unwrap(), 0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(comp.sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_amino_acid_composition_keeps_case() {
        let comp = amino_acid_composition("aA").unwrap();
        assert_eq!(comp.get("a"), Some(0.5));
        assert_eq!(comp.get("A"), Some(0.5));
    }

    #[test]
    fn test_amino_acid_composition_empty() {
        assert!(matches!(
            amino_acid_composition(""),
            Err(SeqFeatError::EmptySequence)
        ));
    }

    #[test]
    fn test_dipeptide_composition_arnd() {
        let comp = dipeptide_composition("ARND");
        assert_eq!(comp.len(), 3);
        assert_abs_diff_eq!(comp.get("AR").unwrap(), 1.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(comp.get("RN").unwrap(), 1.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(comp.get("ND").unwrap(), 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dipeptide_composition_repeats() {
        let comp = dipeptide_composition("AARA");
        assert_eq!(comp.len(), 3);
        assert_abs_diff_eq!(comp.get("AA").unwrap(), 1.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(comp.get("AR").unwrap(), 1.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(comp.get("RA").unwrap(), 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dipeptide_composition_short() {
        assert!(dipeptide_composition("").is_empty());
        assert!(dipeptide_composition("M").is_empty());
    }

    #[test]
    fn test_dipeptide_composition_bounded_by_pairs() {
        for seq in ["MM", "MKV", "MKMKMKMK", "ACDEFGHIKLMNPQRSTVWY"] {
            let comp = dipeptide_composition(seq);
            assert!(comp.len() <= seq.len() - 1);
            assert_abs_diff_eq!(comp.sum(), 1.0, epsilon = 1e-9);
        }
    }
}
