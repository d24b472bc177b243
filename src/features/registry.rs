// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SeqFeatError};
use crate::features::{
    composition::{amino_acid_composition, dipeptide_composition},
    kmers::kmer_frequencies,
    physicochem::physicochemical_features,
    FeatureMap,
};
use crate::seq::kind::SequenceType;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    #[clap(name = "amino_acid_composition")]
    AminoAcidComposition,
    #[clap(name = "dipeptide_composition")]
    DipeptideComposition,
    #[clap(name = "kmer_frequencies")]
    KmerFrequencies,
    #[clap(name = "physicochemical")]
    Physicochemical,
}

impl FeatureKind {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureKind::AminoAcidComposition => "amino_acid_composition",
            FeatureKind::DipeptideComposition => "dipeptide_composition",
            FeatureKind::KmerFrequencies => "kmer_frequencies",
            FeatureKind::Physicochemical => "physicochemical",
        }
    }

    // True for the kinds whose calculator is parameterized by the k-mer length.
    pub fn needs_k(&self) -> bool {
        matches!(self, FeatureKind::KmerFrequencies)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FeatureKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        REGISTRY
            .iter()
            .map(|entry| entry.kind)
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("Unknown feature kind '{}'", s))
    }
}

/// A calculator receives the sequence and, for k-mer based kinds, the k-mer length.
pub type Calculator = fn(&str, Option<usize>) -> Result<FeatureMap>;

pub struct RegistryEntry {
    pub kind: FeatureKind,
    pub supported: &'static [SequenceType],
    pub calculator: Calculator,
}

impl RegistryEntry {
    pub fn supports(&self, seq_type: SequenceType) -> bool {
        self.supported.contains(&seq_type)
    }
}

const PROTEIN_ONLY: &[SequenceType] = &[SequenceType::Protein];

fn calc_amino_acid_composition(seq: &str, _k: Option<usize>) -> Result<FeatureMap> {
    amino_acid_composition(seq)
}

fn calc_dipeptide_composition(seq: &str, _k: Option<usize>) -> Result<FeatureMap> {
    Ok(dipeptide_composition(seq))
}

fn calc_kmer_frequencies(seq: &str, k: Option<usize>) -> Result<FeatureMap> {
    let k = k.ok_or_else(|| SeqFeatError::Usage(String::from("k-mer length not set")))?;
    kmer_frequencies(seq, k)
}

fn calc_physicochemical(seq: &str, _k: Option<usize>) -> Result<FeatureMap> {
    Ok(physicochemical_features(seq))
}

// Iteration order is also the merge order: when two calculators produce the same key, the later
// entry's value is kept.
static REGISTRY: [RegistryEntry; 4] = [
    RegistryEntry {
        kind: FeatureKind::AminoAcidComposition,
        supported: PROTEIN_ONLY,
        calculator: calc_amino_acid_composition,
    },
    RegistryEntry {
        kind: FeatureKind::DipeptideComposition,
        supported: PROTEIN_ONLY,
        calculator: calc_dipeptide_composition,
    },
    RegistryEntry {
        kind: FeatureKind::KmerFrequencies,
        supported: &SequenceType::ALL,
        calculator: calc_kmer_frequencies,
    },
    RegistryEntry {
        kind: FeatureKind::Physicochemical,
        supported: PROTEIN_ONLY,
        calculator: calc_physicochemical,
    },
];

pub fn registry() -> &'static [RegistryEntry] {
    &REGISTRY
}

pub fn lookup(kind: FeatureKind) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|entry| entry.kind == kind)
}
