// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{fmt, str::FromStr, sync::OnceLock};

use regex::Regex;
use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceType {
    Dna,
    Rna,
    Protein,
    Unknown,
}

impl SequenceType {
    pub const ALL: [SequenceType; 4] = [
        SequenceType::Dna,
        SequenceType::Rna,
        SequenceType::Protein,
        SequenceType::Unknown,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SequenceType::Dna => "DNA",
            SequenceType::Rna => "RNA",
            SequenceType::Protein => "Protein",
            SequenceType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for SequenceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// Case-insensitive. "auto" is not a sequence type: see `parse_type_override()`.
impl FromStr for SequenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dna" => Ok(SequenceType::Dna),
            "rna" => Ok(SequenceType::Rna),
            "protein" => Ok(SequenceType::Protein),
            "unknown" => Ok(SequenceType::Unknown),
            _ => Err(format!("Unknown sequence type '{}'", s)),
        }
    }
}

/// Parses a type override: `auto` means "detect", anything else must name a type.
pub fn parse_type_override(s: &str) -> Result<Option<SequenceType>, String> {
    if s.eq_ignore_ascii_case("auto") {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

// Tested in this order; the first full match wins, so nucleotide-only strings are never called
// Protein.
fn type_patterns() -> &'static [(SequenceType, Regex); 3] {
    static PATTERNS: OnceLock<[(SequenceType, Regex); 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (SequenceType::Dna, r"^[ACGTN]+$"),
            (SequenceType::Rna, r"^[ACGUN]+$"),
            (SequenceType::Protein, r"^[ACDEFGHIKLMNPQRSTVWYBJZXO]+$"),
        ]
        .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("valid alphabet pattern")))
    })
}

/// Classifies a sequence by its alphabet. Total: the empty string is `Unknown`.
pub fn detect_sequence_type(sequence: &str) -> SequenceType {
    let upper = sequence.to_uppercase();
    type_patterns()
        .iter()
        .find(|(_, re)| re.is_match(&upper))
        .map(|(kind, _)| *kind)
        .unwrap_or(SequenceType::Unknown)
}
