// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

pub mod config;
pub mod dataset;
pub mod errors;
pub mod features;
pub mod pipeline;
mod runner;
pub mod seq;
pub mod table;

use crate::errors::SeqFeatError;

pub use crate::features::{registry::FeatureKind, FeatureMap};
pub use crate::pipeline::{extract_features, extract_records, ExtractOptions};
pub use crate::seq::{fasta::parse_fasta, kind::detect_sequence_type, kind::SequenceType};
pub use crate::table::{FeatureRecord, FeatureTable};

pub fn run() -> Result<(), SeqFeatError> {
    runner::run()
}
