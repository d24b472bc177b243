// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeqFeatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // Caller misuse, detected before any record is processed.
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Composition of an empty sequence is undefined")]
    EmptySequence,

    #[error("Invalid k-mer length {0} (must be at least 1)")]
    InvalidK(usize),

    #[error("Unsupported residue '{residue}' at position {position}")]
    UnsupportedResidue { residue: char, position: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Only {0} rows available, at least 5 are needed for a training dataset")]
    InsufficientData(usize),
}

pub type Result<T> = std::result::Result<T, SeqFeatError>;
