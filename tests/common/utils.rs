// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use seqfeat::table::{Cell, FeatureTable};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

// Numeric cell of the first row with this id, None if absent (or not a number).
pub fn number(table: &FeatureTable, id: &str, column: &str) -> Option<f64> {
    match table.value(id, column) {
        Some(Cell::Number(x)) => Some(x),
        _ => None,
    }
}

pub fn text<'a>(table: &'a FeatureTable, id: &str, column: &str) -> Option<&'a str> {
    match table.value(id, column) {
        Some(Cell::Text(s)) => Some(s),
        _ => None,
    }
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("writing test file");
    path
}

// Mostly residue letters of either case, with gaps, stops and a few multibyte symbols mixed in.
pub fn sequence_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ACGTUN]{0,40}",
        "[acgtun]{0,40}",
        "[ACDEFGHIKLMNPQRSTVWYacdefghiklmnpqrstvwy]{0,40}",
        "[ACGTMKéλ→*-]{0,30}",
        "\\PC{0,30}",
    ]
}

// Printable ASCII only, where case mapping never leaves the alphabet.
pub fn ascii_text() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}
