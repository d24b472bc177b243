// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fs;
use std::path::Path;

use log::debug;

use crate::errors::Result;
use crate::seq::record::{SeqFile, SeqRecord};

/// Parses FastA text into records, in input order.
///
/// Parsing never fails: text before the first header line is skipped, and input without any
/// header line (including the empty string) yields no records. Whitespace inside sequence lines
/// is dropped.
pub fn parse_fasta(text: &str) -> SeqFile {
    let mut result: SeqFile = Vec::new();
    let mut current_record: Option<SeqRecord> = None;
    let mut skipped = 0;

    for line in text.lines() {
        if let Some(hdr) = line.strip_prefix('>') {
            if let Some(rec) = current_record.take() {
                result.push(rec);
            }
            current_record = Some(SeqRecord::from_header(hdr));
        } else if let Some(rec) = current_record.as_mut() {
            // append line to current record's sequence
            rec.sequence
                .extend(line.chars().filter(|c| !c.is_whitespace()));
        } else if !line.trim().is_empty() {
            skipped += 1;
        }
    }
    if let Some(rec) = current_record {
        result.push(rec);
    }

    if skipped > 0 {
        debug!("Skipped {} line(s) before the first FastA header", skipped);
    }
    result
}

/// Reads a FastA file. Only I/O problems are errors; the content is parsed permissively.
pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<SeqFile> {
    let text = fs::read_to_string(path)?;
    Ok(parse_fasta(&text))
}
