// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

// A record for sequences: the identifier (first word of the header), whatever followed it on the
// header line, and the raw sequence. Records are created by the parser and never mutated
// afterwards.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub id: String,
    pub description: Option<String>,
    pub sequence: String,
}

impl SeqRecord {
    pub fn new(id: &str, sequence: &str) -> Self {
        SeqRecord {
            id: id.to_string(),
            description: None,
            sequence: sequence.to_string(),
        }
    }

    // Splits a header line (without its leading '>') into identifier and description.
    pub fn from_header(header: &str) -> Self {
        let header = header.trim();
        let (id, description) = match header.split_once(char::is_whitespace) {
            Some((id, rest)) => {
                let rest = rest.trim();
                (id, (!rest.is_empty()).then(|| rest.to_string()))
            }
            None => (header, None),
        };
        SeqRecord {
            id: id.to_string(),
            description,
            sequence: String::new(),
        }
    }
}

// For our purposes, a sequence file is just a Vec of sequence records, in file order.
pub type SeqFile = Vec<SeqRecord>;
