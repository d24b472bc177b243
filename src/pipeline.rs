// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use log::{debug, info, warn};

use crate::features::{
    registry::{registry, FeatureKind},
    FeatureMap,
};
use crate::seq::{
    fasta::parse_fasta,
    kind::{detect_sequence_type, SequenceType},
    record::SeqRecord,
};
use crate::table::{FeatureRecord, FeatureTable};

/// What to extract. Everything here is plain data, so identical options on identical input give
/// identical tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub features: Vec<FeatureKind>,
    pub k: Option<usize>,
    // None means "detect the type of each sequence".
    pub type_override: Option<SequenceType>,
}

impl ExtractOptions {
    pub fn new(features: &[FeatureKind]) -> Self {
        ExtractOptions {
            features: features.to_vec(),
            ..Default::default()
        }
    }

    /// Builds options from feature-kind names. Names that are not registered are dropped.
    pub fn from_names<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        let features = names
            .into_iter()
            .filter_map(|name| match name.parse::<FeatureKind>() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    debug!("{}; ignored", e);
                    None
                }
            })
            .collect();
        ExtractOptions {
            features,
            ..Default::default()
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    pub fn with_type_override(mut self, seq_type: Option<SequenceType>) -> Self {
        self.type_override = seq_type;
        self
    }

    pub fn requests(&self, kind: FeatureKind) -> bool {
        self.features.contains(&kind)
    }

    // k-mer kinds requested without k. These are skipped, not treated as errors.
    fn kinds_missing_k(&self) -> Vec<FeatureKind> {
        if self.k.is_some() {
            return Vec::new();
        }
        self.features.iter().copied().filter(|kind| kind.needs_k()).collect()
    }
}

/// Builds the feature record for a single sequence record.
///
/// Calculators run in registry order, skipping kinds that were not requested, that lack k, or
/// that do not support the record's type. A calculator that fails contributes nothing to this
/// record; the failure is logged and the other calculators still run.
pub fn extract_record(record: &SeqRecord, options: &ExtractOptions) -> FeatureRecord {
    let seq_type = options
        .type_override
        .unwrap_or_else(|| detect_sequence_type(&record.sequence));
    let mut result = FeatureRecord::new(&record.id, &record.sequence, seq_type);

    for entry in registry() {
        if !options.requests(entry.kind) {
            continue;
        }
        if entry.kind.needs_k() && options.k.is_none() {
            continue;
        }
        if !entry.supports(seq_type) {
            debug!(
                "{}: {} does not apply to {} sequences",
                record.id, entry.kind, seq_type
            );
            continue;
        }
        let features: FeatureMap = match (entry.calculator)(&record.sequence, options.k) {
            Ok(features) => features,
            Err(e) => {
                warn!("{}: {} failed: {}", record.id, entry.kind, e);
                FeatureMap::new()
            }
        };
        result.features.merge(features);
    }
    result
}

/// Extracts features for already-parsed records; one row per record, in record order.
pub fn extract_records(records: &[SeqRecord], options: &ExtractOptions) -> FeatureTable {
    for kind in options.kinds_missing_k() {
        warn!("{} requested but no k-mer length given; skipping it", kind);
    }
    let mut table = FeatureTable::new();
    for record in records {
        table.push(extract_record(record, options));
    }
    info!(
        "Extracted {} feature column(s) for {} record(s)",
        table.feature_columns().len(),
        table.len()
    );
    table
}

/// Parses FastA text and extracts the requested features. Text without records gives an empty
/// table.
pub fn extract_features(fasta_text: &str, options: &ExtractOptions) -> FeatureTable {
    let records = parse_fasta(fasta_text);
    info!("Parsed {} record(s)", records.len());
    extract_records(&records, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use approx::assert_abs_diff_eq;

    const MIXED: &str = ">protein1\nARND\n>dna1\nAGCT\n";

    fn number(table: &FeatureTable, id: &str, col: &str) -> Option<f64> {
        match table.value(id, col) {
            Some(Cell::Number(x)) => Some(x),
            _ => None,
        }
    }

    #[test]
    fn test_amino_acid_composition_only_for_protein() {
        let opts = ExtractOptions::new(&[FeatureKind::AminoAcidComposition]);
        let table = extract_features(MIXED, &opts);
        assert_eq!(table.len(), 2);
        assert!(table.has_column("A"));
        assert_eq!(number(&table, "protein1", "A"), Some(0.25));
        // dna1 is DNA, so it only has the fixed columns.
        assert!(table.rows()[1].features.is_empty());
        assert_eq!(table.value("dna1", "type"), Some(Cell::Text("DNA")));
    }

    #[test]
    fn test_kmers_for_all_types() {
        let opts = ExtractOptions::new(&[FeatureKind::KmerFrequencies]).with_k(2);
        let table = extract_features(MIXED, &opts);
        assert_abs_diff_eq!(
            number(&table, "dna1", "AG").unwrap(),
            1.0 / 3.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            number(&table, "protein1", "AR").unwrap(),
            1.0 / 3.0,
            epsilon = 1e-12
        );
        assert_eq!(number(&table, "protein1", "AG"), None);
    }

    #[test]
    fn test_kmers_without_k_skipped() {
        let opts = ExtractOptions::new(&[
            FeatureKind::KmerFrequencies,
            FeatureKind::AminoAcidComposition,
        ]);
        let table = extract_features(MIXED, &opts);
        assert_eq!(table.len(), 2);
        assert_eq!(table.feature_columns(), &["A", "R", "N", "D"]);
    }

    #[test]
    fn test_physicochemical_column_present() {
        let opts = ExtractOptions::new(&[FeatureKind::Physicochemical]);
        let table = extract_features(MIXED, &opts);
        assert!(table.has_column("molecular_weight"));
        assert_eq!(number(&table, "dna1", "molecular_weight"), None);
    }

    #[test]
    fn test_type_override() {
        let opts = ExtractOptions::new(&[FeatureKind::AminoAcidComposition])
            .with_type_override(Some(SequenceType::Protein));
        let table = extract_features(MIXED, &opts);
        assert_eq!(table.value("dna1", "type"), Some(Cell::Text("Protein")));
        assert_eq!(number(&table, "dna1", "G"), Some(0.25));
    }

    #[test]
    fn test_failing_calculator_does_not_abort() {
        // Empty sequence forced to Protein: composition fails, the record is still there.
        let records = vec![SeqRecord::new("empty", ""), SeqRecord::new("p", "MKV")];
        let opts = ExtractOptions::new(&[
            FeatureKind::AminoAcidComposition,
            FeatureKind::Physicochemical,
        ])
        .with_type_override(Some(SequenceType::Protein));
        let table = extract_records(&records, &opts);
        assert_eq!(table.len(), 2);
        assert!(table.rows()[0].features.is_empty());
        assert!(number(&table, "p", "M").is_some());
        assert!(number(&table, "p", "gravy").is_some());
    }

    #[test]
    fn test_unsupported_residue_keeps_composition() {
        let opts = ExtractOptions::new(&[
            FeatureKind::AminoAcidComposition,
            FeatureKind::Physicochemical,
        ]);
        let table = extract_features(">x\nMKXB\n", &opts);
        assert_eq!(table.value("x", "type"), Some(Cell::Text("Protein")));
        assert_eq!(number(&table, "x", "X"), Some(0.25));
        assert_eq!(number(&table, "x", "molecular_weight"), None);
    }

    #[test]
    fn test_last_writer_wins() {
        // k = 1 frequencies share their keys with the residue composition.
        let opts = ExtractOptions::new(&[
            FeatureKind::KmerFrequencies,
            FeatureKind::AminoAcidComposition,
        ])
        .with_k(1);
        let table = extract_features(">p\nMKKV\n", &opts);
        assert_eq!(table.feature_columns(), &["M", "K", "V"]);
        assert_eq!(number(&table, "p", "K"), Some(0.5));
    }

    #[test]
    fn test_empty_and_invalid_input() {
        let opts = ExtractOptions::new(&[FeatureKind::AminoAcidComposition]);
        assert!(extract_features("", &opts).is_empty());
        assert!(extract_features("not fasta", &opts).is_empty());
    }

    #[test]
    fn test_no_features_requested() {
        let table = extract_features(MIXED, &ExtractOptions::default());
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), vec!["id", "sequence", "type"]);
    }

    #[test]
    fn test_from_names_drops_unknown() {
        let opts = ExtractOptions::from_names(["gc_content", "physicochemical"]);
        assert_eq!(opts.features, vec![FeatureKind::Physicochemical]);
    }

    #[test]
    fn test_deterministic() {
        let opts = ExtractOptions::new(&[
            FeatureKind::DipeptideComposition,
            FeatureKind::KmerFrequencies,
        ])
        .with_k(3);
        let text = ">a\nMKTAYIAKQRQISFVK\n>b\nGATTACA\n>c\nAUGGC\n";
        assert_eq!(extract_features(text, &opts), extract_features(text, &opts));
    }

    #[test]
    fn test_kmer_named_like_fixed_column() {
        let opts = ExtractOptions::new(&[FeatureKind::KmerFrequencies]).with_k(4);
        let table = extract_features(">p\ntype\n", &opts);
        assert_eq!(table.columns(), vec!["id", "sequence", "type", "feature:type"]);
        assert_eq!(table.value("p", "type"), Some(Cell::Text("Protein")));
        assert_eq!(number(&table, "p", "feature:type"), Some(1.0));

        let table = extract_features(">q\nidid\n", &opts.with_k(2));
        assert_eq!(
            table.columns(),
            vec!["id", "sequence", "type", "feature:id", "di"]
        );
        assert_eq!(table.value("q", "id"), Some(Cell::Text("q")));
        assert_eq!(number(&table, "q", "feature:id"), Some(2.0 / 3.0));
    }
}
