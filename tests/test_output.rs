// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

mod common;

use std::fs;

use crate::common::utils;

use seqfeat::dataset::{read_labels, Dataset, ImputeStrategy};
use seqfeat::errors::SeqFeatError;
use seqfeat::table::OutputFormat;
use seqfeat::{extract_features, ExtractOptions, FeatureKind};

#[test]
fn test_kmer_csv() {
    let opts = ExtractOptions::new(&[FeatureKind::KmerFrequencies]).with_k(2);
    let table = extract_features(">protein1\nARND\n>dna1\nAGCT\n", &opts);
    let mut buf = Vec::new();
    table.write(&mut buf, OutputFormat::Csv).unwrap();
    insta::assert_snapshot!(String::from_utf8(buf).unwrap(), @r"
    id,sequence,type,AR,RN,ND,AG,GC,CT
    protein1,ARND,Protein,0.3333333333333333,0.3333333333333333,0.3333333333333333,,,
    dna1,AGCT,DNA,,,,0.3333333333333333,0.3333333333333333,0.3333333333333333
    ");
}

#[test]
fn test_json_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("features.json");
    let opts = ExtractOptions::new(&[FeatureKind::AminoAcidComposition]);
    let table = extract_features(">p\nMW\n>d\nACGT\n", &opts);
    table
        .write(fs::File::create(&path).unwrap(), OutputFormat::from_path(&path))
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["W"], 0.5);
    assert_eq!(rows[1]["type"], "DNA");
    assert!(rows[1]["W"].is_null());
}

#[test]
fn test_labelled_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let labels_path = utils::write_file(
        dir.path(),
        "labels.csv",
        "id,label\np1,toxin\np2,toxin\np3,other\np4,other\np5,other\nd1,other\n",
    );
    let fasta = ">p1\nMKV\n>p2\nMKK\n>p3\nWWV\n>p4\nMW\n>p5\nKV\n>d1\nACGT\n";
    let opts = ExtractOptions::new(&[FeatureKind::AminoAcidComposition]);
    let table = extract_features(fasta, &opts);
    let labels = read_labels(&labels_path).unwrap();

    let ds = Dataset::build(&table, &labels, ImputeStrategy::Zero).unwrap();
    assert_eq!(ds.n_rows(), 6);
    assert_eq!(ds.columns, vec!["M", "K", "V", "W"]);
    // d1 is DNA and has no composition: all zeros.
    assert_eq!(ds.row(5), &[0.0, 0.0, 0.0, 0.0]);
    assert_eq!(ds.labels[0], "toxin");

    // Dropping incomplete rows leaves nothing to learn from.
    assert!(matches!(
        Dataset::build(&table, &labels, ImputeStrategy::Drop),
        Err(SeqFeatError::InsufficientData(0))
    ));
}
