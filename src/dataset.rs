// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

//! Training datasets: feature rows joined with a label table on the record id, with missing
//! feature values imputed. Model fitting itself happens elsewhere.

use std::{fmt, fs::File, io::Write, path::Path};

use clap::ValueEnum;
use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SeqFeatError};
use crate::table::{FeatureTable, ID_COLUMN};

pub const LABEL_COLUMN: &str = "label";
pub const MIN_DATASET_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: String,
    pub label: String,
}

/// Reads a delimited label table with (at least) an `id` and a `label` column.
pub fn read_labels<P: AsRef<Path>>(path: P) -> Result<Vec<Label>> {
    let file = File::open(path)?;
    read_labels_from(file)
}

pub fn read_labels_from<R: std::io::Read>(reader: R) -> Result<Vec<Label>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SeqFeatError::MissingColumn(name.to_string()))
    };
    let id_col = column(ID_COLUMN)?;
    let label_col = column(LABEL_COLUMN)?;

    let mut labels = Vec::new();
    for result in rdr.records() {
        let record = result?;
        labels.push(Label {
            id: record.get(id_col).unwrap_or_default().to_string(),
            label: record.get(label_col).unwrap_or_default().to_string(),
        });
    }
    Ok(labels)
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputeStrategy {
    #[default]
    #[clap(name = "zero")]
    Zero,
    #[clap(name = "mean")]
    Mean,
    #[clap(name = "median")]
    Median,
    // Drop every row that lacks at least one feature value.
    #[clap(name = "drop")]
    Drop,
}

impl fmt::Display for ImputeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImputeStrategy::Zero => "zero",
            ImputeStrategy::Mean => "mean",
            ImputeStrategy::Median => "median",
            ImputeStrategy::Drop => "drop",
        };
        write!(f, "{}", s)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Dense feature matrix, row-major, with one label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub ids: Vec<String>,
    pub columns: Vec<String>,
    pub values: Vec<f64>,
    pub labels: Vec<String>,
}

impl Dataset {
    /// Joins `table` with `labels` (inner join on id, table order; an id labelled twice yields two
    /// rows), then fills in missing values according to `strategy`.
    pub fn build(table: &FeatureTable, labels: &[Label], strategy: ImputeStrategy) -> Result<Self> {
        let columns: Vec<String> = table.feature_columns().to_vec();

        // (id, sparse feature values, label)
        let mut rows: Vec<(String, Vec<Option<f64>>, String)> = Vec::new();
        for row in table.rows() {
            for label in labels.iter().filter(|l| l.id == row.id) {
                let values = columns.iter().map(|c| row.features.get(c)).collect();
                rows.push((row.id.clone(), values, label.label.clone()));
            }
        }

        if strategy == ImputeStrategy::Drop {
            let before = rows.len();
            rows.retain(|(_, values, _)| values.iter().all(Option::is_some));
            if rows.len() < before {
                info!("Dropped {} row(s) due to missing values", before - rows.len());
            }
        }
        if rows.len() < MIN_DATASET_ROWS {
            return Err(SeqFeatError::InsufficientData(rows.len()));
        }

        let fill: Vec<f64> = (0..columns.len())
            .map(|j| {
                let observed: Vec<f64> =
                    rows.iter().filter_map(|(_, values, _)| values[j]).collect();
                let stat = match strategy {
                    ImputeStrategy::Mean => mean(&observed),
                    ImputeStrategy::Median => median(&observed),
                    ImputeStrategy::Zero | ImputeStrategy::Drop => None,
                };
                stat.unwrap_or(0.0)
            })
            .collect();

        let mut ids = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len() * columns.len());
        let mut row_labels = Vec::with_capacity(rows.len());
        for (id, sparse, label) in rows {
            ids.push(id);
            values.extend(sparse.iter().zip(&fill).map(|(v, f)| v.unwrap_or(*f)));
            row_labels.push(label);
        }
        Ok(Dataset {
            ids,
            columns,
            values,
            labels: row_labels,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.ids.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.n_cols();
        &self.values[i * n..(i + 1) * n]
    }

    /// CSV with columns `id`, the features, then `label`.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = vec![ID_COLUMN.to_string()];
        header.extend(self.columns.iter().cloned());
        header.push(LABEL_COLUMN.to_string());
        wtr.write_record(&header)?;
        for i in 0..self.n_rows() {
            let mut fields = vec![self.ids[i].clone()];
            fields.extend(self.row(i).iter().map(|v| v.to_string()));
            fields.push(self.labels[i].clone());
            wtr.write_record(&fields)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
