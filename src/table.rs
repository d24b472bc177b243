// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{borrow::Cow, collections::HashSet, fmt, io::Write, path::Path};

use clap::ValueEnum;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use crate::errors::Result;
use crate::features::FeatureMap;
use crate::seq::kind::SequenceType;

pub const ID_COLUMN: &str = "id";
pub const SEQUENCE_COLUMN: &str = "sequence";
pub const TYPE_COLUMN: &str = "type";
pub const FIXED_COLUMNS: [&str; 3] = [ID_COLUMN, SEQUENCE_COLUMN, TYPE_COLUMN];

// Prepended to a feature name that equals a fixed column name (e.g. the k-mer "type").
pub const SHADOWED_FEATURE_PREFIX: &str = "feature:";

/// Column name under which a feature is stored: the feature's own name, unless that is one of the
/// fixed columns.
pub fn feature_column(name: &str) -> Cow<'_, str> {
    if FIXED_COLUMNS.contains(&name) {
        Cow::Owned(format!("{}{}", SHADOWED_FEATURE_PREFIX, name))
    } else {
        Cow::Borrowed(name)
    }
}

/// One output row: the record's identity columns plus whatever its calculators produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub id: String,
    pub sequence: String,
    pub seq_type: SequenceType,
    pub features: FeatureMap,
}

impl FeatureRecord {
    pub fn new(id: &str, sequence: &str, seq_type: SequenceType) -> Self {
        FeatureRecord {
            id: id.to_string(),
            sequence: sequence.to_string(),
            seq_type,
            features: FeatureMap::new(),
        }
    }

    // Moves features whose names collide with a fixed column to their prefixed names.
    fn unshadow_features(&mut self) {
        if self.features.names().any(|name| FIXED_COLUMNS.contains(&name)) {
            self.features = self
                .features
                .iter()
                .map(|(name, value)| (feature_column(name).into_owned(), value))
                .collect();
        }
    }

    pub fn get(&self, column: &str) -> Option<Cell<'_>> {
        match column {
            ID_COLUMN => Some(Cell::Text(&self.id)),
            SEQUENCE_COLUMN => Some(Cell::Text(&self.sequence)),
            TYPE_COLUMN => Some(Cell::Text(self.seq_type.name())),
            _ => self.features.get(column).map(Cell::Number),
        }
    }
}

// Serializes as a flat object; the table serializer fills in nulls for absent columns.
impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.features.len()))?;
        map.serialize_entry(ID_COLUMN, &self.id)?;
        map.serialize_entry(SEQUENCE_COLUMN, &self.sequence)?;
        map.serialize_entry(TYPE_COLUMN, &self.seq_type)?;
        for (name, value) in self.features.iter() {
            map.serialize_entry(&feature_column(name), &value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(x) => write!(f, "{}", x),
        }
    }
}

/// Rows in input order. The columns are the fixed ones followed by the union of all feature names,
/// in order of first appearance; a row lacking a column has no value there (which is distinct
/// from a computed zero).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: Vec<FeatureRecord>,
    feature_columns: Vec<String>,
    seen: HashSet<String>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row. Feature names equal to a fixed column are stored under their prefixed name
    /// (see [`feature_column`]), so every column name appears once.
    pub fn push(&mut self, mut record: FeatureRecord) {
        record.unshadow_features();
        for name in record.features.names() {
            if self.seen.insert(name.to_string()) {
                self.feature_columns.push(name.to_string());
            }
        }
        self.rows.push(record);
    }

    pub fn rows(&self) -> &[FeatureRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn columns(&self) -> Vec<&str> {
        FIXED_COLUMNS
            .iter()
            .copied()
            .chain(self.feature_columns.iter().map(String::as_str))
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        FIXED_COLUMNS.contains(&column) || self.seen.contains(column)
    }

    /// Value of `column` in the first row whose id is `id`.
    pub fn value(&self, id: &str, column: &str) -> Option<Cell<'_>> {
        self.rows
            .iter()
            .find(|row| row.id == id)
            .and_then(|row| row.get(column))
    }

    /// Writes the table as delimited text with a header line. Absent values are empty fields.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let columns = self.columns();
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        wtr.write_record(&columns)?;
        for row in &self.rows {
            wtr.write_record(columns.iter().map(|col| {
                row.get(col)
                    .map(|cell| cell.to_string())
                    .unwrap_or_default()
            }))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Writes the table as a JSON array of objects, one per row, with `null` for absent values.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: W, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Csv => self.write_delimited(writer, b','),
            OutputFormat::Tsv => self.write_delimited(writer, b'\t'),
            OutputFormat::Json => self.write_json(writer),
        }
    }
}

struct DenseRow<'a> {
    row: &'a FeatureRecord,
    columns: &'a [String],
}

impl Serialize for DenseRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.columns.len()))?;
        map.serialize_entry(ID_COLUMN, &self.row.id)?;
        map.serialize_entry(SEQUENCE_COLUMN, &self.row.sequence)?;
        map.serialize_entry(TYPE_COLUMN, &self.row.seq_type)?;
        for col in self.columns {
            map.serialize_entry(col, &self.row.features.get(col))?;
        }
        map.end()
    }
}

impl Serialize for FeatureTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.iter().map(|row| DenseRow {
            row,
            columns: &self.feature_columns,
        }))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[clap(name = "csv")]
    Csv,
    #[clap(name = "tsv")]
    Tsv,
    #[clap(name = "json")]
    Json,
}

impl OutputFormat {
    // Guessed from the file extension; anything unrecognized is CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("tab") => OutputFormat::Tsv,
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", s)
    }
}
