// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::dataset::ImputeStrategy;
use crate::errors::{Result, SeqFeatError};
use crate::features::registry::FeatureKind;
use crate::seq::kind::{parse_type_override, SequenceType};
use crate::table::OutputFormat;

pub const CONFIG_FILENAME: &str = ".seqfeatconfig";

// Defaults read from a JSON config file. Every field is optional; command-line values take
// precedence.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeqFeatConfig {
    pub features: Option<Vec<FeatureKind>>,
    pub k: Option<usize>,
    pub sequence_type: Option<String>,
    pub format: Option<OutputFormat>,
    pub impute: Option<ImputeStrategy>,
}

impl SeqFeatConfig {
    pub fn parse(text: &str) -> Result<Self> {
        let config: SeqFeatConfig =
            serde_json::from_str(text).map_err(|e| SeqFeatError::Config(e.to_string()))?;
        // Validate early, so that a bad type shows up as a config problem.
        config.type_override()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| match e {
            SeqFeatError::Config(msg) => {
                SeqFeatError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn type_override(&self) -> Result<Option<SequenceType>> {
        match &self.sequence_type {
            Some(s) => parse_type_override(s).map_err(SeqFeatError::Config),
            None => Ok(None),
        }
    }
}

pub fn find_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILENAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILENAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}
