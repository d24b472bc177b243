// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{fs, path::PathBuf};

use clap::{Parser, ValueEnum};
use itertools::Itertools;
use log::{debug, info};

use crate::config::{find_config, SeqFeatConfig};
use crate::dataset::{read_labels, Dataset, ImputeStrategy};
use crate::errors::{Result, SeqFeatError};
use crate::features::registry::FeatureKind;
use crate::pipeline::{extract_features, ExtractOptions};
use crate::seq::kind::SequenceType;
use crate::table::OutputFormat;

#[derive(Debug, Parser)]
#[command(version, about = "Extract features from biological sequences", long_about = None)]
pub(crate) struct Cli {
    /// Input FastA file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Feature kinds to extract
    #[arg(short = 'f', long = "feature-types", value_enum, num_args = 1..)]
    feature_types: Vec<FeatureKind>,

    /// k-mer length (required with kmer_frequencies)
    #[arg(short, long, value_parser = parse_k)]
    k: Option<usize>,

    /// Sequence type for all records
    #[arg(short = 's', long = "sequence-type", value_enum,
        help = "Sequence type for all records [auto|dna|rna|protein|unknown]; default: auto",
        hide_possible_values = true,
    )]
    sequence_type: Option<TypeChoice>,

    /// Output format; default: from the output file's extension
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Label table (CSV with id and label columns); writes a training dataset instead
    #[arg(short, long)]
    labels: Option<PathBuf>,

    /// Missing-value strategy for the training dataset; default: zero
    #[arg(long, value_enum, requires = "labels")]
    impute: Option<ImputeStrategy>,

    /// Do not read the config file
    #[arg(long = "no-config")]
    no_config: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TypeChoice {
    #[clap(name = "auto")]
    Auto,
    #[clap(name = "dna")]
    Dna,
    #[clap(name = "rna")]
    Rna,
    #[clap(name = "protein")]
    Protein,
    #[clap(name = "unknown")]
    Unknown,
}

impl TypeChoice {
    fn type_override(self) -> Option<SequenceType> {
        match self {
            TypeChoice::Auto => None,
            TypeChoice::Dna => Some(SequenceType::Dna),
            TypeChoice::Rna => Some(SequenceType::Rna),
            TypeChoice::Protein => Some(SequenceType::Protein),
            TypeChoice::Unknown => Some(SequenceType::Unknown),
        }
    }
}

fn parse_k(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err(String::from("k must be at least 1")),
        Ok(k) => Ok(k),
        Err(e) => Err(e.to_string()),
    }
}

// Everything needed for one run, after merging command line and config file and validating.
#[derive(Debug, PartialEq)]
pub(crate) struct Job {
    input: PathBuf,
    output: PathBuf,
    options: ExtractOptions,
    format: OutputFormat,
    labels: Option<PathBuf>,
    impute: ImputeStrategy,
}

impl Job {
    pub(crate) fn new(cli: Cli, config: SeqFeatConfig) -> Result<Self> {
        if !cli.input.exists() {
            return Err(SeqFeatError::Usage(format!(
                "Input file not found: {}",
                cli.input.display()
            )));
        }

        if let Some(labels) = &cli.labels {
            if !labels.exists() {
                return Err(SeqFeatError::Usage(format!(
                    "Labels file not found: {}",
                    labels.display()
                )));
            }
        }

        let features = if !cli.feature_types.is_empty() {
            cli.feature_types
        } else {
            config.features.clone().unwrap_or_default()
        };
        if features.is_empty() {
            return Err(SeqFeatError::Usage(String::from(
                "At least one feature type is required (--feature-types)",
            )));
        }

        let k = cli.k.or(config.k);
        if k == Some(0) {
            return Err(SeqFeatError::InvalidK(0));
        }
        if k.is_none() && features.iter().any(|kind| kind.needs_k()) {
            return Err(SeqFeatError::Usage(String::from(
                "--k is required when 'kmer_frequencies' is specified",
            )));
        }

        let type_override = match cli.sequence_type {
            Some(choice) => choice.type_override(),
            None => config.type_override()?,
        };

        let format = cli
            .format
            .or(config.format)
            .unwrap_or_else(|| OutputFormat::from_path(&cli.output));

        let mut options = ExtractOptions::new(&features).with_type_override(type_override);
        options.k = k;

        Ok(Job {
            input: cli.input,
            output: cli.output,
            options,
            format,
            labels: cli.labels,
            impute: cli.impute.or(config.impute).unwrap_or_default(),
        })
    }

    fn describe(&self) -> String {
        format!(
            "Extracting [{}] from {} into {} ({})",
            self.options.features.iter().join(", "),
            self.input.display(),
            self.output.display(),
            match &self.labels {
                Some(labels) => format!("dataset labelled by {}", labels.display()),
                None => self.format.to_string(),
            }
        )
    }

    // Renders the whole output in memory, so that a failure leaves an existing output file alone.
    fn render(&self) -> Result<Vec<u8>> {
        let fasta_content = fs::read_to_string(&self.input)?;
        let table = extract_features(&fasta_content, &self.options);

        let mut buf = Vec::new();
        match &self.labels {
            Some(labels_path) => {
                let labels = read_labels(labels_path)?;
                let dataset = Dataset::build(&table, &labels, self.impute)?;
                info!(
                    "Training dataset: {} row(s) x {} feature(s), impute = {}",
                    dataset.n_rows(),
                    dataset.n_cols(),
                    self.impute
                );
                dataset.write_csv(&mut buf)?;
            }
            None => table.write(&mut buf, self.format)?,
        }
        Ok(buf)
    }

    pub(crate) fn execute(&self) -> Result<()> {
        let output = self.render()?;
        fs::write(&self.output, output)?;
        Ok(())
    }
}

fn load_config(skip: bool) -> Result<SeqFeatConfig> {
    if skip {
        return Ok(SeqFeatConfig::default());
    }
    match find_config() {
        Some(path) => {
            debug!("Reading config from {}", path.display());
            SeqFeatConfig::from_file(&path)
        }
        None => Ok(SeqFeatConfig::default()),
    }
}

pub fn run() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.no_config)?;
    let job = Job::new(cli, config)?;
    info!("{}", job.describe());
    job.execute()?;
    println!("Features extracted and saved to {}", job.output.display());
    Ok(())
}
