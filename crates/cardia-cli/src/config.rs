//! CLI configuration for training runs.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use cardia_model::trainer::TrainOptions;

use crate::util::validate_csv_file;

/// Parameters for a `cardia train` or `cardia predict` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Path to the training CSV. Required, from the file or `--data`.
    pub data: Option<PathBuf>,
    /// Where the HTML training report is written.
    pub report: PathBuf,
    pub model: TrainOptions,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            data: None,
            report: PathBuf::from("cardia_training_report.html"),
            model: TrainOptions::default(),
        }
    }
}

/// Load a training configuration from a JSON file.
pub fn load_train_config<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: TrainConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

impl TrainConfig {
    /// Effective configuration: the optional JSON file, then CLI overrides
    /// shared by the `train` and `predict` subcommands.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_train_config(path)?,
            None => TrainConfig::default(),
        };

        if let Some(data) = matches.get_one::<PathBuf>("data") {
            config.data = Some(data.clone());
        }
        if let Some(fraction) = matches.get_one::<f64>("test_fraction") {
            config.model.test_fraction = *fraction;
        }
        if let Some(seed) = matches.get_one::<u64>("seed") {
            config.model.seed = *seed;
        }
        if let Some(max_iter) = matches.get_one::<usize>("max_iter") {
            config.model.max_iter = *max_iter;
        }
        if let Some(learning_rate) = matches.get_one::<f64>("learning_rate") {
            config.model.learning_rate = *learning_rate;
        }

        if let Some(data) = &config.data {
            validate_csv_file(&data.to_string_lossy())?;
        }
        Ok(config)
    }

    /// The training data path; every command that trains needs one.
    pub fn data_path(&self) -> Result<&PathBuf> {
        self.data.as_ref().ok_or_else(|| {
            anyhow::anyhow!("no training data provided; pass --data or set \"data\" in the config")
        })
    }
}
