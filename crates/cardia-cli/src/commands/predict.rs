//! The `predict` subcommand: train in-process, then score one record.
//!
//! There is no model persistence, so every prediction run retrains from the
//! configured CSV. Training is deterministic for a fixed seed, which keeps
//! repeated runs consistent.
use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use cardia_model::facade::{Prediction, RiskModel};

use crate::commands::train::run_train;
use crate::config::TrainConfig;

/// Read one prediction request, a JSON object mapping feature names to
/// integer values, from a file.
pub fn read_input_record<P: AsRef<Path>>(path: P) -> Result<HashMap<String, i32>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read input: {}", path.as_ref().display()))?;
    let input: HashMap<String, i32> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse input: {}", path.as_ref().display()))?;
    Ok(input)
}

pub fn run_predict(config: &TrainConfig, input: &HashMap<String, i32>) -> Result<Prediction> {
    let model: RiskModel = run_train(config)?;
    let prediction = model.predict(input)?;
    Ok(prediction)
}
