//! The `train` subcommand: fit the risk model and log its held-out scores.
use anyhow::{Context, Result};

use cardia_model::facade::RiskModel;

use crate::config::TrainConfig;

pub fn run_train(config: &TrainConfig) -> Result<RiskModel> {
    let data = config.data_path()?;
    let mut model = RiskModel::new();
    model
        .load_and_train(data, &config.model)
        .with_context(|| format!("Training failed on {}", data.display()))?;

    {
        let metrics = model.metrics()?;
        log::info!(
            "Accuracy {:.4} | Precision {:.4} | Recall {:.4} | F1 {:.4}",
            metrics.accuracy,
            metrics.precision,
            metrics.recall,
            metrics.f1_score
        );
        log::info!(
            "Trained on {} rows, evaluated on {}",
            metrics.train_size,
            metrics.test_size
        );
    }

    Ok(model)
}
