//! End-to-end training: split, fit the preprocessing pipeline and
//! classifier on the train portion, score the held-out portion.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classifier::LogisticRegression;
use crate::dataset::TrainingDataset;
use crate::error::ModelError;
use crate::metrics::{self, EvaluationMetrics};
use crate::preprocessing::Preprocessor;
use crate::schema::FeatureRecord;
use crate::stats::{self, FeatureDistribution};

/// Knobs for a training run. All fields have defaults, so a JSON config
/// may set any subset of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    /// Fraction of each class held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the split shuffle. Fixed seed, fixed split.
    pub seed: u64,
    pub learning_rate: f64,
    pub max_iter: usize,
    pub tolerance: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        TrainOptions {
            test_fraction: 0.2,
            seed: 0,
            learning_rate: 0.1,
            max_iter: 1000,
            tolerance: 1e-6,
        }
    }
}

impl TrainOptions {
    fn validate(&self) -> Result<(), ModelError> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ModelError::TrainingData(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        if self.max_iter == 0 {
            return Err(ModelError::TrainingData(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ModelError::TrainingData(format!(
                "tolerance must be non-negative and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// A fitted preprocessor and classifier, applied together. This is the
/// only path from a raw feature record to a prediction.
#[derive(Debug)]
pub struct FittedPipeline {
    preprocessor: Preprocessor,
    classifier: LogisticRegression,
}

impl FittedPipeline {
    pub fn predict_proba(&self, record: &FeatureRecord) -> Result<f64, ModelError> {
        self.classifier
            .predict_proba(&self.preprocessor.transform(record))
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<(i32, f64), ModelError> {
        self.classifier
            .predict(&self.preprocessor.transform(record))
    }
}

/// Everything a training run produces.
#[derive(Debug)]
pub struct TrainOutcome {
    pub pipeline: FittedPipeline,
    pub metrics: EvaluationMetrics,
    pub distributions: BTreeMap<String, FeatureDistribution>,
}

/// Train a classifier on `dataset` and evaluate it on a stratified
/// held-out split.
///
/// Feature distributions are summarized over the full dataset before the
/// split, so they describe the data as loaded rather than the train
/// portion.
pub fn train_and_evaluate(
    dataset: &TrainingDataset,
    options: &TrainOptions,
) -> Result<TrainOutcome, ModelError> {
    options.validate()?;
    if dataset.is_empty() {
        return Err(ModelError::TrainingData(
            "cannot train on an empty dataset".to_string(),
        ));
    }

    let distributions = stats::summarize(dataset.records());
    let (train, test) = dataset.stratified_split(options.test_fraction, options.seed)?;
    let (negatives, positives) = train.class_counts();
    log::info!(
        "training on {} records ({} positive / {} negative), holding out {}",
        train.len(),
        positives,
        negatives,
        test.len()
    );

    let preprocessor = Preprocessor::fit(train.records());
    let design = preprocessor.transform_all(train.records());
    let mut classifier = LogisticRegression::new(
        options.learning_rate,
        options.max_iter,
        options.tolerance,
    );
    let iterations = classifier.fit(&design, train.labels());
    log::info!(
        "gradient descent finished after {} of {} iterations",
        iterations,
        options.max_iter
    );

    let pipeline = FittedPipeline {
        preprocessor,
        classifier,
    };
    let predicted = test
        .records()
        .par_iter()
        .map(|record| pipeline.predict(record).map(|(label, _)| label))
        .collect::<Result<Vec<_>, _>>()?;
    let metrics = metrics::evaluate(test.labels(), &predicted, train.len());
    log::info!(
        "held-out accuracy {:.4}, f1 {:.4}",
        metrics.accuracy,
        metrics.f1_score
    );

    Ok(TrainOutcome {
        pipeline,
        metrics,
        distributions,
    })
}
