//! Process-wide model handle: trained at most once, then read-only.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Serialize;

use crate::dataset::TrainingDataset;
use crate::error::ModelError;
use crate::io::load_heart_csv;
use crate::metrics::{round4, EvaluationMetrics};
use crate::schema::{self, FeatureInfo, FeatureRecord};
use crate::stats::FeatureDistribution;
use crate::trainer::{train_and_evaluate, FittedPipeline, TrainOptions};

/// Answer to one prediction request: the call's echo plus the model output.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub predicted_label: i32,
    /// Positive-class probability, rounded to four decimal places.
    pub predicted_probability: f64,
    pub input_echo: FeatureRecord,
}

struct ReadyState {
    pipeline: FittedPipeline,
    metrics: EvaluationMetrics,
    distributions: BTreeMap<String, FeatureDistribution>,
}

enum ModelState {
    Uninitialized,
    Ready(Box<ReadyState>),
    Failed(String),
}

/// Owner of the fitted pipeline and everything cached from the training run.
///
/// The lifecycle is train-once: `Uninitialized` until the first training
/// call, then `Ready` for the rest of the process, or `Failed` carrying the
/// training error. A `Failed` model is never retrained; callers that want a
/// fresh attempt construct a new `RiskModel`. Once `Ready` the model is
/// immutable, so shared references may serve predictions from any number of
/// threads.
pub struct RiskModel {
    state: ModelState,
}

impl Default for RiskModel {
    fn default() -> Self {
        RiskModel::new()
    }
}

impl RiskModel {
    pub fn new() -> Self {
        RiskModel {
            state: ModelState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    /// The training error message, if training was attempted and failed.
    pub fn failure_cause(&self) -> Option<&str> {
        match &self.state {
            ModelState::Failed(cause) => Some(cause),
            _ => None,
        }
    }

    /// Load the training CSV at `path` and train on it. See [`Self::train`].
    pub fn load_and_train(
        &mut self,
        path: impl AsRef<Path>,
        options: &TrainOptions,
    ) -> Result<(), ModelError> {
        match &self.state {
            ModelState::Ready(_) => return Ok(()),
            ModelState::Failed(cause) => {
                return Err(ModelError::TrainingData(cause.clone()));
            }
            ModelState::Uninitialized => {}
        }
        let dataset = match load_heart_csv(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                self.state = ModelState::Failed(e.to_string());
                return Err(e);
            }
        };
        self.train(&dataset, options)
    }

    /// Train on an already-loaded dataset.
    ///
    /// A model in `Ready` stays as it is and the call succeeds; a model in
    /// `Failed` refuses and reports the original failure. Only the first
    /// call on an `Uninitialized` model does any work.
    pub fn train(
        &mut self,
        dataset: &TrainingDataset,
        options: &TrainOptions,
    ) -> Result<(), ModelError> {
        match &self.state {
            ModelState::Ready(_) => return Ok(()),
            ModelState::Failed(cause) => {
                return Err(ModelError::TrainingData(cause.clone()));
            }
            ModelState::Uninitialized => {}
        }
        match train_and_evaluate(dataset, options) {
            Ok(outcome) => {
                self.state = ModelState::Ready(Box::new(ReadyState {
                    pipeline: outcome.pipeline,
                    metrics: outcome.metrics,
                    distributions: outcome.distributions,
                }));
                Ok(())
            }
            Err(e) => {
                log::error!("training failed: {}", e);
                self.state = ModelState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn ready(&self) -> Result<&ReadyState, ModelError> {
        match &self.state {
            ModelState::Ready(ready) => Ok(ready),
            ModelState::Uninitialized => Err(ModelError::NotTrained(None)),
            ModelState::Failed(cause) => Err(ModelError::NotTrained(Some(cause.clone()))),
        }
    }

    /// Predict from a name → value map, as the serving layer receives it.
    /// Unknown keys are ignored; missing or out-of-range features are
    /// rejected before they reach the pipeline.
    pub fn predict(&self, input: &HashMap<String, i32>) -> Result<Prediction, ModelError> {
        let record = FeatureRecord::from_map(input)?;
        self.predict_record(&record)
    }

    /// Predict from an already-shaped record. Bounds are still enforced.
    pub fn predict_record(&self, record: &FeatureRecord) -> Result<Prediction, ModelError> {
        let ready = self.ready()?;
        record.validate()?;
        let (label, probability) = ready.pipeline.predict(record)?;
        Ok(Prediction {
            predicted_label: label,
            predicted_probability: round4(probability),
            input_echo: *record,
        })
    }

    /// Held-out metrics from the training run.
    pub fn metrics(&self) -> Result<&EvaluationMetrics, ModelError> {
        Ok(&self.ready()?.metrics)
    }

    /// Numeric feature distributions of the training data.
    pub fn distributions(&self) -> Result<&BTreeMap<String, FeatureDistribution>, ModelError> {
        Ok(&self.ready()?.distributions)
    }

    /// Static feature catalogue. Available in every state.
    pub fn feature_info(&self) -> Vec<FeatureInfo> {
        schema::catalogue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_model_is_uninitialized() {
        let model = RiskModel::new();
        assert!(!model.is_ready());
        assert!(model.failure_cause().is_none());
        assert!(matches!(
            model.metrics(),
            Err(ModelError::NotTrained(None))
        ));
    }

    #[test]
    fn predict_before_training_reports_not_trained() {
        let model = RiskModel::new();
        let record = FeatureRecord {
            age: 45,
            sex: 0,
            cp: 0,
            trtbps: 120,
            chol: 200,
            fbs: 0,
            restecg: 0,
            thalachh: 160,
            exng: 0,
            ca: 0,
        };
        assert!(matches!(
            model.predict_record(&record),
            Err(ModelError::NotTrained(None))
        ));
    }

    #[test]
    fn feature_info_works_in_every_state() {
        let model = RiskModel::new();
        assert_eq!(model.feature_info().len(), 10);
    }
}
