use std::error::Error;
use std::fmt;

/// Error taxonomy for the model subsystem.
///
/// `SchemaMismatch` is the caller's fault (bad feature input) and maps to a
/// client error upstream. `TrainingData` is a fatal startup condition (bad
/// source data). `NotTrained` signals a call before the model reached the
/// `Ready` state and maps to service-unavailable upstream. None of these are
/// retried within the core.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Malformed, incomplete, or out-of-range feature input.
    SchemaMismatch(String),
    /// Unusable training data (missing columns, unparseable rows, too few classes).
    TrainingData(String),
    /// Operation requires a trained model; carries the original failure cause
    /// when training was attempted and failed.
    NotTrained(Option<String>),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelError::SchemaMismatch(msg) => write!(f, "Invalid feature input: {}", msg),
            ModelError::TrainingData(msg) => write!(f, "Training data error: {}", msg),
            ModelError::NotTrained(None) => write!(f, "Model is not trained"),
            ModelError::NotTrained(Some(cause)) => {
                write!(f, "Model is not trained: {}", cause)
            }
        }
    }
}

impl Error for ModelError {}
