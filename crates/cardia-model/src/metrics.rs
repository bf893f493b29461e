//! Held-out evaluation of a trained classifier.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Scores computed on the held-out test split at the end of a training run.
///
/// The confusion matrix is laid out `[[tn, fp], [fn, tp]]`. All rates are
/// rounded to four decimal places; any rate whose denominator is zero is
/// reported as `0.0` instead of NaN.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub confusion_matrix: [[usize; 2]; 2],
    pub train_size: usize,
    pub test_size: usize,
    pub trained_at: DateTime<Utc>,
}

/// Round to four decimal places, the precision everything user-facing is
/// reported at.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Score `predicted` against `actual` 0/1 labels.
///
/// `train_size` is carried through so the metrics record the full shape of
/// the run that produced them.
pub fn evaluate(actual: &[i32], predicted: &[i32], train_size: usize) -> EvaluationMetrics {
    assert_eq!(
        actual.len(),
        predicted.len(),
        "evaluate requires one prediction per actual label"
    );

    let mut tn = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    let mut tp = 0usize;
    for (&a, &p) in actual.iter().zip(predicted.iter()) {
        match (a, p) {
            (0, 0) => tn += 1,
            (0, 1) => fp += 1,
            (1, 0) => fn_ += 1,
            (1, 1) => tp += 1,
            _ => panic!("labels must be 0 or 1, got actual {} predicted {}", a, p),
        }
    }

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    EvaluationMetrics {
        accuracy: round4(ratio(tp + tn, actual.len())),
        precision: round4(precision),
        recall: round4(recall),
        f1_score: round4(f1),
        confusion_matrix: [[tn, fp], [fn_, tp]],
        train_size,
        test_size: actual.len(),
        trained_at: Utc::now(),
    }
}
