//! Binary logistic-regression classifier over preprocessed feature vectors.

use ndarray::{Array1, Array2};

use crate::error::ModelError;

/// Fitted linear parameters. Produced once per training run and immutable
/// afterward.
#[derive(Debug, Clone)]
pub struct LinearWeights {
    pub weights: Array1<f64>,
    pub bias: f64,
}

/// Logistic regression trained with full-batch gradient descent.
///
/// Weights initialize to zero, so fitting on fixed data is fully
/// deterministic. The optimizer is bounded by `max_iter` and stops early
/// when the log-loss improvement drops below `tolerance`; training
/// terminates either way, converged or not.
#[derive(Debug)]
pub struct LogisticRegression {
    model: Option<LinearWeights>,
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, max_iter: usize, tolerance: f64) -> Self {
        LogisticRegression {
            model: None,
            learning_rate,
            max_iter,
            tolerance,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Fitted parameters, once training has run.
    pub fn linear_weights(&self) -> Option<&LinearWeights> {
        self.model.as_ref()
    }

    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }

    /// Fit on a design matrix `x` (rows are samples) and 0/1 labels.
    /// Returns the number of iterations run.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> usize {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        assert!(
            n_samples > 0 && n_features > 0,
            "LogisticRegression::fit requires a non-empty matrix"
        );
        assert_eq!(
            n_samples,
            y.len(),
            "LogisticRegression::fit requires one label per row"
        );

        let targets: Array1<f64> = y.iter().map(|&label| label as f64).collect();
        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0f64;
        let n = n_samples as f64;

        let mut prev_loss = f64::INFINITY;
        let mut iterations = 0;
        for iter in 0..self.max_iter {
            iterations = iter + 1;

            let z = x.dot(&weights) + bias;
            let probabilities = z.mapv(Self::sigmoid);
            let residuals = &probabilities - &targets;

            let grad_w = x.t().dot(&residuals) / n;
            let grad_b = residuals.sum() / n;
            weights = weights - self.learning_rate * &grad_w;
            bias -= self.learning_rate * grad_b;

            let loss = log_loss(&probabilities, &targets);
            log::trace!("iteration {}: log-loss {:.6}", iterations, loss);
            if (prev_loss - loss).abs() < self.tolerance {
                break;
            }
            prev_loss = loss;
        }

        self.model = Some(LinearWeights { weights, bias });
        iterations
    }

    /// Probability of the positive class for one preprocessed vector.
    pub fn predict_proba(&self, x: &Array1<f64>) -> Result<f64, ModelError> {
        let fitted = self.model.as_ref().ok_or(ModelError::NotTrained(None))?;
        Ok(Self::sigmoid(fitted.weights.dot(x) + fitted.bias))
    }

    /// `(label, probability)` with label 1 iff probability >= 0.5.
    pub fn predict(&self, x: &Array1<f64>) -> Result<(i32, f64), ModelError> {
        let probability = self.predict_proba(x)?;
        let label = if probability >= 0.5 { 1 } else { 0 };
        Ok((label, probability))
    }
}

/// Mean negative log-likelihood, with probabilities clamped away from 0 and
/// 1 so the logs stay finite.
fn log_loss(probabilities: &Array1<f64>, targets: &Array1<f64>) -> f64 {
    let eps = 1e-12;
    let n = targets.len() as f64;
    probabilities
        .iter()
        .zip(targets.iter())
        .map(|(&p, &t)| {
            let p = p.clamp(eps, 1.0 - eps);
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        })
        .sum::<f64>()
        / n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_data() -> (Array2<f64>, Vec<i32>) {
        // One informative feature: positives cluster at +1, negatives at -1.
        let x = Array2::from_shape_vec(
            (8, 2),
            vec![
                1.0, 0.3, //
                1.2, -0.1, //
                0.8, 0.5, //
                1.1, 0.0, //
                -1.0, 0.2, //
                -0.9, -0.4, //
                -1.2, 0.1, //
                -0.8, -0.2, //
            ],
        )
        .unwrap();
        let y = vec![1, 1, 1, 1, 0, 0, 0, 0];
        (x, y)
    }

    #[test]
    fn predict_before_fit_is_not_trained() {
        let clf = LogisticRegression::new(0.1, 100, 1e-6);
        let x = Array1::from_vec(vec![0.0, 0.0]);
        assert!(matches!(
            clf.predict(&x),
            Err(ModelError::NotTrained(None))
        ));
    }

    #[test]
    fn fit_separates_linearly_separable_classes() {
        let (x, y) = separable_data();
        let mut clf = LogisticRegression::new(0.5, 500, 1e-9);
        let iterations = clf.fit(&x, &y);
        assert!(iterations > 0 && iterations <= 500);

        for (row, &label) in x.outer_iter().zip(y.iter()) {
            let (pred, proba) = clf.predict(&row.to_owned()).unwrap();
            assert!((0.0..=1.0).contains(&proba));
            assert_eq!(pred, label, "misclassified row with proba {}", proba);
        }
    }

    #[test]
    fn label_threshold_matches_probability() {
        let (x, y) = separable_data();
        let mut clf = LogisticRegression::new(0.5, 200, 1e-9);
        clf.fit(&x, &y);
        let (label, proba) = clf.predict(&Array1::from_vec(vec![0.05, 0.0])).unwrap();
        assert_eq!(label == 1, proba >= 0.5);
    }

    #[test]
    fn fit_is_deterministic() {
        let (x, y) = separable_data();
        let mut a = LogisticRegression::new(0.3, 300, 1e-9);
        let mut b = LogisticRegression::new(0.3, 300, 1e-9);
        a.fit(&x, &y);
        b.fit(&x, &y);
        let wa = a.linear_weights().unwrap();
        let wb = b.linear_weights().unwrap();
        assert_eq!(wa.bias, wb.bias);
        assert_eq!(wa.weights, wb.weights);
    }

    #[test]
    fn fit_terminates_at_max_iter_without_convergence() {
        let (x, y) = separable_data();
        let mut clf = LogisticRegression::new(0.5, 7, 0.0);
        let iterations = clf.fit(&x, &y);
        assert_eq!(iterations, 7);
        assert!(clf.is_fitted());
    }
}
