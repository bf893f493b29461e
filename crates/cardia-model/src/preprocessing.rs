//! Column-wise preprocessing fitted once from training data.
//!
//! The transform lays out a fixed-length vector as: the four standardized
//! numeric features, then one one-hot block per categorical feature over the
//! categories observed at fit time, then the three binary features passed
//! through. Field order inside each group follows the canonical column
//! order, so the layout is identical at fit time and at every inference.

use ndarray::{Array1, Array2};

use crate::schema::{Feature, FeatureRecord};

/// Per-numeric-column standardization parameters (population std).
#[derive(Debug, Clone)]
struct ColumnScaler {
    mean: f64,
    std: f64,
}

impl ColumnScaler {
    fn fit(values: impl Iterator<Item = f64> + Clone, n: usize) -> ColumnScaler {
        let mean = values.clone().sum::<f64>() / n as f64;
        let var = values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
        ColumnScaler {
            mean,
            std: var.sqrt(),
        }
    }

    /// Standardize one value. A zero-variance column maps every input to 0
    /// rather than dividing by zero.
    fn transform(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            0.0
        } else {
            (value - self.mean) / self.std
        }
    }
}

/// Deterministic record-to-vector transform, fit once and then frozen.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    scalers: Vec<ColumnScaler>,
    categories: Vec<Vec<i32>>,
    width: usize,
}

impl Preprocessor {
    /// Fit from training records: mean/std per numeric column, the ascending
    /// set of observed values per categorical column, nothing for binaries.
    pub fn fit(records: &[FeatureRecord]) -> Preprocessor {
        assert!(
            !records.is_empty(),
            "Preprocessor::fit requires at least one record"
        );
        let n = records.len();

        let scalers: Vec<ColumnScaler> = Feature::NUMERIC
            .iter()
            .map(|&feature| {
                ColumnScaler::fit(records.iter().map(move |r| r.get(feature) as f64), n)
            })
            .collect();

        let categories: Vec<Vec<i32>> = Feature::CATEGORICAL
            .iter()
            .map(|&feature| {
                let mut observed: Vec<i32> = records.iter().map(|r| r.get(feature)).collect();
                observed.sort_unstable();
                observed.dedup();
                observed
            })
            .collect();

        let width = Feature::NUMERIC.len()
            + categories.iter().map(|c| c.len()).sum::<usize>()
            + Feature::BINARY.len();

        log::debug!(
            "Fitted preprocessor on {} records; output width {}",
            n,
            width
        );

        Preprocessor {
            scalers,
            categories,
            width,
        }
    }

    /// Length of the transformed vector, stable for the life of the fit.
    pub fn output_width(&self) -> usize {
        self.width
    }

    /// Transform a single record into the fixed-layout vector.
    ///
    /// A categorical value not seen during fit produces an all-zero one-hot
    /// block for that feature; it never fails.
    pub fn transform(&self, record: &FeatureRecord) -> Array1<f64> {
        let mut out = Vec::with_capacity(self.width);

        for (scaler, &feature) in self.scalers.iter().zip(Feature::NUMERIC.iter()) {
            out.push(scaler.transform(record.get(feature) as f64));
        }

        for (observed, &feature) in self.categories.iter().zip(Feature::CATEGORICAL.iter()) {
            let value = record.get(feature);
            for &category in observed {
                out.push(if category == value { 1.0 } else { 0.0 });
            }
        }

        for &feature in Feature::BINARY.iter() {
            out.push(record.get(feature) as f64);
        }

        Array1::from_vec(out)
    }

    /// Transform a batch of records into a design matrix, one row per record.
    pub fn transform_all(&self, records: &[FeatureRecord]) -> Array2<f64> {
        let mut out = Vec::with_capacity(records.len() * self.width);
        for record in records {
            out.extend(self.transform(record).to_vec());
        }
        Array2::from_shape_vec((records.len(), self.width), out)
            .expect("transform_all: row width drifted from fitted layout")
    }
}
