//! Descriptive statistics over the raw training data, computed for the
//! numeric features before any split or standardization.

use std::collections::BTreeMap;

use itertools_num::linspace;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::metrics::round4;
use crate::schema::{Feature, FeatureRecord};

/// Number of equal-width bins in every feature histogram.
pub const HISTOGRAM_BINS: usize = 20;

/// Histogram and moments of one numeric feature across the whole dataset.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureDistribution {
    pub histogram: Vec<usize>,
    pub bin_edges: Vec<f64>,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

/// Equal-width histogram over `[lo, hi]` where the last bin is closed on
/// both sides. A constant column widens to `[lo - 0.5, hi + 0.5]` so the
/// counts still land somewhere sensible.
fn histogram(values: &[f64]) -> (Vec<usize>, Vec<f64>) {
    assert!(!values.is_empty(), "histogram requires at least one value");

    let mut lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = hi - lo;
    let mut counts = vec![0usize; HISTOGRAM_BINS];
    for &value in values {
        let position = (value - lo) / width * HISTOGRAM_BINS as f64;
        let bin = (position.floor() as usize).min(HISTOGRAM_BINS - 1);
        counts[bin] += 1;
    }

    let edges = linspace(lo, hi, HISTOGRAM_BINS + 1).collect();
    (counts, edges)
}

fn distribution(values: &[f64]) -> FeatureDistribution {
    let (counts, edges) = histogram(values);
    FeatureDistribution {
        histogram: counts,
        bin_edges: edges.into_iter().map(round4).collect(),
        min: values.iter().cloned().fold(f64::INFINITY, f64::min),
        max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        mean: round4(values.iter().mean()),
        std: round4(values.iter().population_std_dev()),
    }
}

/// Distributions for every numeric feature, keyed by feature name.
pub fn summarize(records: &[FeatureRecord]) -> BTreeMap<String, FeatureDistribution> {
    Feature::NUMERIC
        .iter()
        .map(|&feature| {
            let values: Vec<f64> = records.iter().map(|r| r.get(feature) as f64).collect();
            (feature.name().to_string(), distribution(&values))
        })
        .collect()
}
