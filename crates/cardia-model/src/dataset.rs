//! In-memory training dataset and the stratified train/test split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::ModelError;
use crate::schema::FeatureRecord;

/// Ordered rows of (record, binary target label) as loaded from the source
/// file. Owned by the trainer during fit; only derived statistics outlive it.
#[derive(Debug, Clone)]
pub struct TrainingDataset {
    records: Vec<FeatureRecord>,
    labels: Vec<i32>,
}

impl TrainingDataset {
    /// Pair records with their 0/1 target labels. Any other label value is
    /// rejected here so it can never reach the classifier or the evaluator.
    pub fn new(records: Vec<FeatureRecord>, labels: Vec<i32>) -> Result<Self, ModelError> {
        if records.len() != labels.len() {
            return Err(ModelError::TrainingData(format!(
                "record and label counts differ ({} vs {})",
                records.len(),
                labels.len()
            )));
        }
        if let Some(row) = labels.iter().position(|&y| y != 0 && y != 1) {
            return Err(ModelError::TrainingData(format!(
                "invalid target value {} at row {}; expected 0 or 1",
                labels[row],
                row + 1
            )));
        }
        Ok(TrainingDataset { records, labels })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// (negative, positive) label counts.
    pub fn class_counts(&self) -> (usize, usize) {
        let positives = self.labels.iter().filter(|&&y| y == 1).count();
        (self.labels.len() - positives, positives)
    }

    /// Fraction of rows with a positive label.
    pub fn positive_fraction(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        let (_, positives) = self.class_counts();
        positives as f64 / self.labels.len() as f64
    }

    fn select(&self, indices: &[usize]) -> TrainingDataset {
        TrainingDataset {
            records: indices.iter().map(|&i| self.records[i]).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Split into (train, test) with `test_fraction` of each class held out,
    /// so both splits preserve the overall class ratio. The shuffle is driven
    /// by `seed` alone, making the split reproducible across runs.
    ///
    /// Fails with `TrainingData` if either class is absent, since a
    /// stratified split needs both label values present.
    pub fn stratified_split(
        &self,
        test_fraction: f64,
        seed: u64,
    ) -> Result<(TrainingDataset, TrainingDataset), ModelError> {
        if self.is_empty() {
            return Err(ModelError::TrainingData(
                "cannot split an empty dataset".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&test_fraction) {
            return Err(ModelError::TrainingData(format!(
                "test fraction must be in [0, 1), got {}",
                test_fraction
            )));
        }

        let mut positives: Vec<usize> = Vec::new();
        let mut negatives: Vec<usize> = Vec::new();
        for (i, &label) in self.labels.iter().enumerate() {
            if label == 1 {
                positives.push(i);
            } else {
                negatives.push(i);
            }
        }
        if positives.is_empty() || negatives.is_empty() {
            return Err(ModelError::TrainingData(
                "dataset has fewer than 2 distinct target labels; stratified split impossible"
                    .to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        positives.shuffle(&mut rng);
        negatives.shuffle(&mut rng);

        let mut train_indices = Vec::with_capacity(self.len());
        let mut test_indices = Vec::with_capacity(self.len());
        for class_indices in [&positives, &negatives] {
            let n_test = per_class_test_count(class_indices.len(), test_fraction);
            test_indices.extend_from_slice(&class_indices[..n_test]);
            train_indices.extend_from_slice(&class_indices[n_test..]);
        }

        log::debug!(
            "Stratified split (seed {}): {} train rows, {} test rows",
            seed,
            train_indices.len(),
            test_indices.len()
        );

        Ok((self.select(&train_indices), self.select(&test_indices)))
    }
}

/// Held-out count for one class: the rounded fraction, clamped so the train
/// side keeps at least one row of the class.
fn per_class_test_count(class_size: usize, test_fraction: f64) -> usize {
    let rounded = (class_size as f64 * test_fraction).round() as usize;
    rounded.min(class_size.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_age(age: i32) -> FeatureRecord {
        FeatureRecord {
            age,
            sex: 0,
            cp: 0,
            trtbps: 120,
            chol: 200,
            fbs: 0,
            restecg: 0,
            thalachh: 150,
            exng: 0,
            ca: 0,
        }
    }

    fn dataset(n_positive: usize, n_negative: usize) -> TrainingDataset {
        let mut records = Vec::new();
        let mut labels = Vec::new();
        for i in 0..n_positive {
            records.push(record_with_age(40 + (i % 40) as i32));
            labels.push(1);
        }
        for i in 0..n_negative {
            records.push(record_with_age(30 + (i % 40) as i32));
            labels.push(0);
        }
        TrainingDataset::new(records, labels).unwrap()
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let result = TrainingDataset::new(vec![record_with_age(50)], vec![1, 0]);
        assert!(result.is_err());
    }

    #[test]
    fn new_rejects_non_binary_labels() {
        let records = vec![record_with_age(50), record_with_age(60)];
        let err = TrainingDataset::new(records, vec![1, 2]).unwrap_err();
        match err {
            ModelError::TrainingData(msg) => {
                assert!(msg.contains("expected 0 or 1"), "got: {}", msg);
                assert!(msg.contains("row 2"), "got: {}", msg);
            }
            other => panic!("expected TrainingData, got {:?}", other),
        }
    }

    #[test]
    fn split_is_deterministic_for_fixed_seed() {
        let data = dataset(60, 40);
        let (train_a, test_a) = data.stratified_split(0.2, 0).unwrap();
        let (train_b, test_b) = data.stratified_split(0.2, 0).unwrap();
        assert_eq!(train_a.records(), train_b.records());
        assert_eq!(test_a.labels(), test_b.labels());
    }

    #[test]
    fn split_preserves_class_ratio() {
        let data = dataset(120, 80);
        let full_fraction = data.positive_fraction();
        let (train, test) = data.stratified_split(0.2, 0).unwrap();
        assert!((train.positive_fraction() - full_fraction).abs() < 0.02);
        assert!((test.positive_fraction() - full_fraction).abs() < 0.02);
        assert_eq!(train.len() + test.len(), data.len());
    }

    #[test]
    fn split_rejects_single_class() {
        let data = dataset(10, 0);
        let err = data.stratified_split(0.2, 0).unwrap_err();
        match err {
            ModelError::TrainingData(msg) => assert!(msg.contains("distinct")),
            other => panic!("expected TrainingData, got {:?}", other),
        }
    }

    #[test]
    fn per_class_count_leaves_train_nonempty() {
        assert_eq!(per_class_test_count(2, 0.9), 1);
        assert_eq!(per_class_test_count(1, 0.5), 0);
        assert_eq!(per_class_test_count(10, 0.2), 2);
    }
}
