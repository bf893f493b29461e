//! Heart dataset CSV reader.
use std::path::Path;

use csv::StringRecord;

use crate::dataset::TrainingDataset;
use crate::error::ModelError;
use crate::schema::{Feature, FeatureRecord, TARGET_COLUMN};

/// Read the heart dataset from a headered CSV file.
///
/// The file must carry all ten feature columns plus the `target` column;
/// header names are matched case-insensitively and unrecognized columns are
/// ignored. Any missing required column, unparseable cell, or empty file is
/// a fatal `TrainingData` error. Cell values are taken as-is — schema bounds
/// apply to prediction input, not to the training source.
pub fn load_heart_csv<P: AsRef<Path>>(path: P) -> Result<TrainingDataset, ModelError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| {
            ModelError::TrainingData(format!("failed to open dataset {}: {}", path.display(), e))
        })?;

    let headers = reader
        .headers()
        .map_err(|e| ModelError::TrainingData(format!("failed to read header row: {}", e)))?
        .clone();

    let mut feature_indices = [0usize; 10];
    let mut missing: Vec<&str> = Vec::new();
    for (slot, feature) in feature_indices.iter_mut().zip(Feature::ALL) {
        match find_column(&headers, feature.name()) {
            Some(idx) => *slot = idx,
            None => missing.push(feature.name()),
        }
    }
    let target_idx = match find_column(&headers, TARGET_COLUMN) {
        Some(idx) => idx,
        None => {
            missing.push(TARGET_COLUMN);
            0
        }
    };
    if !missing.is_empty() {
        return Err(ModelError::TrainingData(format!(
            "missing columns in dataset: {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    let mut labels = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row = result.map_err(|e| {
            ModelError::TrainingData(format!("failed to read row {}: {}", row_idx + 1, e))
        })?;

        let mut values = [0i32; 10];
        for (value, (&col_idx, feature)) in values
            .iter_mut()
            .zip(feature_indices.iter().zip(Feature::ALL))
        {
            *value = parse_cell(&row, col_idx, feature.name(), row_idx)?;
        }
        let [age, sex, cp, trtbps, chol, fbs, restecg, thalachh, exng, ca] = values;
        records.push(FeatureRecord {
            age,
            sex,
            cp,
            trtbps,
            chol,
            fbs,
            restecg,
            thalachh,
            exng,
            ca,
        });

        let label = parse_cell(&row, target_idx, TARGET_COLUMN, row_idx)?;
        if label != 0 && label != 1 {
            return Err(ModelError::TrainingData(format!(
                "invalid target value {} at row {}; expected 0 or 1",
                label,
                row_idx + 1
            )));
        }
        labels.push(label);
    }

    if records.is_empty() {
        return Err(ModelError::TrainingData(format!(
            "dataset {} contains no data rows",
            path.display()
        )));
    }

    log::info!(
        "Loaded {} rows from {}",
        records.len(),
        path.display()
    );

    TrainingDataset::new(records, labels)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn parse_cell(
    row: &StringRecord,
    col_idx: usize,
    column: &str,
    row_idx: usize,
) -> Result<i32, ModelError> {
    let raw = row.get(col_idx).ok_or_else(|| {
        ModelError::TrainingData(format!(
            "missing value for '{}' at row {}",
            column,
            row_idx + 1
        ))
    })?;
    raw.trim().parse::<i32>().map_err(|_| {
        ModelError::TrainingData(format!(
            "invalid value '{}' for '{}' at row {}",
            raw,
            column,
            row_idx + 1
        ))
    })
}
