//! Static catalogue of the ten clinical input features.
//!
//! The canonical column order defined by [`Feature::ALL`] is load-bearing:
//! the preprocessor lays out its output vector positionally from this order
//! and the classifier's weights are only meaningful against that layout.
//! All positional iteration over features goes through this module so the
//! order is fixed in exactly one place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One of the ten named input features, in no particular order by itself;
/// ordering comes from [`Feature::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Age,
    Sex,
    Cp,
    Trtbps,
    Chol,
    Fbs,
    Restecg,
    Thalachh,
    Exng,
    Ca,
}

/// Semantic kind of a feature, driving its preprocessing treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Standardized to zero mean / unit variance at transform time.
    Numeric,
    /// Passed through unchanged as 0/1.
    Binary,
    /// One-hot expanded over the categories observed during fit.
    Categorical,
}

/// Display and validation metadata for a single feature.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureInfo {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub kind: FeatureKind,
    pub min: i32,
    pub max: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    /// Ordered option labels for binary/categorical features, indexed by value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [&'static str]>,
}

impl Feature {
    /// Canonical column order used everywhere a feature vector is built.
    pub const ALL: [Feature; 10] = [
        Feature::Age,
        Feature::Sex,
        Feature::Cp,
        Feature::Trtbps,
        Feature::Chol,
        Feature::Fbs,
        Feature::Restecg,
        Feature::Thalachh,
        Feature::Exng,
        Feature::Ca,
    ];

    /// Numeric features, in canonical order.
    pub const NUMERIC: [Feature; 4] = [
        Feature::Age,
        Feature::Trtbps,
        Feature::Chol,
        Feature::Thalachh,
    ];

    /// Categorical features, in canonical order.
    pub const CATEGORICAL: [Feature; 3] = [Feature::Cp, Feature::Restecg, Feature::Ca];

    /// Binary features, in canonical order.
    pub const BINARY: [Feature; 3] = [Feature::Sex, Feature::Fbs, Feature::Exng];

    /// Column name as it appears in the source CSV and in serialized records.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::Sex => "sex",
            Feature::Cp => "cp",
            Feature::Trtbps => "trtbps",
            Feature::Chol => "chol",
            Feature::Fbs => "fbs",
            Feature::Restecg => "restecg",
            Feature::Thalachh => "thalachh",
            Feature::Exng => "exng",
            Feature::Ca => "ca",
        }
    }

    pub fn kind(self) -> FeatureKind {
        match self {
            Feature::Age | Feature::Trtbps | Feature::Chol | Feature::Thalachh => {
                FeatureKind::Numeric
            }
            Feature::Sex | Feature::Fbs | Feature::Exng => FeatureKind::Binary,
            Feature::Cp | Feature::Restecg | Feature::Ca => FeatureKind::Categorical,
        }
    }

    /// Inclusive validation bounds for prediction input.
    pub fn bounds(self) -> (i32, i32) {
        match self {
            Feature::Age => (1, 120),
            Feature::Sex => (0, 1),
            Feature::Cp => (0, 3),
            Feature::Trtbps => (50, 250),
            Feature::Chol => (80, 700),
            Feature::Fbs => (0, 1),
            Feature::Restecg => (0, 2),
            Feature::Thalachh => (50, 250),
            Feature::Exng => (0, 1),
            Feature::Ca => (0, 3),
        }
    }

    /// Full display metadata for this feature.
    pub fn describe(self) -> FeatureInfo {
        let (min, max) = self.bounds();
        let (label, description, unit, options): (
            &'static str,
            &'static str,
            Option<&'static str>,
            Option<&'static [&'static str]>,
        ) = match self {
            Feature::Age => ("Age", "Patient age in years", None, None),
            Feature::Sex => ("Sex", "Biological sex", None, Some(&["Female", "Male"])),
            Feature::Cp => (
                "Chest Pain Type",
                "Type of chest pain experienced",
                None,
                Some(&[
                    "Typical Angina",
                    "Atypical Angina",
                    "Non-Anginal Pain",
                    "Asymptomatic",
                ]),
            ),
            Feature::Trtbps => (
                "Resting Blood Pressure",
                "Resting blood pressure in mm Hg on admission",
                Some("mm Hg"),
                None,
            ),
            Feature::Chol => (
                "Cholesterol",
                "Serum cholesterol level",
                Some("mg/dl"),
                None,
            ),
            Feature::Fbs => (
                "Fasting Blood Sugar",
                "Fasting blood sugar > 120 mg/dl",
                None,
                Some(&["No (<=120 mg/dl)", "Yes (>120 mg/dl)"]),
            ),
            Feature::Restecg => (
                "Resting ECG",
                "Resting electrocardiographic results",
                None,
                Some(&[
                    "Normal",
                    "ST-T Wave Abnormality",
                    "Left Ventricular Hypertrophy",
                ]),
            ),
            Feature::Thalachh => (
                "Max Heart Rate",
                "Maximum heart rate achieved during exercise",
                Some("bpm"),
                None,
            ),
            Feature::Exng => (
                "Exercise-Induced Angina",
                "Exercise-induced chest pain",
                None,
                Some(&["No", "Yes"]),
            ),
            Feature::Ca => (
                "Major Vessels",
                "Number of major vessels colored by fluoroscopy",
                None,
                Some(&["0 vessels", "1 vessel", "2 vessels", "3 vessels"]),
            ),
        };

        FeatureInfo {
            name: self.name(),
            label,
            description,
            kind: self.kind(),
            min,
            max,
            unit,
            options,
        }
    }
}

/// Name of the binary target column in the source data.
pub const TARGET_COLUMN: &str = "target";

/// The full feature catalogue in canonical order, for building input forms.
pub fn catalogue() -> Vec<FeatureInfo> {
    Feature::ALL.iter().map(|f| f.describe()).collect()
}

/// A single patient record: one integer value per feature, fields declared in
/// the canonical column order. Fixed shape by construction, so a record can
/// never be missing a feature once it exists; completeness checks live in
/// [`FeatureRecord::from_map`] for callers holding dynamic key/value input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub age: i32,
    pub sex: i32,
    pub cp: i32,
    pub trtbps: i32,
    pub chol: i32,
    pub fbs: i32,
    pub restecg: i32,
    pub thalachh: i32,
    pub exng: i32,
    pub ca: i32,
}

impl FeatureRecord {
    /// Value of a single feature.
    pub fn get(&self, feature: Feature) -> i32 {
        match feature {
            Feature::Age => self.age,
            Feature::Sex => self.sex,
            Feature::Cp => self.cp,
            Feature::Trtbps => self.trtbps,
            Feature::Chol => self.chol,
            Feature::Fbs => self.fbs,
            Feature::Restecg => self.restecg,
            Feature::Thalachh => self.thalachh,
            Feature::Exng => self.exng,
            Feature::Ca => self.ca,
        }
    }

    /// All values in canonical column order.
    pub fn values(&self) -> [i32; 10] {
        Feature::ALL.map(|f| self.get(f))
    }

    /// Build a record from a dynamic name → value map, as supplied by request
    /// plumbing. Every feature must be present; extra keys are ignored, the
    /// way upstream request validation treats them.
    pub fn from_map(map: &HashMap<String, i32>) -> Result<Self, ModelError> {
        let fetch = |feature: Feature| -> Result<i32, ModelError> {
            map.get(feature.name()).copied().ok_or_else(|| {
                ModelError::SchemaMismatch(format!("missing required feature '{}'", feature.name()))
            })
        };
        Ok(FeatureRecord {
            age: fetch(Feature::Age)?,
            sex: fetch(Feature::Sex)?,
            cp: fetch(Feature::Cp)?,
            trtbps: fetch(Feature::Trtbps)?,
            chol: fetch(Feature::Chol)?,
            fbs: fetch(Feature::Fbs)?,
            restecg: fetch(Feature::Restecg)?,
            thalachh: fetch(Feature::Thalachh)?,
            exng: fetch(Feature::Exng)?,
            ca: fetch(Feature::Ca)?,
        })
    }

    /// Check every value against its schema bounds. Out-of-range input is the
    /// caller's fault and must never reach the preprocessor.
    pub fn validate(&self) -> Result<(), ModelError> {
        for feature in Feature::ALL {
            let value = self.get(feature);
            let (min, max) = feature.bounds();
            if value < min || value > max {
                return Err(ModelError::SchemaMismatch(format!(
                    "'{}' must be between {} and {}, got {}",
                    feature.name(),
                    min,
                    max,
                    value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> FeatureRecord {
        FeatureRecord {
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
        }
    }

    #[test]
    fn canonical_order_is_stable() {
        let names: Vec<&str> = Feature::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec!["age", "sex", "cp", "trtbps", "chol", "fbs", "restecg", "thalachh", "exng", "ca"]
        );
    }

    #[test]
    fn kind_partition_covers_all_features() {
        let partitioned =
            Feature::NUMERIC.len() + Feature::CATEGORICAL.len() + Feature::BINARY.len();
        assert_eq!(partitioned, Feature::ALL.len());
        for f in Feature::NUMERIC {
            assert_eq!(f.kind(), FeatureKind::Numeric);
        }
        for f in Feature::CATEGORICAL {
            assert_eq!(f.kind(), FeatureKind::Categorical);
        }
        for f in Feature::BINARY {
            assert_eq!(f.kind(), FeatureKind::Binary);
        }
    }

    #[test]
    fn validate_accepts_in_range_record() {
        assert!(valid_record().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_age() {
        let mut record = valid_record();
        record.age = 150;
        let err = record.validate().unwrap_err();
        match err {
            ModelError::SchemaMismatch(msg) => {
                assert!(msg.contains("age"), "message should name the feature: {}", msg)
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn from_map_reports_missing_feature() {
        let mut map = HashMap::new();
        for feature in Feature::ALL {
            map.insert(feature.name().to_string(), 0);
        }
        map.remove("chol");
        let err = FeatureRecord::from_map(&map).unwrap_err();
        match err {
            ModelError::SchemaMismatch(msg) => assert!(msg.contains("chol")),
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn from_map_ignores_extra_keys() {
        let mut map = HashMap::new();
        for (feature, value) in Feature::ALL.iter().zip(valid_record().values()) {
            map.insert(feature.name().to_string(), value);
        }
        map.insert("unrelated".to_string(), 99);
        let record = FeatureRecord::from_map(&map).unwrap();
        assert_eq!(record, valid_record());
    }

    #[test]
    fn catalogue_carries_display_metadata() {
        let infos = catalogue();
        assert_eq!(infos.len(), 10);
        let cp = infos.iter().find(|i| i.name == "cp").unwrap();
        assert_eq!(cp.label, "Chest Pain Type");
        assert_eq!(cp.options.unwrap().len(), 4);
        let trtbps = infos.iter().find(|i| i.name == "trtbps").unwrap();
        assert_eq!(trtbps.unit, Some("mm Hg"));
        assert!(trtbps.options.is_none());
    }
}
