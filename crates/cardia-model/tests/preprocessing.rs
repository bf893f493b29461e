//! Integration tests for the preprocessing pipeline (standardization,
//! one-hot encoding) and the schema validation guarding it.

use cardia_model::error::ModelError;
use cardia_model::preprocessing::Preprocessor;
use cardia_model::schema::FeatureRecord;

fn base_record() -> FeatureRecord {
    FeatureRecord {
        age: 50,
        sex: 1,
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

/// Three records observing cp in {0, 2}, restecg in {0, 1} and ca in {0}.
fn fixture_records() -> Vec<FeatureRecord> {
    let mut a = base_record();
    a.age = 40;
    a.thalachh = 140;

    let mut b = base_record();
    b.age = 50;
    b.cp = 2;
    b.restecg = 1;
    b.thalachh = 150;

    let mut c = base_record();
    c.age = 60;
    c.cp = 2;
    c.thalachh = 160;

    vec![a, b, c]
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn output_width_follows_observed_categories() {
    let records = fixture_records();
    let pre = Preprocessor::fit(&records);
    // 4 standardized numerics, one-hot blocks of width 2 (cp), 2 (restecg)
    // and 1 (ca), then the 3 pass-through binaries.
    assert_eq!(pre.output_width(), 4 + 2 + 2 + 1 + 3);
    for record in &records {
        assert_eq!(pre.transform(record).len(), pre.output_width());
    }
}

#[test]
fn binaries_pass_through_unchanged() {
    let records = fixture_records();
    let pre = Preprocessor::fit(&records);

    let mut probe = base_record();
    probe.sex = 1;
    probe.fbs = 0;
    probe.exng = 1;
    let v = pre.transform(&probe);
    let width = pre.output_width();
    assert_eq!(v[width - 3], 1.0, "sex");
    assert_eq!(v[width - 2], 0.0, "fbs");
    assert_eq!(v[width - 1], 1.0, "exng");
}

// ---------------------------------------------------------------------------
// Standardization
// ---------------------------------------------------------------------------

#[test]
fn transform_all_centers_numeric_columns() {
    let records = fixture_records();
    let pre = Preprocessor::fit(&records);
    let t = pre.transform_all(&records);

    // Numeric columns occupy indices 0..4; after standardization each has
    // mean ~0 over the fit data.
    for col in 0..4 {
        let mean: f64 = (0..records.len()).map(|r| t[(r, col)]).sum::<f64>() / 3.0;
        assert!(
            mean.abs() < 1e-9,
            "column {} mean after transform should be ~0, got {}",
            col,
            mean
        );
    }
}

#[test]
fn zero_variance_column_standardizes_to_zero() {
    // trtbps and chol are constant in the fixture.
    let records = fixture_records();
    let pre = Preprocessor::fit(&records);

    let mut probe = base_record();
    probe.trtbps = 180;
    probe.chol = 300;
    let v = pre.transform(&probe);
    assert_eq!(v[1], 0.0, "constant trtbps must map to 0, not NaN");
    assert_eq!(v[2], 0.0, "constant chol must map to 0, not NaN");
    assert!(v.iter().all(|x| x.is_finite()));
}

#[test]
fn transform_is_deterministic() {
    let records = fixture_records();
    let pre = Preprocessor::fit(&records);
    let probe = base_record();
    assert_eq!(pre.transform(&probe), pre.transform(&probe));
}

// ---------------------------------------------------------------------------
// One-hot encoding
// ---------------------------------------------------------------------------

#[test]
fn categorical_one_hot_marks_the_observed_category() {
    let records = fixture_records();
    let pre = Preprocessor::fit(&records);

    // cp block occupies indices 4..6 with categories [0, 2] in order.
    let mut probe = base_record();
    probe.cp = 2;
    let v = pre.transform(&probe);
    assert_eq!(v[4], 0.0);
    assert_eq!(v[5], 1.0);

    probe.cp = 0;
    let v = pre.transform(&probe);
    assert_eq!(v[4], 1.0);
    assert_eq!(v[5], 0.0);
}

#[test]
fn unseen_category_encodes_as_zero_block() {
    let records = fixture_records();
    let pre = Preprocessor::fit(&records);

    // cp = 1 was never observed at fit time.
    let mut probe = base_record();
    probe.cp = 1;
    let v = pre.transform(&probe);
    assert_eq!(v[4], 0.0);
    assert_eq!(v[5], 0.0);
    // The rest of the vector is unaffected.
    assert_eq!(v.len(), pre.output_width());
}

// ---------------------------------------------------------------------------
// Schema validation upstream of the pipeline
// ---------------------------------------------------------------------------

#[test]
fn out_of_range_record_is_rejected_before_preprocessing() {
    let mut record = base_record();
    record.age = 150;
    let err = record.validate().unwrap_err();
    match err {
        ModelError::SchemaMismatch(msg) => {
            assert!(msg.contains("age"), "message should name the feature: {}", msg)
        }
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}
