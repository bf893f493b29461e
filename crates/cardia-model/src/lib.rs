//! cardia-model: heart-disease risk prediction from clinical features.
//!
//! This crate covers the full path from a raw heart-disease CSV to served
//! predictions: schema-validated feature records, a standardize/one-hot
//! preprocessing pipeline, a gradient-descent logistic classifier, stratified
//! train/test evaluation, and descriptive statistics of the training data.
//!
//! Training is a one-shot operation owned by [`facade::RiskModel`]; once the
//! model is ready the fitted state is immutable and predictions are pure
//! reads, safe to run from any number of threads.
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod facade;
pub mod io;
pub mod metrics;
pub mod preprocessing;
pub mod schema;
pub mod stats;
pub mod trainer;
