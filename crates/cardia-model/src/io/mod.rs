//! IO utilities for loading the training dataset.

pub mod heart_csv;

pub use heart_csv::load_heart_csv;
