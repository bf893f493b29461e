//! cardia-cli: command-line tooling for the cardia heart-disease risk model.
//!
//! The `cardia` binary wires three subcommands (`train`, `predict`,
//! `features`) to the cardia-model crate and renders an HTML report of each
//! training run.
pub mod commands;
pub mod config;
pub mod report;
pub mod util;
