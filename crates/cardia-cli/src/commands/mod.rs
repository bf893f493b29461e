//! Subcommand implementations for the `cardia` binary.
pub mod features;
pub mod predict;
pub mod train;
