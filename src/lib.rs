//! selector-picker library
//!
//! Exposes the CLI and configuration for integration testing

pub mod cli;
pub mod config;

pub use config::PickerConfig;
