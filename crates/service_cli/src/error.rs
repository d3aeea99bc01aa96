//! CLI error types.

use process_core::ModelError;
use process_runner::RunnerError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `procsim` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid simulation parameters.
    #[error("Simulation configuration error: {0}")]
    Simulation(#[from] process_runner::ConfigError),

    /// Invalid model description.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Run failed before generation.
    #[error("Run error: {0}")]
    Runner(#[from] RunnerError),

    /// Writing the report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML encoding failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
