//! Error types for the parallel runner.

use process_core::ModelError;
use thiserror::Error;

use crate::config::ConfigError;

/// Shape error raised when statistics inputs disagree on the process length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    /// A realization or statistic has a length other than the process length.
    #[error("Length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Expected length (the process length).
        expected: usize,
        /// Length actually received.
        got: usize,
    },
}

/// Runner error.
///
/// Raised only before generation starts or when the worker pool cannot be
/// created. Numerical trouble in realizations and statistics stays
/// value-level (NaN).
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Invalid run configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid process model or length.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Worker pool construction failed.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Collected realizations do not fit the process length.
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),
}
