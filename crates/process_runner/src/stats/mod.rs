//! # Statistics
//!
//! Aggregation of a completed set of realizations and its comparison with
//! the model's theoretical values.
//!
//! ## Estimators
//!
//! For `N` realizations `x[k]` of length `n`:
//!
//! ```text
//! mean(i)   = Σ_k x[k][i] / N
//! cov(i, j) = (Σ_k x[k][i]·x[k][j] − Σ_k x[k][i] · Σ_k x[k][j] / N) / (N − 1)
//! ```
//!
//! Aggregation is order-independent. Covariance needs `N ≥ 2`; for smaller
//! samples every entry is NaN.
//!
//! ## Module Structure
//!
//! - [`sample`]: owned collection of realizations
//! - [`aggregate`]: observed and ideal statistics
//! - [`report`]: index-wise theoretical vs empirical comparison

pub mod aggregate;
pub mod report;
pub mod sample;

pub use aggregate::{CovarianceMatrix, IdealStatistics, ObservedStatistics};
pub use report::{ComparisonReport, ComparisonRow};
pub use sample::StatisticsSample;
