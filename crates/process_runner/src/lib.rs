//! # process_runner: Parallel Simulation and Statistics
//!
//! ## Orchestration Layer Role
//!
//! process_runner drives the kernel at scale and measures the result:
//! - [`config`]: validated [`SimulationConfig`] built through a builder
//! - [`runner`]: [`ParallelRunner`] (worker pool, cancellation, timeout)
//! - [`stats`]: observed and ideal statistics and the [`ComparisonReport`]
//!
//! ## Concurrency Model
//!
//! - The template is built once on the calling thread, before any worker
//!   starts, and shared read-only behind an `Arc`
//! - Each worker owns a [`SimRng`](process_kernel::rng::SimRng) seeded from
//!   the run's base seed and its worker index
//! - Completed realizations flow through a channel; nothing else is shared
//!   mutably
//!
//! ## Usage Example
//!
//! ```rust
//! use process_core::{CorrelationKernel, MeanFunction, ProcessModel, TimeGrid};
//! use process_runner::{ParallelRunner, SimulationConfig};
//!
//! let model = ProcessModel::new(
//!     5,
//!     TimeGrid::new(0.25).unwrap(),
//!     MeanFunction::Constant(1.0),
//!     CorrelationKernel::RationalAbs { alpha: 5.0 },
//! )
//! .unwrap();
//!
//! let config = SimulationConfig::builder()
//!     .n_realizations(20_000)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//!
//! let run = ParallelRunner::new(config).run(&model, model.len()).unwrap();
//! assert!(run.report.max_abs_mean_delta() < 0.05);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod runner;
pub mod stats;

pub use config::{ConfigError, SimulationConfig, SimulationConfigBuilder, TemplateMode, MAX_REALIZATIONS};
pub use error::{RunnerError, StatsError};
pub use runner::{CancellationToken, ParallelRunner, PhaseTimings, SimulationRun};
pub use stats::{
    ComparisonReport, ComparisonRow, CovarianceMatrix, IdealStatistics, ObservedStatistics,
    StatisticsSample,
};
