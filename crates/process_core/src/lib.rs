//! # process_core: Model Layer for Gaussian Process Simulation
//!
//! ## Foundation Layer Role
//!
//! process_core is the bottom layer of the workspace. It describes *what* is
//! simulated and nothing else:
//! - The [`CorrelationModel`] contract: a mean function `m(i)` and a
//!   correlation function `K(i, j)` over integer time indices
//! - Built-in mean functions and correlation kernels (`models::functions`)
//! - The explicit model configuration [`ProcessModel`]
//! - The uniform time grid [`TimeGrid`] mapping indices to times
//! - Error types: [`ModelError`]
//!
//! ## Zero Dependency Principle
//!
//! This crate has no dependencies on other process_* crates and only
//! minimal external dependencies:
//! - thiserror: Error derivation
//! - serde: Deserialisable model descriptions (optional, default on)
//!
//! ## Usage Example
//!
//! ```rust
//! use process_core::{CorrelationKernel, CorrelationModel, MeanFunction, ProcessModel, TimeGrid};
//!
//! // n = 5 steps of h = 0.25, m(t) = 1, K(t, t') = 1 / (1 + 5|t - t'|)
//! let model = ProcessModel::new(
//!     5,
//!     TimeGrid::new(0.25).unwrap(),
//!     MeanFunction::Constant(1.0),
//!     CorrelationKernel::RationalAbs { alpha: 5.0 },
//! )
//! .unwrap();
//!
//! assert_eq!(model.mean(3), 1.0);
//! assert_eq!(model.correlation(2, 2), 1.0);
//! assert!((model.correlation(0, 4) - 1.0 / 6.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable `ModelSpec` deserialisation for configuration files

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod error;
pub mod grid;
pub mod models;

pub use error::ModelError;
pub use grid::TimeGrid;
pub use models::functions::{CorrelationKernel, MeanFunction};
pub use models::process::ProcessModel;
pub use models::{CorrelationModel, FnModel};

#[cfg(feature = "serde")]
pub use models::spec::{KernelSpec, MeanSpec, ModelSpec};
