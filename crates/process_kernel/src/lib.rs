//! # process_kernel: Template and Realization Engine
//!
//! ## Kernel Layer Role
//!
//! process_kernel turns a [`CorrelationModel`](process_core::CorrelationModel)
//! into realizations:
//! - [`template`]: one-time sequential construction of conditional variances
//!   and regression coefficients ([`ProcessTemplate`])
//! - [`generator`]: one-shot and templated realization generators
//! - [`rng`]: seeded standard-normal sources ([`SimRng`](rng::SimRng))
//!
//! ## Sharing
//!
//! A template is immutable after construction and is shared between
//! threads behind an `Arc`; every generator owns its own draw source, so
//! generating a realization touches no shared mutable state.
//!
//! ## Usage Example
//!
//! ```rust
//! use process_core::ProcessModel;
//! use process_kernel::generator::TemplatedGenerator;
//! use process_kernel::rng::SimRng;
//! use process_kernel::template::SafeMath;
//!
//! let model = ProcessModel::white_noise(10).unwrap();
//! let mut generator =
//!     TemplatedGenerator::from_model(&model, 10, SafeMath::Clamp, SimRng::from_seed(42)).unwrap();
//!
//! let path = generator.next_realization();
//! assert_eq!(path.len(), 10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod error;
pub mod generator;
pub mod realization;
pub mod rng;
pub mod template;

pub use error::KernelError;
pub use generator::{build_generator, generate_one_shot, TemplatedGenerator};
pub use realization::Realization;
pub use template::{ProcessTemplate, SafeMath};
