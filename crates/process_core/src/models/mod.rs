//! The correlation model contract and its implementations.
//!
//! A model is a pair of pure functions over integer time indices in `[0, n)`:
//!
//! ```text
//! mean:        i      -> m(i)
//! correlation: (i, j) -> K(i, j)
//! ```
//!
//! Both are deterministic and side-effect free. A fault raised while
//! evaluating either is a caller bug; nothing downstream tries to recover
//! from it. The template builder only ever requests `K(i, j)` with `j >= i`,
//! so a model need not enforce symmetry itself.
//!
//! ## Implementations
//!
//! - [`ProcessModel`](process::ProcessModel): explicit configuration record
//!   holding the length, time grid and tagged mean/kernel variants
//! - [`FnModel`]: adapter for a bare pair of closures

use std::sync::Arc;

pub mod functions;
pub mod process;
#[cfg(feature = "serde")]
pub mod spec;

/// Mean and correlation functions of a discrete-time Gaussian process.
///
/// Implementors must be `Send + Sync`: a single model is shared read-only
/// by every worker of a parallel run.
pub trait CorrelationModel: Send + Sync {
    /// Theoretical mean `m(i)`.
    fn mean(&self, i: usize) -> f64;

    /// Theoretical correlation `K(i, j)`.
    fn correlation(&self, i: usize, j: usize) -> f64;

    /// Time label of index `i`, used only for reporting.
    ///
    /// Defaults to the index itself.
    fn time(&self, i: usize) -> f64 {
        i as f64
    }
}

impl<M: CorrelationModel + ?Sized> CorrelationModel for &M {
    #[inline]
    fn mean(&self, i: usize) -> f64 {
        (**self).mean(i)
    }

    #[inline]
    fn correlation(&self, i: usize, j: usize) -> f64 {
        (**self).correlation(i, j)
    }

    #[inline]
    fn time(&self, i: usize) -> f64 {
        (**self).time(i)
    }
}

impl<M: CorrelationModel + ?Sized> CorrelationModel for Arc<M> {
    #[inline]
    fn mean(&self, i: usize) -> f64 {
        (**self).mean(i)
    }

    #[inline]
    fn correlation(&self, i: usize, j: usize) -> f64 {
        (**self).correlation(i, j)
    }

    #[inline]
    fn time(&self, i: usize) -> f64 {
        (**self).time(i)
    }
}

/// Model built from a pair of closures.
///
/// # Examples
///
/// ```rust
/// use process_core::{CorrelationModel, FnModel};
///
/// let model = FnModel::new(|_| 0.5, |i, j| if i == j { 1.0 } else { 0.0 });
/// assert_eq!(model.mean(10), 0.5);
/// assert_eq!(model.correlation(1, 2), 0.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnModel<M, K> {
    mean: M,
    correlation: K,
}

impl<M, K> FnModel<M, K>
where
    M: Fn(usize) -> f64 + Send + Sync,
    K: Fn(usize, usize) -> f64 + Send + Sync,
{
    /// Wraps a mean closure and a correlation closure.
    pub fn new(mean: M, correlation: K) -> Self {
        Self { mean, correlation }
    }
}

impl<M, K> CorrelationModel for FnModel<M, K>
where
    M: Fn(usize) -> f64 + Send + Sync,
    K: Fn(usize, usize) -> f64 + Send + Sync,
{
    #[inline]
    fn mean(&self, i: usize) -> f64 {
        (self.mean)(i)
    }

    #[inline]
    fn correlation(&self, i: usize, j: usize) -> f64 {
        (self.correlation)(i, j)
    }
}
