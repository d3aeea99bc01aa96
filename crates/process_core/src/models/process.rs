//! Explicit process model configuration.

use super::functions::{CorrelationKernel, MeanFunction};
use super::CorrelationModel;
use crate::error::ModelError;
use crate::grid::TimeGrid;

/// A discrete-time Gaussian process of fixed length.
///
/// Holds everything needed to simulate the process: the number of steps
/// `n`, the time grid, and the mean and correlation functions. Parameters
/// are passed explicitly rather than captured in ad-hoc closures, so a
/// model can be cloned, logged and shared between threads.
///
/// # Examples
///
/// ```rust
/// use process_core::{CorrelationKernel, MeanFunction, ProcessModel, TimeGrid};
///
/// let model = ProcessModel::new(
///     12,
///     TimeGrid::new(0.025).unwrap(),
///     MeanFunction::Constant(0.5),
///     CorrelationKernel::Cauchy { alpha: 1.0 },
/// )
/// .unwrap();
///
/// assert_eq!(model.len(), 12);
/// assert_eq!(model.ideal_means(), vec![0.5; 12]);
/// ```
#[derive(Clone, Debug)]
pub struct ProcessModel {
    len: usize,
    grid: TimeGrid,
    mean: MeanFunction,
    kernel: CorrelationKernel,
}

impl ProcessModel {
    /// Creates a validated model.
    ///
    /// # Errors
    ///
    /// - [`ModelError::EmptyProcess`] if `len == 0`
    /// - [`ModelError::InvalidParameter`] if a built-in function parameter is
    ///   outside its domain
    pub fn new(
        len: usize,
        grid: TimeGrid,
        mean: MeanFunction,
        kernel: CorrelationKernel,
    ) -> Result<Self, ModelError> {
        if len == 0 {
            return Err(ModelError::EmptyProcess);
        }
        mean.validate()?;
        kernel.validate()?;
        Ok(Self {
            len,
            grid,
            mean,
            kernel,
        })
    }

    /// Independent unit-variance steps with zero mean.
    pub fn white_noise(len: usize) -> Result<Self, ModelError> {
        Self::new(
            len,
            TimeGrid::unit(),
            MeanFunction::Constant(0.0),
            CorrelationKernel::WhiteNoise { variance: 1.0 },
        )
    }

    /// Number of time steps `n`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a model has at least one step.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time grid.
    #[inline]
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Mean function.
    #[inline]
    pub fn mean_function(&self) -> &MeanFunction {
        &self.mean
    }

    /// Correlation kernel.
    #[inline]
    pub fn kernel(&self) -> &CorrelationKernel {
        &self.kernel
    }

    /// Theoretical means `m(0) .. m(n-1)`.
    pub fn ideal_means(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.mean(i)).collect()
    }

    /// Theoretical correlation row `K(t_i, ·)`.
    pub fn ideal_correlation_row(&self, i: usize) -> Vec<f64> {
        (0..self.len).map(|j| self.correlation(i, j)).collect()
    }
}

impl CorrelationModel for ProcessModel {
    #[inline]
    fn mean(&self, i: usize) -> f64 {
        self.mean.evaluate(&self.grid, i)
    }

    #[inline]
    fn correlation(&self, i: usize, j: usize) -> f64 {
        self.kernel.evaluate(&self.grid, i, j)
    }

    #[inline]
    fn time(&self, i: usize) -> f64 {
        self.grid.time(i)
    }
}
