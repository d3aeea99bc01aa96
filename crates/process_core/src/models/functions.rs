//! Built-in mean functions and correlation kernels.
//!
//! Both are tagged variants over a small set of closed-form functions plus a
//! `Custom` variant carrying a caller-supplied callable. Built-in variants are
//! expressed in grid time `t_i = i · h`; custom callables receive raw indices.
//!
//! | Kernel | `K(t, t')` |
//! |--------|------------|
//! | `RationalAbs` | `1 / (1 + α·|t − t'|)` |
//! | `Cauchy` | `1 / (1 + α·(t − t')²)` |
//! | `Exponential` | `exp(−α·|t − t'|)` |
//! | `WhiteNoise` | `σ²` if `t = t'`, else `0` |

use std::fmt;
use std::sync::Arc;

use crate::error::ModelError;
use crate::grid::TimeGrid;

/// Caller-supplied mean callable over indices.
pub type MeanFn = Arc<dyn Fn(usize) -> f64 + Send + Sync>;

/// Caller-supplied correlation callable over index pairs.
pub type CorrelationFn = Arc<dyn Fn(usize, usize) -> f64 + Send + Sync>;

/// Mean function `m(t)`.
#[derive(Clone)]
pub enum MeanFunction {
    /// `m(t) = c`.
    Constant(f64),
    /// `m(t) = intercept + slope · t`.
    Linear {
        /// Value at `t = 0`.
        intercept: f64,
        /// Rate of change per unit time.
        slope: f64,
    },
    /// Arbitrary callable over indices.
    Custom(MeanFn),
}

impl MeanFunction {
    /// Wraps a callable as a custom mean function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize) -> f64 + Send + Sync + 'static,
    {
        MeanFunction::Custom(Arc::new(f))
    }

    /// Evaluates the mean at index `i`.
    #[inline]
    pub fn evaluate(&self, grid: &TimeGrid, i: usize) -> f64 {
        match self {
            MeanFunction::Constant(c) => *c,
            MeanFunction::Linear { intercept, slope } => intercept + slope * grid.time(i),
            MeanFunction::Custom(f) => f(i),
        }
    }

    /// Checks that built-in parameters are finite.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            MeanFunction::Constant(c) => finite("mean", *c),
            MeanFunction::Linear { intercept, slope } => {
                finite("intercept", *intercept)?;
                finite("slope", *slope)
            }
            MeanFunction::Custom(_) => Ok(()),
        }
    }
}

impl fmt::Debug for MeanFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeanFunction::Constant(c) => f.debug_tuple("Constant").field(c).finish(),
            MeanFunction::Linear { intercept, slope } => f
                .debug_struct("Linear")
                .field("intercept", intercept)
                .field("slope", slope)
                .finish(),
            MeanFunction::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Correlation kernel `K(t, t')`.
#[derive(Clone)]
pub enum CorrelationKernel {
    /// `K = 1 / (1 + α·|t − t'|)`.
    RationalAbs {
        /// Decay rate `α ≥ 0`.
        alpha: f64,
    },
    /// `K = 1 / (1 + α·(t − t')²)`.
    Cauchy {
        /// Decay rate `α ≥ 0`.
        alpha: f64,
    },
    /// `K = exp(−α·|t − t'|)`.
    Exponential {
        /// Decay rate `α ≥ 0`.
        alpha: f64,
    },
    /// Independent steps: `K = σ²` on the diagonal, `0` elsewhere.
    WhiteNoise {
        /// Per-step variance `σ² ≥ 0`.
        variance: f64,
    },
    /// Arbitrary callable over index pairs.
    Custom(CorrelationFn),
}

impl CorrelationKernel {
    /// Wraps a callable as a custom kernel.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize, usize) -> f64 + Send + Sync + 'static,
    {
        CorrelationKernel::Custom(Arc::new(f))
    }

    /// Evaluates `K(t_i, t_j)`.
    #[inline]
    pub fn evaluate(&self, grid: &TimeGrid, i: usize, j: usize) -> f64 {
        match self {
            CorrelationKernel::RationalAbs { alpha } => {
                1.0 / (1.0 + alpha * (grid.time(i) - grid.time(j)).abs())
            }
            CorrelationKernel::Cauchy { alpha } => {
                let dt = grid.time(i) - grid.time(j);
                1.0 / (1.0 + alpha * dt * dt)
            }
            CorrelationKernel::Exponential { alpha } => {
                (-alpha * (grid.time(i) - grid.time(j)).abs()).exp()
            }
            CorrelationKernel::WhiteNoise { variance } => {
                if i == j {
                    *variance
                } else {
                    0.0
                }
            }
            CorrelationKernel::Custom(f) => f(i, j),
        }
    }

    /// Checks that built-in parameters are finite and non-negative.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            CorrelationKernel::RationalAbs { alpha }
            | CorrelationKernel::Cauchy { alpha }
            | CorrelationKernel::Exponential { alpha } => non_negative("alpha", *alpha),
            CorrelationKernel::WhiteNoise { variance } => non_negative("variance", *variance),
            CorrelationKernel::Custom(_) => Ok(()),
        }
    }

    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            CorrelationKernel::RationalAbs { .. } => "rational-abs",
            CorrelationKernel::Cauchy { .. } => "cauchy",
            CorrelationKernel::Exponential { .. } => "exponential",
            CorrelationKernel::WhiteNoise { .. } => "white-noise",
            CorrelationKernel::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for CorrelationKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationKernel::RationalAbs { alpha } => {
                f.debug_struct("RationalAbs").field("alpha", alpha).finish()
            }
            CorrelationKernel::Cauchy { alpha } => {
                f.debug_struct("Cauchy").field("alpha", alpha).finish()
            }
            CorrelationKernel::Exponential { alpha } => {
                f.debug_struct("Exponential").field("alpha", alpha).finish()
            }
            CorrelationKernel::WhiteNoise { variance } => f
                .debug_struct("WhiteNoise")
                .field("variance", variance)
                .finish(),
            CorrelationKernel::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn grid() -> TimeGrid {
        TimeGrid::new(0.25).unwrap()
    }

    #[test]
    fn test_constant_and_linear_mean() {
        let g = grid();
        assert_eq!(MeanFunction::Constant(0.5).evaluate(&g, 9), 0.5);

        let linear = MeanFunction::Linear {
            intercept: 1.0,
            slope: 2.0,
        };
        assert_relative_eq!(linear.evaluate(&g, 2), 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_custom_mean_receives_index() {
        let mean = MeanFunction::custom(|i| i as f64 * 10.0);
        assert_eq!(mean.evaluate(&grid(), 3), 30.0);
    }

    #[test]
    fn test_rational_abs_kernel() {
        let k = CorrelationKernel::RationalAbs { alpha: 5.0 };
        let g = grid();
        assert_eq!(k.evaluate(&g, 1, 1), 1.0);
        // |t0 - t1| = 0.25 -> 1 / (1 + 1.25)
        assert_relative_eq!(k.evaluate(&g, 0, 1), 1.0 / 2.25, epsilon = 1e-15);
    }

    #[test]
    fn test_cauchy_kernel() {
        let k = CorrelationKernel::Cauchy { alpha: 1.0 };
        let g = TimeGrid::new(0.5).unwrap();
        // dt = 1.0
        assert_relative_eq!(k.evaluate(&g, 0, 2), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_exponential_kernel() {
        let k = CorrelationKernel::Exponential { alpha: 2.0 };
        let g = TimeGrid::unit();
        assert_relative_eq!(k.evaluate(&g, 3, 1), (-4.0_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_white_noise_kernel() {
        let k = CorrelationKernel::WhiteNoise { variance: 2.0 };
        let g = grid();
        assert_eq!(k.evaluate(&g, 4, 4), 2.0);
        assert_eq!(k.evaluate(&g, 4, 5), 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(CorrelationKernel::Cauchy { alpha: -1.0 }.validate().is_err());
        assert!(CorrelationKernel::WhiteNoise { variance: f64::NAN }
            .validate()
            .is_err());
        assert!(CorrelationKernel::Exponential { alpha: 0.0 }.validate().is_ok());
        assert!(MeanFunction::Constant(f64::INFINITY).validate().is_err());
        assert!(MeanFunction::custom(|_| f64::NAN).validate().is_ok());
    }

    #[test]
    fn test_debug_hides_callables() {
        let k = CorrelationKernel::custom(|_, _| 1.0);
        assert_eq!(format!("{:?}", k), "Custom(..)");
        assert_eq!(k.name(), "custom");
    }

    proptest! {
        #[test]
        fn prop_stationary_kernels_are_symmetric(
            alpha in 0.0..10.0f64,
            i in 0usize..64,
            j in 0usize..64,
        ) {
            let g = grid();
            for k in [
                CorrelationKernel::RationalAbs { alpha },
                CorrelationKernel::Cauchy { alpha },
                CorrelationKernel::Exponential { alpha },
            ] {
                prop_assert_eq!(k.evaluate(&g, i, j), k.evaluate(&g, j, i));
                prop_assert!(k.evaluate(&g, i, j) <= 1.0);
            }
        }
    }
}
