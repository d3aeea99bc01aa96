//! Deserialisable descriptions of built-in models.
//!
//! Configuration files cannot carry closures, so they describe a model with
//! [`ModelSpec`], which is then turned into a validated [`ProcessModel`].
//!
//! ```toml
//! [model]
//! len = 12
//! step = 0.025
//! mean = { kind = "constant", value = 0.5 }
//! kernel = { kind = "cauchy", alpha = 1.0 }
//! ```

use serde::{Deserialize, Serialize};

use super::functions::{CorrelationKernel, MeanFunction};
use super::process::ProcessModel;
use crate::error::ModelError;
use crate::grid::TimeGrid;

/// Serialisable mean function.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MeanSpec {
    /// `m(t) = value`.
    Constant {
        /// Constant mean.
        value: f64,
    },
    /// `m(t) = intercept + slope · t`.
    Linear {
        /// Value at `t = 0`.
        intercept: f64,
        /// Slope.
        slope: f64,
    },
}

impl From<MeanSpec> for MeanFunction {
    fn from(spec: MeanSpec) -> Self {
        match spec {
            MeanSpec::Constant { value } => MeanFunction::Constant(value),
            MeanSpec::Linear { intercept, slope } => MeanFunction::Linear { intercept, slope },
        }
    }
}

/// Serialisable correlation kernel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum KernelSpec {
    /// `1 / (1 + α·|Δt|)`.
    RationalAbs {
        /// Decay rate.
        alpha: f64,
    },
    /// `1 / (1 + α·Δt²)`.
    Cauchy {
        /// Decay rate.
        alpha: f64,
    },
    /// `exp(−α·|Δt|)`.
    Exponential {
        /// Decay rate.
        alpha: f64,
    },
    /// Independent steps.
    WhiteNoise {
        /// Per-step variance.
        variance: f64,
    },
}

impl From<KernelSpec> for CorrelationKernel {
    fn from(spec: KernelSpec) -> Self {
        match spec {
            KernelSpec::RationalAbs { alpha } => CorrelationKernel::RationalAbs { alpha },
            KernelSpec::Cauchy { alpha } => CorrelationKernel::Cauchy { alpha },
            KernelSpec::Exponential { alpha } => CorrelationKernel::Exponential { alpha },
            KernelSpec::WhiteNoise { variance } => CorrelationKernel::WhiteNoise { variance },
        }
    }
}

/// Serialisable process model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Number of time steps.
    pub len: usize,
    /// Grid step `h`.
    pub step: f64,
    /// Mean function.
    pub mean: MeanSpec,
    /// Correlation kernel.
    pub kernel: KernelSpec,
}

impl Default for ModelSpec {
    /// The twelve-step Cauchy model with mean 0.5 on a 0.025 grid.
    fn default() -> Self {
        Self {
            len: 12,
            step: 0.025,
            mean: MeanSpec::Constant { value: 0.5 },
            kernel: KernelSpec::Cauchy { alpha: 1.0 },
        }
    }
}

impl ModelSpec {
    /// Builds the validated model.
    pub fn build(&self) -> Result<ProcessModel, ModelError> {
        ProcessModel::new(
            self.len,
            TimeGrid::new(self.step)?,
            self.mean.into(),
            self.kernel.into(),
        )
    }
}
