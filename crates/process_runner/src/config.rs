//! Simulation run configuration.
//!
//! [`SimulationConfig`] is immutable once built; [`SimulationConfigBuilder`]
//! validates everything at [`build`](SimulationConfigBuilder::build) so that
//! an invalid run fails before any worker starts.

use std::time::Duration;

use process_kernel::SafeMath;
use thiserror::Error;

/// Maximum number of realizations per run.
pub const MAX_REALIZATIONS: usize = 100_000_000;

/// Default number of realizations retained for presentation.
pub const DEFAULT_DISPLAY_COUNT: usize = 6;

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Realization count outside `[1, MAX_REALIZATIONS]`.
    #[error("Invalid realization count {0}: must be in range [1, 100_000_000]")]
    InvalidRealizationCount(usize),

    /// Worker count of zero.
    #[error("Invalid parallelism {0}: at least one worker is required")]
    InvalidParallelism(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        reason: String,
    },
}

/// How workers obtain the template.
///
/// # Variants
///
/// - `Shared`: one template built before workers start, shared read-only
/// - `PerRealization`: every task builds its own template (one-shot generation)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TemplateMode {
    /// Build once, reuse for every realization.
    #[default]
    Shared,

    /// Rebuild for every realization.
    ///
    /// Same output distribution as `Shared` at `O(n²)` extra model
    /// evaluations per realization. Useful as a baseline.
    PerRealization,
}

/// Parallel simulation configuration.
///
/// # Examples
///
/// ```rust
/// use process_runner::config::{SimulationConfig, TemplateMode};
///
/// let config = SimulationConfig::builder()
///     .n_realizations(10_000)
///     .parallelism(4)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_realizations(), 10_000);
/// assert_eq!(config.parallelism(), 4);
/// assert_eq!(config.template_mode(), TemplateMode::Shared);
/// ```
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    n_realizations: usize,
    parallelism: usize,
    safe_math: SafeMath,
    template_mode: TemplateMode,
    seed: Option<u64>,
    timeout: Option<Duration>,
    display_count: usize,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of realizations `N`.
    #[inline]
    pub fn n_realizations(&self) -> usize {
        self.n_realizations
    }

    /// Number of worker threads.
    #[inline]
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Numerical policy of the template.
    #[inline]
    pub fn safe_math(&self) -> SafeMath {
        self.safe_math
    }

    /// Template sharing mode.
    #[inline]
    pub fn template_mode(&self) -> TemplateMode {
        self.template_mode
    }

    /// Base seed, if fixed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Wall-clock budget for the generation phase.
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Number of realizations retained for presentation, at most `N`.
    #[inline]
    pub fn display_count(&self) -> usize {
        self.display_count
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_realizations` is 0 or greater than [`MAX_REALIZATIONS`]
    /// - `parallelism` is 0
    /// - `timeout` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_realizations == 0 || self.n_realizations > MAX_REALIZATIONS {
            return Err(ConfigError::InvalidRealizationCount(self.n_realizations));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::InvalidParallelism(self.parallelism));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::InvalidParameter {
                name: "timeout",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    n_realizations: Option<usize>,
    parallelism: Option<usize>,
    safe_math: SafeMath,
    template_mode: TemplateMode,
    seed: Option<u64>,
    timeout: Option<Duration>,
    display_count: Option<usize>,
}

impl SimulationConfigBuilder {
    /// Sets the number of realizations `N`.
    ///
    /// # Arguments
    ///
    /// * `n` - Count in [1, 100_000_000]
    #[inline]
    pub fn n_realizations(mut self, n: usize) -> Self {
        self.n_realizations = Some(n);
        self
    }

    /// Sets the worker count. Defaults to the number of logical CPUs.
    #[inline]
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Sets the numerical policy.
    #[inline]
    pub fn safe_math(mut self, safe_math: SafeMath) -> Self {
        self.safe_math = safe_math;
        self
    }

    /// Sets the template sharing mode.
    #[inline]
    pub fn template_mode(mut self, mode: TemplateMode) -> Self {
        self.template_mode = mode;
        self
    }

    /// Fixes the base seed. Without one, a random seed is drawn per run.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets an optional wall-clock budget for generation.
    #[inline]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many realizations are kept for presentation.
    #[inline]
    pub fn display_count(mut self, count: usize) -> Self {
        self.display_count = Some(count);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n_realizations` is not set or any value is
    /// out of range.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let n_realizations = self.n_realizations.ok_or(ConfigError::InvalidParameter {
            name: "n_realizations",
            reason: "must be specified".to_string(),
        })?;

        let config = SimulationConfig {
            n_realizations,
            parallelism: self.parallelism.unwrap_or_else(num_cpus::get),
            safe_math: self.safe_math,
            template_mode: self.template_mode,
            seed: self.seed,
            timeout: self.timeout,
            display_count: self
                .display_count
                .unwrap_or(DEFAULT_DISPLAY_COUNT)
                .min(n_realizations),
        };

        config.validate()?;
        Ok(config)
    }
}
