//! # Parallel Runner
//!
//! Three-phase pipeline over a fixed-size worker pool:
//!
//! 1. **Generate**: the template (in [`TemplateMode::Shared`]) is built
//!    before any worker starts and never mutated afterwards; workers produce
//!    realizations from private, independently seeded draw streams.
//! 2. **Aggregate**: after the join barrier, observed statistics (row-parallel)
//!    and ideal statistics are computed concurrently.
//! 3. **Report**: both sides are zipped into a [`ComparisonReport`].
//!
//! No ordering among completed realizations is relied upon; they are
//! returned in task order.
//!
//! ## Usage Example
//!
//! ```rust
//! use process_core::ProcessModel;
//! use process_runner::config::SimulationConfig;
//! use process_runner::runner::ParallelRunner;
//!
//! let model = ProcessModel::white_noise(4).unwrap();
//! let config = SimulationConfig::builder()
//!     .n_realizations(1_000)
//!     .parallelism(2)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let run = ParallelRunner::new(config).run(&model, model.len()).unwrap();
//! assert_eq!(run.completed(), 1_000);
//! assert!(run.observed.covariance.is_symmetric(0.0));
//! ```

mod cancel;
mod pool;

use std::sync::Arc;
use std::time::{Duration, Instant};

use process_core::{CorrelationModel, ModelError};
use process_kernel::{ProcessTemplate, Realization};
use rayon::ThreadPoolBuilder;
use tracing::{info, warn};

use crate::config::{SimulationConfig, TemplateMode};
use crate::error::RunnerError;
use crate::stats::{ComparisonReport, IdealStatistics, ObservedStatistics, StatisticsSample};

pub use cancel::CancellationToken;

use cancel::StopSignal;
use pool::Plan;

/// Wall-clock duration of each pipeline phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseTimings {
    /// Template construction and realization generation.
    pub generate: Duration,
    /// Observed and ideal statistics.
    pub aggregate: Duration,
    /// Comparison report assembly.
    pub report: Duration,
}

impl PhaseTimings {
    /// Sum of all phases.
    pub fn total(&self) -> Duration {
        self.generate + self.aggregate + self.report
    }
}

/// Result of a completed (or cancelled) run.
#[derive(Clone, Debug)]
pub struct SimulationRun {
    /// Requested realization count `N`.
    pub requested: usize,
    /// Base seed; rerunning with it and the same parallelism replays the run.
    pub base_seed: u64,
    /// Completed realizations.
    pub sample: StatisticsSample,
    /// Empirical statistics of `sample`.
    pub observed: ObservedStatistics,
    /// Theoretical statistics of the model.
    pub ideal: IdealStatistics,
    /// Index-wise comparison of the two.
    pub report: ComparisonReport,
    /// Phase durations.
    pub timings: PhaseTimings,
    /// Generation stopped before all `N` realizations completed.
    pub cancelled: bool,
    /// The stop was caused by the configured timeout.
    pub timed_out: bool,
    /// Indices clamped by the shared template, if one was built.
    pub clamped_variances: Option<usize>,
    display_count: usize,
}

impl SimulationRun {
    /// Number of completed realizations.
    #[inline]
    pub fn completed(&self) -> usize {
        self.sample.len()
    }

    /// Realizations retained for presentation.
    pub fn displayed(&self) -> &[Realization] {
        self.sample.head(self.display_count)
    }
}

/// Parallel realization runner.
#[derive(Clone, Debug)]
pub struct ParallelRunner {
    config: SimulationConfig,
    token: CancellationToken,
}

impl ParallelRunner {
    /// Creates a runner with its own cancellation token.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            token: CancellationToken::new(),
        }
    }

    /// Uses an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Returns a handle that cancels this runner's runs.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Run configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Generates `N` realizations of length `n` and compares their
    /// statistics with the model.
    ///
    /// A cancelled or timed-out run is not an error: statistics are computed
    /// over whatever completed, with `cancelled` set on the result.
    ///
    /// # Errors
    ///
    /// - [`RunnerError::Model`] if `n == 0`
    /// - [`RunnerError::Config`] if the configuration is invalid
    /// - [`RunnerError::ThreadPool`] if the worker pool cannot be created
    /// - [`RunnerError::Stats`] if collected realizations do not match `n`
    pub fn run<M>(&self, model: &M, n: usize) -> Result<SimulationRun, RunnerError>
    where
        M: CorrelationModel + ?Sized,
    {
        if n == 0 {
            return Err(ModelError::EmptyProcess.into());
        }
        self.config.validate()?;

        let requested = self.config.n_realizations();
        let parallelism = self.config.parallelism();
        let policy = self.config.safe_math();
        let base_seed = self.config.seed().unwrap_or_else(rand::random);

        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .thread_name(|i| format!("procsim-worker-{i}"))
            .build()?;

        info!(
            n,
            realizations = requested,
            parallelism,
            safe_math = %policy,
            mode = ?self.config.template_mode(),
            seed = base_seed,
            "Starting simulation run"
        );

        // Phase 1: generate
        let started = Instant::now();
        let (plan, clamped_variances) = match self.config.template_mode() {
            TemplateMode::Shared => {
                let template = ProcessTemplate::build(model, n, policy)?;
                let clamped = template.clamped_count();
                (Plan::Shared(Arc::new(template)), Some(clamped))
            }
            TemplateMode::PerRealization => (Plan::PerRealization { model, n, policy }, None),
        };

        let stop = StopSignal::new(
            self.token.clone(),
            self.config.timeout().map(|timeout| started + timeout),
        );
        let outcome = pool::generate(&thread_pool, &plan, requested, base_seed, &stop)?;
        let generate = started.elapsed();

        let completed = outcome.realizations.len();
        let cancelled = completed < requested;
        if outcome.timed_out && cancelled {
            warn!(completed, requested, "Generation timed out");
        } else if cancelled {
            warn!(completed, requested, "Generation cancelled");
        }
        info!(
            completed,
            elapsed_ms = generate.as_millis() as u64,
            "Generation phase finished"
        );

        // Phase 2: aggregate
        let started = Instant::now();
        let sample = StatisticsSample::from_realizations(n, outcome.realizations)?;
        let (observed, ideal) = thread_pool.install(|| {
            rayon::join(
                || ObservedStatistics::compute(&sample),
                || IdealStatistics::compute(model, n),
            )
        });
        let aggregate = started.elapsed();
        info!(
            elapsed_ms = aggregate.as_millis() as u64,
            "Aggregation phase finished"
        );

        // Phase 3: report
        let started = Instant::now();
        let report = ComparisonReport::new(&ideal, &observed)?;
        let report_elapsed = started.elapsed();
        info!(
            max_mean_delta = report.max_abs_mean_delta(),
            max_correlation_delta = report.max_abs_correlation_delta(),
            elapsed_ms = report_elapsed.as_millis() as u64,
            "Report phase finished"
        );

        Ok(SimulationRun {
            requested,
            base_seed,
            sample,
            observed,
            ideal,
            report,
            timings: PhaseTimings {
                generate,
                aggregate,
                report: report_elapsed,
            },
            cancelled,
            timed_out: outcome.timed_out && cancelled,
            clamped_variances,
            display_count: self.config.display_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, TemplateMode};
    use process_core::{FnModel, ProcessModel};
    use process_kernel::SafeMath;

    fn config(n_realizations: usize, parallelism: usize) -> SimulationConfig {
        SimulationConfig::builder()
            .n_realizations(n_realizations)
            .parallelism(parallelism)
            .seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn test_run_rejects_empty_process() {
        let model = ProcessModel::white_noise(3).unwrap();
        let err = ParallelRunner::new(config(10, 1)).run(&model, 0).unwrap_err();
        assert!(matches!(err, RunnerError::Model(ModelError::EmptyProcess)));
    }

    #[test]
    fn test_run_completes_all_realizations() {
        let model = ProcessModel::white_noise(3).unwrap();
        let run = ParallelRunner::new(config(500, 4)).run(&model, 3).unwrap();

        assert_eq!(run.requested, 500);
        assert_eq!(run.completed(), 500);
        assert!(!run.cancelled);
        assert!(!run.timed_out);
        assert_eq!(run.clamped_variances, Some(0));
        assert_eq!(run.displayed().len(), 6);
        assert_eq!(run.report.len(), 3);
        assert!(run.timings.total() >= run.timings.generate);
    }

    #[test]
    fn test_fixed_seed_single_worker_is_reproducible() {
        let model = ProcessModel::white_noise(5).unwrap();
        let a = ParallelRunner::new(config(100, 1)).run(&model, 5).unwrap();
        let b = ParallelRunner::new(config(100, 1)).run(&model, 5).unwrap();

        assert_eq!(a.base_seed, 42);
        assert_eq!(a.sample, b.sample);
    }

    #[test]
    fn test_template_modes_agree_on_same_seed() {
        let model = ProcessModel::white_noise(4).unwrap();
        let shared = ParallelRunner::new(config(50, 1)).run(&model, 4).unwrap();

        let per_realization = SimulationConfig::builder()
            .n_realizations(50)
            .parallelism(1)
            .seed(42)
            .template_mode(TemplateMode::PerRealization)
            .build()
            .unwrap();
        let rebuilt = ParallelRunner::new(per_realization).run(&model, 4).unwrap();

        assert_eq!(shared.sample, rebuilt.sample);
        assert_eq!(rebuilt.clamped_variances, None);
    }

    #[test]
    fn test_cancelled_before_start() {
        let model = ProcessModel::white_noise(2).unwrap();
        let runner = ParallelRunner::new(config(1_000, 2));
        runner.cancellation_token().cancel();

        let run = runner.run(&model, 2).unwrap();
        assert!(run.cancelled);
        assert!(!run.timed_out);
        assert_eq!(run.completed(), 0);
        assert!(run.observed.means.iter().all(|m| m.is_nan()));
        assert!(run.displayed().is_empty());
    }

    #[test]
    fn test_propagate_policy_reaches_realizations() {
        // K(0,1) = 2 exceeds the unit variances, so the second variance is negative.
        let model = FnModel::new(|_| 0.0, |i, j| if i == j { 1.0 } else { 2.0 });
        let config = SimulationConfig::builder()
            .n_realizations(10)
            .parallelism(1)
            .safe_math(SafeMath::Propagate)
            .seed(1)
            .build()
            .unwrap();

        let run = ParallelRunner::new(config).run(&model, 2).unwrap();
        assert_eq!(run.clamped_variances, Some(0));
        assert!(run.sample.iter().all(|x| x[1].is_nan()));
    }

    #[test]
    fn test_invalid_config_is_rejected_at_build() {
        let err = SimulationConfig::builder()
            .n_realizations(10)
            .parallelism(0)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidParallelism(0));
    }
}
