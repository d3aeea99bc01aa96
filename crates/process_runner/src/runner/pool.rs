//! Generation phase: a fixed-size worker pool fed through a bounded queue.
//!
//! The caller thread produces task indices into a bounded crossbeam channel
//! while `parallelism` rayon workers consume them. Completed realizations
//! go to an unbounded results channel, the only state shared mutably
//! between workers. The scope is the join barrier: no result is read until
//! every worker has exited.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use process_core::{CorrelationModel, ModelError};
use process_kernel::rng::{worker_seed, SimRng};
use process_kernel::{generate_one_shot, ProcessTemplate, Realization, SafeMath, TemplatedGenerator};
use rayon::ThreadPool;
use tracing::debug;

use super::cancel::StopSignal;

/// Queue slots per worker.
const QUEUE_DEPTH_PER_WORKER: usize = 4;

type TaskResult = (usize, Result<Realization, ModelError>);

/// How workers obtain realizations.
pub(crate) enum Plan<'a, M: ?Sized> {
    /// Template built before workers start.
    Shared(Arc<ProcessTemplate>),
    /// Each task builds its own template.
    PerRealization {
        model: &'a M,
        n: usize,
        policy: SafeMath,
    },
}

/// Per-worker realization source.
enum Producer<'a, M: ?Sized> {
    Shared(TemplatedGenerator<SimRng>),
    PerRealization {
        model: &'a M,
        n: usize,
        policy: SafeMath,
        rng: SimRng,
    },
}

impl<'a, M: CorrelationModel + ?Sized> Producer<'a, M> {
    fn new(plan: &Plan<'a, M>, rng: SimRng) -> Self {
        match plan {
            Plan::Shared(template) => Self::Shared(TemplatedGenerator::new(Arc::clone(template), rng)),
            Plan::PerRealization { model, n, policy } => Self::PerRealization {
                model: *model,
                n: *n,
                policy: *policy,
                rng,
            },
        }
    }

    fn produce(&mut self) -> Result<Realization, ModelError> {
        match self {
            Self::Shared(generator) => Ok(generator.next_realization()),
            Self::PerRealization {
                model,
                n,
                policy,
                rng,
            } => generate_one_shot(*model, *n, *policy, rng),
        }
    }
}

/// Realizations collected by the generation phase.
#[derive(Debug)]
pub(crate) struct GenerationOutcome {
    /// Completed realizations in task order.
    pub realizations: Vec<Realization>,
    /// Whether the deadline stopped generation.
    pub timed_out: bool,
}

/// Runs `n_realizations` tasks on `pool` and waits for all workers.
///
/// Worker `w` draws from `SimRng::from_seed(worker_seed(base_seed, w))`.
///
/// # Errors
///
/// Returns the first model error raised while building a per-task template.
pub(crate) fn generate<M>(
    pool: &ThreadPool,
    plan: &Plan<'_, M>,
    n_realizations: usize,
    base_seed: u64,
    stop: &StopSignal,
) -> Result<GenerationOutcome, ModelError>
where
    M: CorrelationModel + ?Sized,
{
    let workers = pool.current_num_threads();
    let (task_tx, task_rx) = crossbeam_channel::bounded::<usize>(workers * QUEUE_DEPTH_PER_WORKER);
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<TaskResult>();

    pool.in_place_scope(|scope| {
        for worker in 0..workers {
            let tasks = task_rx.clone();
            let results = result_tx.clone();
            scope.spawn(move |_| {
                let rng = SimRng::from_seed(worker_seed(base_seed, worker));
                let produced = run_worker(Producer::new(plan, rng), &tasks, &results, stop);
                debug!(worker, produced, "Worker finished");
            });
        }
        // Workers hold the only receivers, so sends fail once they all exit.
        drop(task_rx);
        drop(result_tx);

        for index in 0..n_realizations {
            if stop.should_stop() || task_tx.send(index).is_err() {
                break;
            }
        }
        drop(task_tx);
    });

    let mut slots: Vec<Option<Realization>> = vec![None; n_realizations];
    for (index, result) in result_rx.iter() {
        slots[index] = Some(result?);
    }

    Ok(GenerationOutcome {
        realizations: slots.into_iter().flatten().collect(),
        timed_out: stop.timed_out(),
    })
}

/// Consumes tasks until the queue closes or a stop is signalled.
///
/// A realization finished after the stop signal is discarded.
fn run_worker<M: CorrelationModel + ?Sized>(
    mut producer: Producer<'_, M>,
    tasks: &Receiver<usize>,
    results: &Sender<TaskResult>,
    stop: &StopSignal,
) -> usize {
    let mut produced = 0;
    for index in tasks.iter() {
        if stop.should_stop() {
            break;
        }
        let realization = producer.produce();
        if stop.should_stop() {
            break;
        }
        if results.send((index, realization)).is_err() {
            break;
        }
        produced += 1;
    }
    produced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::cancel::CancellationToken;
    use process_core::ProcessModel;
    use rayon::ThreadPoolBuilder;

    fn pool(threads: usize) -> ThreadPool {
        ThreadPoolBuilder::new().num_threads(threads).build().unwrap()
    }

    #[test]
    fn test_single_worker_fills_every_slot() {
        let model = ProcessModel::white_noise(3).unwrap();
        let template = Arc::new(ProcessTemplate::build(&model, 3, SafeMath::Clamp).unwrap());
        let plan: Plan<'_, ProcessModel> = Plan::Shared(template);
        let stop = StopSignal::new(CancellationToken::new(), None);

        let outcome = generate(&pool(1), &plan, 50, 9, &stop).unwrap();
        assert_eq!(outcome.realizations.len(), 50);
        assert!(!outcome.timed_out);
    }

    #[test]
    fn test_single_worker_matches_sequential_generator() {
        let model = ProcessModel::white_noise(4).unwrap();
        let template = Arc::new(ProcessTemplate::build(&model, 4, SafeMath::Clamp).unwrap());
        let plan: Plan<'_, ProcessModel> = Plan::Shared(Arc::clone(&template));
        let stop = StopSignal::new(CancellationToken::new(), None);

        let outcome = generate(&pool(1), &plan, 10, 5, &stop).unwrap();

        let mut expected = TemplatedGenerator::new(template, SimRng::from_seed(worker_seed(5, 0)));
        for realization in &outcome.realizations {
            assert_eq!(realization, &expected.next_realization());
        }
    }

    #[test]
    fn test_per_realization_plan() {
        let model = ProcessModel::white_noise(2).unwrap();
        let plan = Plan::PerRealization {
            model: &model,
            n: 2,
            policy: SafeMath::Clamp,
        };
        let stop = StopSignal::new(CancellationToken::new(), None);

        let outcome = generate(&pool(3), &plan, 25, 1, &stop).unwrap();
        assert_eq!(outcome.realizations.len(), 25);
    }

    #[test]
    fn test_per_realization_plan_surfaces_model_error() {
        let model = ProcessModel::white_noise(2).unwrap();
        let plan = Plan::PerRealization {
            model: &model,
            n: 0,
            policy: SafeMath::Clamp,
        };
        let stop = StopSignal::new(CancellationToken::new(), None);

        let err = generate(&pool(2), &plan, 5, 1, &stop).unwrap_err();
        assert_eq!(err, ModelError::EmptyProcess);
    }

    #[test]
    fn test_pre_cancelled_run_produces_nothing() {
        let model = ProcessModel::white_noise(2).unwrap();
        let template = Arc::new(ProcessTemplate::build(&model, 2, SafeMath::Clamp).unwrap());
        let plan: Plan<'_, ProcessModel> = Plan::Shared(template);
        let token = CancellationToken::new();
        token.cancel();
        let stop = StopSignal::new(token, None);

        let outcome = generate(&pool(2), &plan, 1_000, 1, &stop).unwrap();
        assert!(outcome.realizations.is_empty());
    }
}
