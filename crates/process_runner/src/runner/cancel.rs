//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared cancellation flag.
///
/// Clones observe the same flag. Once cancelled, workers stop taking tasks
/// and discard the realization in flight; the run keeps whatever completed.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates an untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Stop condition seen by workers: external cancellation or a deadline.
#[derive(Debug)]
pub(crate) struct StopSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
    timed_out: AtomicBool,
}

impl StopSignal {
    pub(crate) fn new(token: CancellationToken, deadline: Option<Instant>) -> Self {
        Self {
            token,
            deadline,
            timed_out: AtomicBool::new(false),
        }
    }

    /// Checks the token and the deadline.
    ///
    /// An expired deadline is latched locally; the caller's token is never
    /// written, so a timeout only ends the current run.
    pub(crate) fn should_stop(&self) -> bool {
        if self.token.is_cancelled() || self.timed_out() {
            return true;
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.timed_out.store(true, Ordering::SeqCst);
            return true;
        }
        false
    }

    pub(crate) fn timed_out(&self) -> bool {
        self.timed_out.load(Ordering::SeqCst)
    }
}
