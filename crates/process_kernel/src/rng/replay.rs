//! Deterministic draw source.

use super::NormalSource;

/// Replays a fixed sequence of draws, wrapping around when exhausted.
///
/// Used to drive two generators with exactly the same draws, and to
/// reproduce a realization from recorded draws.
///
/// # Examples
///
/// ```rust
/// use process_kernel::rng::{NormalSource, ReplaySource};
///
/// let mut source = ReplaySource::new(vec![0.5, -1.0]);
/// let mut buffer = [0.0; 3];
/// source.fill_normal(&mut buffer);
/// assert_eq!(buffer, [0.5, -1.0, 0.5]);
/// ```
#[derive(Clone, Debug)]
pub struct ReplaySource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ReplaySource {
    /// Creates a source over `draws`.
    ///
    /// # Panics
    ///
    /// Panics if `draws` is empty.
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "ReplaySource requires at least one draw");
        Self { draws, cursor: 0 }
    }

    /// Number of draws handed out so far.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl NormalSource for ReplaySource {
    fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.draws[self.cursor % self.draws.len()];
            self.cursor += 1;
        }
    }
}
