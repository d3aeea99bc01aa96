//! Uniform time grid.
//!
//! Simulation works on integer indices `0..n`; the grid maps an index to the
//! physical time `t_i = i · h` so that built-in kernels can be written in
//! terms of time differences and reports can label their abscissa.

use crate::error::ModelError;

/// Uniform grid `t_i = i · step`.
///
/// # Examples
///
/// ```rust
/// use process_core::TimeGrid;
///
/// let grid = TimeGrid::new(0.025).unwrap();
/// assert!((grid.time(4) - 0.1).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeGrid {
    step: f64,
}

impl TimeGrid {
    /// Creates a grid with the given step.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidStep`] if `step` is not finite or not
    /// strictly positive.
    pub fn new(step: f64) -> Result<Self, ModelError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(ModelError::InvalidStep(step));
        }
        Ok(Self { step })
    }

    /// Unit grid, `t_i = i`.
    #[inline]
    pub fn unit() -> Self {
        Self { step: 1.0 }
    }

    /// Returns the grid step `h`.
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns `t_i`.
    #[inline]
    pub fn time(&self, index: usize) -> f64 {
        index as f64 * self.step
    }

    /// Returns the first `n` grid times.
    pub fn times(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.time(i)).collect()
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self::unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_times() {
        let grid = TimeGrid::new(0.25).unwrap();
        assert_eq!(grid.time(0), 0.0);
        assert_relative_eq!(grid.time(3), 0.75, epsilon = 1e-15);
        assert_eq!(grid.times(3), vec![0.0, 0.25, 0.5]);
    }

    #[test]
    fn test_grid_rejects_bad_step() {
        assert_eq!(TimeGrid::new(0.0), Err(ModelError::InvalidStep(0.0)));
        assert!(TimeGrid::new(-1.0).is_err());
        assert!(TimeGrid::new(f64::INFINITY).is_err());
        assert!(TimeGrid::new(f64::NAN).is_err());
    }

    #[test]
    fn test_unit_grid_is_default() {
        assert_eq!(TimeGrid::default(), TimeGrid::unit());
        assert_eq!(TimeGrid::unit().time(7), 7.0);
    }
}
