//! Theoretical vs empirical comparison, zipped index-wise.

use super::aggregate::{IdealStatistics, ObservedStatistics};
use crate::error::StatsError;

/// One `(theoretical, empirical)` pair.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonRow {
    /// Value from the model.
    pub theoretical: f64,
    /// Value estimated from realizations.
    pub empirical: f64,
    /// `empirical − theoretical`.
    pub delta: f64,
}

impl ComparisonRow {
    /// Pairs a theoretical and an empirical value.
    #[inline]
    pub fn new(theoretical: f64, empirical: f64) -> Self {
        Self {
            theoretical,
            empirical,
            delta: empirical - theoretical,
        }
    }
}

/// Comparison of a run's observed statistics with the model.
///
/// `mean[i]` compares `m(i)` with the observed mean; `correlation_rows[i][j]`
/// compares `K(i, j)` with the observed covariance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonReport {
    /// Time label per index.
    pub times: Vec<f64>,
    /// Mean function comparison.
    pub mean: Vec<ComparisonRow>,
    /// One correlation row `K(t_i, ·)` per index.
    pub correlation_rows: Vec<Vec<ComparisonRow>>,
}

impl ComparisonReport {
    /// Zips ideal and observed statistics.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::LengthMismatch`] if the two sides describe
    /// processes of different lengths.
    pub fn new(
        ideal: &IdealStatistics,
        observed: &ObservedStatistics,
    ) -> Result<Self, StatsError> {
        let n = ideal.means.len();
        if observed.means.len() != n || observed.covariance.dim() != n {
            return Err(StatsError::LengthMismatch {
                expected: n,
                got: observed.means.len(),
            });
        }

        let mean = zip_rows(&ideal.means, &observed.means);
        let correlation_rows = (0..n)
            .map(|i| zip_rows(ideal.correlation.row(i), observed.covariance.row(i)))
            .collect();

        Ok(Self {
            times: ideal.times.clone(),
            mean,
            correlation_rows,
        })
    }

    /// Process length `n`.
    #[inline]
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    /// Returns `true` for an empty report.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Largest `|delta|` of the mean comparison; NaN if any delta is NaN.
    pub fn max_abs_mean_delta(&self) -> f64 {
        max_abs_delta(self.mean.iter())
    }

    /// Largest `|delta|` over all correlation rows; NaN if any delta is NaN.
    pub fn max_abs_correlation_delta(&self) -> f64 {
        max_abs_delta(self.correlation_rows.iter().flatten())
    }
}

fn zip_rows(theoretical: &[f64], empirical: &[f64]) -> Vec<ComparisonRow> {
    theoretical
        .iter()
        .zip(empirical)
        .map(|(&t, &e)| ComparisonRow::new(t, e))
        .collect()
}

// f64::max drops NaN, which would hide an undefined statistic.
fn max_abs_delta<'a>(rows: impl Iterator<Item = &'a ComparisonRow>) -> f64 {
    rows.fold(0.0, |acc: f64, row| {
        if acc.is_nan() || row.delta.is_nan() {
            f64::NAN
        } else {
            acc.max(row.delta.abs())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{ObservedStatistics, StatisticsSample};
    use approx::assert_relative_eq;
    use process_core::ProcessModel;

    fn report(rows: Vec<Vec<f64>>) -> ComparisonReport {
        let n = rows[0].len();
        let model = ProcessModel::white_noise(n).unwrap();
        let sample =
            StatisticsSample::from_realizations(n, rows.into_iter().map(Into::into).collect())
                .unwrap();
        ComparisonReport::new(
            &IdealStatistics::compute(&model, n),
            &ObservedStatistics::compute(&sample),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let model = ProcessModel::white_noise(3).unwrap();
        let sample = StatisticsSample::from_realizations(2, vec![vec![1.0, 2.0].into()]).unwrap();

        let err = ComparisonReport::new(
            &IdealStatistics::compute(&model, 3),
            &ObservedStatistics::compute(&sample),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StatsError::LengthMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_row_delta() {
        let row = ComparisonRow::new(1.0, 1.25);
        assert_relative_eq!(row.delta, 0.25);
    }

    #[test]
    fn test_report_shape_and_deltas() {
        let r = report(vec![vec![1.0, -1.0], vec![-1.0, 1.0]]);

        assert_eq!(r.len(), 2);
        assert_eq!(r.times, vec![0.0, 1.0]);
        assert_eq!(r.correlation_rows.len(), 2);
        assert_eq!(r.correlation_rows[0].len(), 2);

        // means are exactly zero
        assert_eq!(r.max_abs_mean_delta(), 0.0);
        // observed variance 2 vs 1, covariance -2 vs 0
        assert_relative_eq!(r.correlation_rows[0][0].delta, 1.0);
        assert_relative_eq!(r.correlation_rows[0][1].empirical, -2.0);
        assert_relative_eq!(r.max_abs_correlation_delta(), 2.0);
    }

    #[test]
    fn test_nan_delta_is_surfaced() {
        let r = report(vec![vec![0.5, 0.5]]);
        assert_relative_eq!(r.max_abs_mean_delta(), 0.5);
        assert!(r.max_abs_correlation_delta().is_nan());
    }
}
