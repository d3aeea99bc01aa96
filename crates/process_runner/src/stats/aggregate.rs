//! Observed and ideal statistics.

use process_core::CorrelationModel;
use rayon::prelude::*;

use super::sample::StatisticsSample;

/// Dense square matrix indexed by time-index pairs, stored row-major.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovarianceMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl CovarianceMatrix {
    /// Builds a matrix by evaluating `f(i, j)` for every entry.
    pub fn from_fn<F>(dim: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f64,
    {
        let values = (0..dim)
            .flat_map(|i| (0..dim).map(move |j| (i, j)))
            .map(|(i, j)| f(i, j))
            .collect();
        Self { dim, values }
    }

    /// Builds a symmetric matrix from its upper triangle.
    ///
    /// `upper[i]` holds entries `(i, i..dim)`.
    fn from_upper(dim: usize, upper: Vec<Vec<f64>>) -> Self {
        let mut values = vec![0.0; dim * dim];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, value) in row.into_iter().enumerate() {
                let j = i + offset;
                values[i * dim + j] = value;
                values[j * dim + i] = value;
            }
        }
        Self { dim, values }
    }

    /// Matrix dimension `n`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.dim + j]
    }

    /// Row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterates over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on zero
        self.values.chunks_exact(self.dim.max(1))
    }

    /// Returns `true` if `|a(i,j) − a(j,i)| <= tolerance` everywhere.
    ///
    /// NaN entries compare unequal.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.dim).all(|i| {
            (i + 1..self.dim).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
        })
    }
}

/// Empirical statistics of a sample.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservedStatistics {
    /// Sample size `N`.
    pub sample_size: usize,
    /// Observed mean per index.
    pub means: Vec<f64>,
    /// Bessel-corrected sample covariance.
    pub covariance: CovarianceMatrix,
}

impl ObservedStatistics {
    /// Computes means and covariance, one row per rayon task.
    ///
    /// Only the upper triangle is computed; the lower is mirrored, so the
    /// result is exactly symmetric. With `N < 2` every covariance entry is
    /// NaN; with `N = 0` the means are NaN as well.
    pub fn compute(sample: &StatisticsSample) -> Self {
        let n = sample.process_len();
        let count = sample.len() as f64;
        let realizations = sample.realizations();

        let sums: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|i| realizations.iter().map(|x| x[i]).sum::<f64>())
            .collect();

        let covariance = if sample.len() < 2 {
            CovarianceMatrix::from_fn(n, |_, _| f64::NAN)
        } else {
            let upper: Vec<Vec<f64>> = (0..n)
                .into_par_iter()
                .map(|i| {
                    (i..n)
                        .map(|j| {
                            let cross: f64 = realizations.iter().map(|x| x[i] * x[j]).sum();
                            (cross - sums[i] * sums[j] / count) / (count - 1.0)
                        })
                        .collect::<Vec<f64>>()
                })
                .collect();
            CovarianceMatrix::from_upper(n, upper)
        };

        Self {
            sample_size: sample.len(),
            means: sums.iter().map(|s| s / count).collect(),
            covariance,
        }
    }
}

/// Theoretical statistics of a model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdealStatistics {
    /// Time label per index.
    pub times: Vec<f64>,
    /// `m(i)` per index.
    pub means: Vec<f64>,
    /// `K(i, j)` for every pair.
    pub correlation: CovarianceMatrix,
}

impl IdealStatistics {
    /// Evaluates the model over `[0, n)`.
    pub fn compute<M: CorrelationModel + ?Sized>(model: &M, n: usize) -> Self {
        Self {
            times: (0..n).map(|i| model.time(i)).collect(),
            means: (0..n).map(|i| model.mean(i)).collect(),
            correlation: CovarianceMatrix::from_fn(n, |i, j| model.correlation(i, j)),
        }
    }
}
