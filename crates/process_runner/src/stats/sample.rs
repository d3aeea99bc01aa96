//! Owned collection of completed realizations.

use process_kernel::Realization;

use crate::error::StatsError;

/// Realizations of a single run, all of length `process_len`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatisticsSample {
    process_len: usize,
    realizations: Vec<Realization>,
}

impl StatisticsSample {
    /// Creates an empty sample for processes of length `process_len`.
    pub fn new(process_len: usize) -> Self {
        Self {
            process_len,
            realizations: Vec::new(),
        }
    }

    /// Creates a sample from existing realizations.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::LengthMismatch`] for the first realization whose
    /// length is not `process_len`.
    pub fn from_realizations(
        process_len: usize,
        realizations: Vec<Realization>,
    ) -> Result<Self, StatsError> {
        if let Some(bad) = realizations.iter().find(|r| r.len() != process_len) {
            return Err(StatsError::LengthMismatch {
                expected: process_len,
                got: bad.len(),
            });
        }
        Ok(Self {
            process_len,
            realizations,
        })
    }

    /// Process length `n`.
    #[inline]
    pub fn process_len(&self) -> usize {
        self.process_len
    }

    /// Number of realizations `N`.
    #[inline]
    pub fn len(&self) -> usize {
        self.realizations.len()
    }

    /// Returns `true` if no realization was collected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.realizations.is_empty()
    }

    /// All realizations.
    #[inline]
    pub fn realizations(&self) -> &[Realization] {
        &self.realizations
    }

    /// First `k` realizations (fewer if the sample is smaller).
    pub fn head(&self, k: usize) -> &[Realization] {
        &self.realizations[..k.min(self.realizations.len())]
    }

    /// Iterates over the realizations.
    pub fn iter(&self) -> std::slice::Iter<'_, Realization> {
        self.realizations.iter()
    }
}

impl<'a> IntoIterator for &'a StatisticsSample {
    type Item = &'a Realization;
    type IntoIter = std::slice::Iter<'a, Realization>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
