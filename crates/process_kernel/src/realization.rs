//! A single simulated sample path.

use std::ops::Deref;

/// One realization of the process: `n` values ordered by time index.
///
/// Created fresh by each generation call and owned by its consumer; it is
/// never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Realization(Vec<f64>);

impl Realization {
    /// Returns the values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Realization {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl Deref for Realization {
    type Target = [f64];

    #[inline]
    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl AsRef<[f64]> for Realization {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
