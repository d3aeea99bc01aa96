use std::fmt;

/// Handling of degenerate conditional variances during template construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SafeMath {
    /// Clamp negative/NaN variances to zero and force the coefficients that
    /// would divide by a zero variance to zero. Lossy but always finite for
    /// finite input.
    #[default]
    Clamp,

    /// Keep raw values: negative variances turn into NaN draws through the
    /// square root and zero divisors into infinities.
    Propagate,
}

impl SafeMath {
    /// Returns `true` for [`SafeMath::Clamp`].
    #[inline]
    pub fn clamps(self) -> bool {
        matches!(self, SafeMath::Clamp)
    }
}

impl From<bool> for SafeMath {
    /// `true` maps to [`SafeMath::Clamp`].
    fn from(try_safe_math: bool) -> Self {
        if try_safe_math {
            SafeMath::Clamp
        } else {
            SafeMath::Propagate
        }
    }
}

impl fmt::Display for SafeMath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafeMath::Clamp => write!(f, "clamp"),
            SafeMath::Propagate => write!(f, "propagate"),
        }
    }
}
