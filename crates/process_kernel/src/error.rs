//! Error types for the simulation kernel.

use process_core::ModelError;
use thiserror::Error;

/// Kernel error.
///
/// Only structural misuse is reported here. Numerical trouble inside the
/// template (negative or NaN variances, zero divisors) is a value-level
/// outcome governed by [`SafeMath`](crate::template::SafeMath), never an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// The model could not be used to build a template.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A draw vector does not match the template length.
    #[error("Expected {expected} draws, got {got}")]
    DrawCount {
        /// Template length `n`.
        expected: usize,
        /// Supplied draw count.
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_error_display() {
        let err = KernelError::DrawCount {
            expected: 5,
            got: 4,
        };
        assert_eq!(err.to_string(), "Expected 5 draws, got 4");

        let err: KernelError = ModelError::EmptyProcess.into();
        assert_eq!(err.to_string(), "Process length must be at least 1");
    }
}
