//! Error types for model construction.
//!
//! Model evaluation itself has no error conditions: mean and correlation
//! functions are pure and total over `[0, n)`. Only the *construction* of a
//! model is validated, so that invalid input fails fast before any
//! simulation work begins.

use thiserror::Error;

/// Errors raised while constructing a process model.
///
/// # Examples
/// ```
/// use process_core::ModelError;
///
/// let err = ModelError::EmptyProcess;
/// assert_eq!(format!("{}", err), "Process length must be at least 1");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Process length `n` is zero.
    #[error("Process length must be at least 1")]
    EmptyProcess,

    /// Time grid step is zero, negative or not finite.
    #[error("Invalid time step {0}: must be finite and positive")]
    InvalidStep(f64),

    /// A built-in function parameter is outside its domain.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_display() {
        let err = ModelError::InvalidStep(-0.5);
        assert!(err.to_string().contains("Invalid time step -0.5"));

        let err = ModelError::InvalidParameter {
            name: "alpha",
            value: f64::NAN,
        };
        assert!(err.to_string().contains("alpha"));
    }
}
