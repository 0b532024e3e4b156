//! Error types for control operations.

use thiserror::Error;
use vt_core::CoreError;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Numeric parameter outside its admissible range.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },
}

impl From<CoreError> for ControlError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidArg { what } => ControlError::InvalidArg { what },
            CoreError::NonFinite { what, value } | CoreError::OutOfRange { what, value } => {
                ControlError::OutOfRange { what, value }
            }
        }
    }
}
