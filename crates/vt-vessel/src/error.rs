//! Error types for vessel construction and stepping.

use thiserror::Error;
use vt_core::CoreError;

/// Errors raised by the vessel model.
///
/// Property-lookup failures never show up here: the process substitutes
/// fallback properties instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VesselError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },
}

pub type VesselResult<T> = Result<T, VesselError>;

impl From<CoreError> for VesselError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidArg { what } => VesselError::InvalidArg { what },
            CoreError::NonFinite { what, value } | CoreError::OutOfRange { what, value } => {
                VesselError::OutOfRange { what, value }
            }
        }
    }
}
