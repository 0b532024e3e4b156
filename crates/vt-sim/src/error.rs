//! Error types for scenario runs.

use thiserror::Error;

/// Errors encountered while configuring or running a scenario.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Vessel error: {0}")]
    Vessel(#[from] vt_vessel::VesselError),

    #[error("Control error: {0}")]
    Control(#[from] vt_controls::ControlError),

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<vt_fluids::FluidError> for SimError {
    fn from(e: vt_fluids::FluidError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<vt_core::CoreError> for SimError {
    fn from(e: vt_core::CoreError) -> Self {
        use vt_core::CoreError;
        match e {
            CoreError::InvalidArg { what } => SimError::InvalidArg { what },
            CoreError::NonFinite { what, value } | CoreError::OutOfRange { what, value } => {
                SimError::OutOfRange { what, value }
            }
        }
    }
}
