//! Feedback control for the vessel loop.
//!
//! A discrete PID controller with a fixed sample time, output saturation and
//! back-calculation anti-windup. The controller knows nothing about the
//! process it drives; feed-forward terms are supplied by the caller.

pub mod controller;
pub mod error;

pub use controller::{ControllerPhase, PidConfig, PidController, PidState};
pub use error::{ControlError, ControlResult};
