//! vt-sim: closed-loop scenarios for the stirred vessel.
//!
//! A scenario drives one controlled vessel with a PID controller and one
//! identical, unpowered baseline vessel side by side, recording both
//! trajectories for comparison.

pub mod config;
pub mod error;
pub mod metrics;
pub mod scenario;

pub use config::{PropertyBackend, ScenarioConfig, load_scenario};
pub use error::{SimError, SimResult};
pub use metrics::{LoopMetrics, compute_loop_metrics};
pub use scenario::{Trajectory, run_scenario, run_scenario_with};
