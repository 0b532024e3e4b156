//! Discrete PID controller.
//!
//! The controller runs at a fixed sample time and includes:
//! - Output clamping to `[out_min, out_max]`
//! - Integral clamping to `±integral_max`
//! - Back-calculation anti-windup on saturation
//!
//! The update law lives on [`PidConfig`] as a pure function of the previous
//! [`PidState`]; [`PidController`] owns one state and advances it.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};
use vt_core::numeric::{clamp_finite, ensure_finite, ensure_non_negative, ensure_positive};

/// Floor on `ki` when sizing the integral clamp, so `ki = 0` stays finite.
const KI_FLOOR: f64 = 1e-6;

/// PID controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (per second).
    pub ki: f64,
    /// Derivative gain (seconds).
    pub kd: f64,
    /// Sample time (seconds).
    pub dt_s: f64,
    /// Minimum output value.
    pub out_min: f64,
    /// Maximum output value.
    pub out_max: f64,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 50.0,
            ki: 1.0,
            kd: 5.0,
            dt_s: 5.0,
            out_min: -2000.0,
            out_max: 5000.0,
        }
    }
}

/// Whether the controller has produced an output since construction or reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerPhase {
    #[default]
    Initialized,
    Running,
}

/// PID controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    /// Integral accumulator (error · seconds).
    pub integral: f64,
    /// Error at the previous sample; zero before the first one.
    pub prev_error: f64,
    /// Output emitted at the previous sample.
    pub prev_output: f64,
    pub phase: ControllerPhase,
}

impl PidConfig {
    pub fn validate(&self) -> ControlResult<()> {
        ensure_non_negative(self.kp, "kp")?;
        ensure_non_negative(self.ki, "ki")?;
        ensure_non_negative(self.kd, "kd")?;
        ensure_positive(self.dt_s, "dt_s")?;
        ensure_finite(self.out_min, "out_min")?;
        ensure_finite(self.out_max, "out_max")?;
        if self.out_min >= self.out_max {
            return Err(ControlError::InvalidArg {
                what: "out_min must be less than out_max",
            });
        }
        ensure_finite(self.out_max - self.out_min, "output span")?;
        Ok(())
    }

    /// Bound on the integral accumulator, `|out_max − out_min| / max(ki, 1e-6)`.
    pub fn integral_max(&self) -> f64 {
        (self.out_max - self.out_min).abs() / self.ki.max(KI_FLOOR)
    }

    /// Compute controller output.
    ///
    /// Inputs are expected to be finite; see [`PidController::compute`] for
    /// the checked entry point.
    pub fn update(&self, state: &PidState, sp: f64, pv: f64) -> (PidState, f64) {
        self.update_with_feedforward(state, sp, pv, 0.0)
    }

    /// Compute controller output with an additive feed-forward term.
    ///
    /// The P-I-D part is saturated (with anti-windup) before `ff` is added, so
    /// feed-forward never winds the integral. The sum is clamped again.
    pub fn update_with_feedforward(
        &self,
        state: &PidState,
        sp: f64,
        pv: f64,
        ff: f64,
    ) -> (PidState, f64) {
        let dt = self.dt_s;
        let i_max = self.integral_max();

        // Error
        let error = sp - pv;

        // Proportional term
        let p_term = self.kp * error;

        // Integral term, clamped
        let mut integral = (state.integral + error * dt).clamp(-i_max, i_max);
        let i_term = self.ki * integral;

        // Derivative on error; the first sample differences against zero
        let d_term = self.kd * (error - state.prev_error) / dt;

        let output_raw = p_term + i_term + d_term;

        // Anti-windup: bleed the excess out of the integral
        let pid_output = if output_raw > self.out_max {
            if self.ki > 0.0 {
                integral -= (output_raw - self.out_max) / self.ki;
            }
            self.out_max
        } else if output_raw < self.out_min {
            if self.ki > 0.0 {
                integral -= (output_raw - self.out_min) / self.ki;
            }
            self.out_min
        } else {
            output_raw
        };
        let integral = integral.clamp(-i_max, i_max);

        let output = clamp_finite(pid_output + ff, self.out_min, self.out_max);

        let new_state = PidState {
            integral,
            prev_error: error,
            prev_output: output,
            phase: ControllerPhase::Running,
        };

        (new_state, output)
    }
}

/// Stateful PID controller: one per control loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PidController {
    config: PidConfig,
    state: PidState,
}

impl PidController {
    pub fn new(config: PidConfig) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: PidState::default(),
        })
    }

    /// Advance one sample and return the bounded output.
    ///
    /// Non-finite setpoint or measurement is rejected and leaves the state untouched.
    pub fn compute(&mut self, setpoint: f64, measurement: f64) -> ControlResult<f64> {
        self.compute_with_feedforward(setpoint, measurement, 0.0)
    }

    /// Like [`compute`](Self::compute) with an additive feed-forward term.
    pub fn compute_with_feedforward(
        &mut self,
        setpoint: f64,
        measurement: f64,
        ff: f64,
    ) -> ControlResult<f64> {
        ensure_finite(setpoint, "setpoint")?;
        ensure_finite(measurement, "measurement")?;
        ensure_finite(ff, "feed-forward")?;

        let (state, output) =
            self.config
                .update_with_feedforward(&self.state, setpoint, measurement, ff);
        self.state = state;
        Ok(output)
    }

    /// Zero the integral, previous error and previous output.
    pub fn reset(&mut self) {
        self.state = PidState::default();
    }

    /// Snapshot of the internal state.
    pub fn status(&self) -> PidState {
        self.state
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(kp: f64, ki: f64, kd: f64) -> PidConfig {
        PidConfig {
            kp,
            ki,
            kd,
            ..Default::default()
        }
    }

    #[test]
    fn pid_controller_creation() {
        let pid = PidController::new(PidConfig::default()).unwrap();
        assert_eq!(pid.config().kp, 50.0);
        assert_eq!(pid.status(), PidState::default());
        assert_eq!(pid.status().phase, ControllerPhase::Initialized);
    }

    #[test]
    fn invalid_controller_params() {
        let bad = [
            PidConfig {
                dt_s: 0.0,
                ..Default::default()
            },
            PidConfig {
                dt_s: -5.0,
                ..Default::default()
            },
            PidConfig {
                kp: -1.0,
                ..Default::default()
            },
            PidConfig {
                ki: f64::NAN,
                ..Default::default()
            },
            PidConfig {
                kd: f64::INFINITY,
                ..Default::default()
            },
            PidConfig {
                out_min: 10.0,
                out_max: 10.0,
                ..Default::default()
            },
            PidConfig {
                out_min: 10.0,
                out_max: 0.0,
                ..Default::default()
            },
        ];
        for c in bad {
            assert!(PidController::new(c.clone()).is_err(), "{c:?}");
        }
    }

    #[test]
    fn proportional_only() {
        let mut pid = PidController::new(cfg(2.0, 0.0, 0.0)).unwrap();
        assert_eq!(pid.compute(10.0, 4.0).unwrap(), 12.0);
        assert_eq!(pid.compute(10.0, 14.0).unwrap(), -8.0);
        assert_eq!(pid.compute(10_000.0, 0.0).unwrap(), 5000.0);
    }

    #[test]
    fn first_derivative_uses_zero_previous_error() {
        let mut pid = PidController::new(cfg(0.0, 0.0, 5.0)).unwrap();
        // D = 5 · (10 − 0) / 5
        assert_eq!(pid.compute(10.0, 0.0).unwrap(), 10.0);
        // Same error again: no derivative action
        assert_eq!(pid.compute(10.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn integral_accumulates_error_times_dt() {
        let mut pid = PidController::new(PidConfig {
            kp: 0.0,
            ki: 0.5,
            kd: 0.0,
            dt_s: 2.0,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(pid.compute(1.0, 0.0).unwrap(), 1.0);
        assert_eq!(pid.compute(1.0, 0.0).unwrap(), 2.0);
        assert_eq!(pid.status().integral, 4.0);
    }

    #[test]
    fn back_calculation_holds_integral_at_the_limit() {
        let mut pid = PidController::new(PidConfig::default()).unwrap();
        for _ in 0..200 {
            let out = pid.compute(37.0, 20.0).unwrap();
            assert!(out <= 5000.0);
        }
        // Saturated with a constant error of 17: P = 850, D = 0
        assert!((pid.status().integral - 4150.0).abs() < 1e-9);
        assert_eq!(pid.status().prev_output, 5000.0);
    }

    #[test]
    fn released_output_recovers_immediately() {
        let c = PidConfig::default();
        let mut pid = PidController::new(c.clone()).unwrap();
        for _ in 0..200 {
            pid.compute(37.0, 20.0).unwrap();
        }
        let released = pid.compute(37.0, 38.0).unwrap();
        assert!(released < c.out_max, "released output {released}");
        let span = (c.out_max - c.out_min).abs();
        assert!((c.ki * pid.status().integral).abs() <= span);
    }

    #[test]
    fn zero_ki_skips_back_calculation() {
        let c = cfg(1000.0, 0.0, 0.0);
        let mut pid = PidController::new(c.clone()).unwrap();
        for _ in 0..10 {
            assert_eq!(pid.compute(37.0, 20.0).unwrap(), 5000.0);
        }
        assert!((pid.status().integral - 10.0 * 17.0 * 5.0).abs() < 1e-9);
        assert!(pid.status().integral <= c.integral_max());
    }

    #[test]
    fn negative_saturation_is_symmetric() {
        let mut pid = PidController::new(PidConfig::default()).unwrap();
        for _ in 0..200 {
            assert!(pid.compute(20.0, 90.0).unwrap() >= -2000.0);
        }
        // Saturated low with error −70: P = −3500, so integral = (−2000 + 3500) / 1
        assert!((pid.status().integral - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn feedforward_shifts_output_but_not_integral() {
        let mut plain = PidController::new(PidConfig::default()).unwrap();
        let mut with_ff = PidController::new(PidConfig::default()).unwrap();
        for pv in [20.0, 25.0, 30.0, 35.0, 36.5, 37.2] {
            let a = plain.compute(37.0, pv).unwrap();
            let b = with_ff.compute_with_feedforward(37.0, pv, 150.0).unwrap();
            assert!(b >= a);
            assert!(b <= 5000.0);
            assert_eq!(plain.status().integral, with_ff.status().integral);
        }
    }

    #[test]
    fn feedforward_alone_is_clamped() {
        let mut pid = PidController::new(cfg(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(pid.compute_with_feedforward(37.0, 37.0, 1200.0).unwrap(), 1200.0);
        assert_eq!(pid.compute_with_feedforward(37.0, 37.0, 1.0e5).unwrap(), 5000.0);
        assert_eq!(pid.compute_with_feedforward(37.0, 37.0, -1.0e5).unwrap(), -2000.0);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut pid = PidController::new(PidConfig::default()).unwrap();
        let fresh_first = pid.clone().compute(37.0, 20.0).unwrap();
        for pv in [20.0, 22.0, 30.0] {
            pid.compute(37.0, pv).unwrap();
        }
        assert_eq!(pid.status().phase, ControllerPhase::Running);

        pid.reset();
        let once = pid.status();
        pid.reset();
        assert_eq!(pid.status(), once);
        assert_eq!(once, PidState::default());
        assert_eq!(pid.compute(37.0, 20.0).unwrap(), fresh_first);
    }

    #[test]
    fn non_finite_input_leaves_state_untouched() {
        let mut pid = PidController::new(PidConfig::default()).unwrap();
        pid.compute(37.0, 20.0).unwrap();
        let before = pid.status();
        assert!(pid.compute(37.0, f64::NAN).is_err());
        assert!(pid.compute(f64::INFINITY, 20.0).is_err());
        assert!(pid.compute_with_feedforward(37.0, 20.0, f64::NAN).is_err());
        assert_eq!(pid.status(), before);
    }

    #[test]
    fn pure_update_matches_stateful_controller() {
        let c = PidConfig::default();
        let mut pid = PidController::new(c.clone()).unwrap();
        let mut state = PidState::default();
        for pv in [20.0, 24.0, 31.0, 36.0, 38.0] {
            let (next, out) = c.update(&state, 37.0, pv);
            state = next;
            assert_eq!(pid.compute(37.0, pv).unwrap(), out);
        }
        assert_eq!(pid.status(), state);
    }

    #[test]
    fn config_reads_from_partial_yaml() {
        let c: PidConfig = serde_yaml::from_str("kp: 500\n").unwrap();
        assert_eq!(c.kp, 500.0);
        assert_eq!(c.ki, 1.0);
        assert_eq!(c.out_max, 5000.0);
    }
}
