//! Control loop performance metrics.
//!
//! Computes settling, rise, overshoot and energy figures from a scenario
//! [`Trajectory`].

use crate::error::{SimError, SimResult};
use crate::scenario::Trajectory;
use serde::{Deserialize, Serialize};
use vt_core::numeric::{Tolerances, nearly_equal};

/// Standard control loop performance metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LoopMetrics {
    /// Controlled temperature at the end of the run (°C)
    pub final_temp_c: Option<f64>,
    /// Final error, measured minus setpoint (K)
    pub steady_state_error_c: Option<f64>,
    /// Peak above setpoint, zero if never exceeded (K)
    pub overshoot_c: Option<f64>,
    /// Time after which the temperature stays within the settling band (seconds)
    pub settling_time_s: Option<f64>,
    /// Time to first reach 90% of the setpoint (seconds)
    pub rise_time_s: Option<f64>,
    /// Mean of |measured − setpoint| over the run (K)
    pub mean_abs_deviation_c: Option<f64>,
    /// Population standard deviation of the controlled temperature (K)
    pub std_dev_c: Option<f64>,
    /// Energy delivered by heating (kJ)
    pub heating_energy_kj: f64,
    /// Energy removed by cooling, as a positive number (kJ)
    pub cooling_energy_kj: f64,
    /// Maximum power witnessed (W)
    pub max_power_w: Option<f64>,
    /// Percentage of ticks the power sat at either limit
    pub saturation_pct: f64,
    /// Baseline temperature at the end of the run (°C)
    pub baseline_final_c: Option<f64>,
}

impl LoopMetrics {
    /// Returns true if at least some metrics were computed
    pub fn has_data(&self) -> bool {
        self.final_temp_c.is_some()
    }
}

/// Compute metrics for a scenario run.
///
/// `band_c` is the half-width of the settling band around the setpoint.
/// Returns default (empty) metrics for an empty trajectory.
pub fn compute_loop_metrics(traj: &Trajectory, band_c: f64) -> SimResult<LoopMetrics> {
    if !(band_c.is_finite() && band_c > 0.0) {
        return Err(SimError::InvalidArg {
            what: "settling band must be positive and finite",
        });
    }
    let n = traj.controlled_c.len();
    if n == 0 || traj.setpoint_c.len() != n || traj.time_s.len() != n {
        return Ok(LoopMetrics::default());
    }

    let mut metrics = LoopMetrics::default();

    let setpoint = traj.setpoint_c.last().copied().unwrap_or(0.0);
    let final_measured = traj.controlled_c.last().copied().unwrap_or(0.0);

    metrics.final_temp_c = Some(final_measured);
    metrics.baseline_final_c = traj.final_baseline_c();
    metrics.steady_state_error_c = Some(final_measured - setpoint);

    let peak = traj
        .controlled_c
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    metrics.overshoot_c = Some((peak - setpoint).max(0.0));

    metrics.settling_time_s =
        compute_settling_time(&traj.time_s, &traj.controlled_c, setpoint, band_c);
    metrics.rise_time_s = compute_time_to_reach(
        &traj.time_s,
        &traj.controlled_c,
        traj.start_temp_c,
        0.9 * setpoint,
    );

    let len = n as f64;
    let mad = traj
        .controlled_c
        .iter()
        .map(|t| (t - setpoint).abs())
        .sum::<f64>()
        / len;
    metrics.mean_abs_deviation_c = Some(mad);

    let mean = traj.controlled_c.iter().sum::<f64>() / len;
    let var = traj
        .controlled_c
        .iter()
        .map(|t| (t - mean).powi(2))
        .sum::<f64>()
        / len;
    metrics.std_dev_c = Some(var.sqrt());

    // Power series: energy, peak and saturation
    if !traj.power_w.is_empty() {
        let dt = traj.dt_s;
        metrics.heating_energy_kj =
            traj.power_w.iter().map(|p| p.max(0.0)).sum::<f64>() * dt / 1000.0;
        metrics.cooling_energy_kj =
            traj.power_w.iter().map(|p| (-p).max(0.0)).sum::<f64>() * dt / 1000.0;
        metrics.max_power_w = traj.power_w.iter().copied().reduce(f64::max);
        metrics.saturation_pct = compute_saturation_pct(&traj.power_w, traj.power_limits_w);
    }

    Ok(metrics)
}

/// First time the series crosses `target`, starting from `initial` at t = 0.
///
/// Interpolates linearly between the two samples around the crossing.
fn compute_time_to_reach(time: &[f64], values: &[f64], initial: f64, target: f64) -> Option<f64> {
    let looking_above = target >= initial;
    let reached = |v: f64| if looking_above { v >= target } else { v <= target };

    if reached(initial) {
        return Some(0.0);
    }

    let mut prev = (0.0, initial);
    for (&t, &v) in time.iter().zip(values) {
        if reached(v) {
            let (prev_t, prev_v) = prev;
            let delta_v = v - prev_v;
            if delta_v.abs() > 1e-9 {
                let frac = (target - prev_v) / delta_v;
                return Some(prev_t + frac * (t - prev_t));
            }
            return Some(t);
        }
        prev = (t, v);
    }
    None
}

/// Time at which the series enters `[setpoint − band, setpoint + band]` and
/// stays there until the end.
fn compute_settling_time(time: &[f64], values: &[f64], setpoint: f64, band: f64) -> Option<f64> {
    let mut entry: Option<f64> = None;

    for (&t, &v) in time.iter().zip(values) {
        let in_band = (v - setpoint).abs() <= band;
        match (entry, in_band) {
            (None, true) => entry = Some(t),
            (Some(_), false) => entry = None,
            _ => {}
        }
    }

    entry
}

/// Percentage of samples sitting at either power limit.
fn compute_saturation_pct(power: &[f64], (lo, hi): (f64, f64)) -> f64 {
    if power.is_empty() || lo >= hi {
        return 0.0;
    }
    let tol = Tolerances::default();
    let at_limit = |p: f64| {
        p <= lo || p >= hi || nearly_equal(p, lo, tol) || nearly_equal(p, hi, tol)
    };
    let saturated = power.iter().filter(|&&p| at_limit(p)).count();
    100.0 * saturated as f64 / power.len() as f64
}
