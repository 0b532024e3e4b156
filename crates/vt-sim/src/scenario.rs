//! Closed-loop scenario runner.

use crate::config::ScenarioConfig;
use crate::error::SimResult;
use serde::Serialize;
use tracing::{debug, info};
use vt_controls::PidController;
use vt_fluids::PropertyModel;
use vt_vessel::ThermalProcess;

/// Per-tick record of a scenario.
///
/// Entry `i` describes the state after tick `i + 1`: `time_s[i] = (i + 1) · dt_s`.
/// `power_w` is the power the controlled vessel actually received and
/// `heat_loss_w` its loss at the start of the tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Trajectory {
    pub time_s: Vec<f64>,
    pub controlled_c: Vec<f64>,
    pub baseline_c: Vec<f64>,
    pub power_w: Vec<f64>,
    pub heat_loss_w: Vec<f64>,
    pub setpoint_c: Vec<f64>,
    /// Temperature both vessels started from [°C]
    pub start_temp_c: f64,
    pub dt_s: f64,
    /// Controller output bounds `(out_min, out_max)` [W]
    pub power_limits_w: (f64, f64),
    /// Ticks in which the controlled vessel used fallback properties.
    pub fallback_ticks: usize,
}

impl Trajectory {
    fn with_capacity(n: usize) -> Self {
        Self {
            time_s: Vec::with_capacity(n),
            controlled_c: Vec::with_capacity(n),
            baseline_c: Vec::with_capacity(n),
            power_w: Vec::with_capacity(n),
            heat_loss_w: Vec::with_capacity(n),
            setpoint_c: Vec::with_capacity(n),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    pub fn final_controlled_c(&self) -> Option<f64> {
        self.controlled_c.last().copied()
    }

    pub fn final_baseline_c(&self) -> Option<f64> {
        self.baseline_c.last().copied()
    }
}

/// Run `config` with the property backend it names.
pub fn run_scenario(config: &ScenarioConfig) -> SimResult<Trajectory> {
    let controlled = config.properties.build()?;
    let baseline = config.properties.build()?;
    run_scenario_with(config, controlled, baseline)
}

/// Run `config` with explicitly supplied property models for the controlled
/// and baseline vessels.
///
/// Each tick the controller samples the controlled vessel, its output is
/// applied for `dt_s`, and the baseline vessel is stepped with zero power.
pub fn run_scenario_with(
    config: &ScenarioConfig,
    controlled_model: Box<dyn PropertyModel>,
    baseline_model: Box<dyn PropertyModel>,
) -> SimResult<Trajectory> {
    config.validate()?;

    let mut vessel = ThermalProcess::new(config.vessel.clone(), controlled_model)?;
    let mut baseline = ThermalProcess::new(config.vessel.clone(), baseline_model)?;
    let controller_config = config.controller_config();
    let mut pid = PidController::new(controller_config.clone())?;

    let ticks = config.ticks();
    let dt = config.dt_s;
    let sp = config.setpoint_c;

    info!(
        scenario = %config.name,
        ticks,
        dt_s = dt,
        setpoint_c = sp,
        model = vessel.model_name(),
        feedforward = config.feedforward,
        "scenario start"
    );

    let mut traj = Trajectory::with_capacity(ticks);
    traj.start_temp_c = vessel.temperature_c();
    traj.dt_s = dt;
    traj.power_limits_w = (controller_config.out_min, controller_config.out_max);

    let mut saturated_ticks = 0usize;
    for i in 0..ticks {
        let measurement = vessel.temperature_c();
        let output = if config.feedforward {
            pid.compute_with_feedforward(sp, measurement, vessel.heat_loss())?
        } else {
            pid.compute(sp, measurement)?
        };
        if output <= controller_config.out_min || output >= controller_config.out_max {
            saturated_ticks += 1;
        }

        let report = vessel.step(output, dt)?;
        let base = baseline.step(0.0, dt)?;
        if report.used_fallback {
            traj.fallback_ticks += 1;
        }

        traj.time_s.push((i + 1) as f64 * dt);
        traj.controlled_c.push(report.temperature_c);
        traj.baseline_c.push(base.temperature_c);
        traj.power_w.push(report.power_w);
        traj.heat_loss_w.push(report.heat_loss_w);
        traj.setpoint_c.push(sp);
    }

    debug!(saturated_ticks, fallback_ticks = traj.fallback_ticks, "controller statistics");
    info!(
        scenario = %config.name,
        final_c = vessel.temperature_c(),
        baseline_final_c = baseline.temperature_c(),
        "scenario finished"
    );

    Ok(traj)
}
