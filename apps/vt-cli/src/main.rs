use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use vt_sim::{
    LoopMetrics, PropertyBackend, ScenarioConfig, SimError, SimResult, Trajectory,
    compute_loop_metrics, load_scenario, run_scenario,
};
use vt_vessel::{
    DEFAULT_WALL_CONDUCTIVITY, InternalConvection, ThermalProcess, VesselConfig, VesselGeometry,
    WallMaterial,
};

#[derive(Parser)]
#[command(name = "vt-cli")]
#[command(about = "Vessel temperature control simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a closed-loop scenario against an unpowered baseline
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Print a sample every N ticks
        #[arg(long, default_value_t = 60)]
        every: usize,
        /// Print scenario, metrics and full trajectory as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Show derived geometry and the heat-transfer state at the start temperature
    Vessel {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the wall material table
    Materials,
}

/// Scenario source: an optional YAML file with command-line overrides on top.
#[derive(Args)]
struct ScenarioArgs {
    /// Path to a scenario YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Setpoint in °C
    #[arg(long)]
    setpoint: Option<f64>,
    /// Simulated duration in seconds
    #[arg(long)]
    duration: Option<f64>,
    /// Time step in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// Liquid volume in litres
    #[arg(long)]
    volume: Option<f64>,
    /// Start temperature in °C
    #[arg(long)]
    start: Option<f64>,
    /// Ambient temperature in °C
    #[arg(long)]
    ambient: Option<f64>,
    /// Impeller speed in rpm
    #[arg(long)]
    rpm: Option<f64>,
    /// Wall material name
    #[arg(long)]
    material: Option<String>,
    /// Wall thickness in mm
    #[arg(long)]
    wall_mm: Option<f64>,
    #[arg(long)]
    kp: Option<f64>,
    #[arg(long)]
    ki: Option<f64>,
    #[arg(long)]
    kd: Option<f64>,
    /// Add the vessel heat loss as feed-forward
    #[arg(long)]
    feedforward: bool,
    /// Property backend: correlation, coolprop or constant
    #[arg(long)]
    backend: Option<PropertyBackend>,
}

impl ScenarioArgs {
    fn resolve(&self) -> SimResult<ScenarioConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_scenario(path)?,
            None => ScenarioConfig::default(),
        };

        let v = &mut cfg.vessel;
        override_with(&mut v.volume_l, self.volume);
        override_with(&mut v.start_temp_c, self.start);
        override_with(&mut v.ambient_temp_c, self.ambient);
        override_with(&mut v.impeller_speed_rpm, self.rpm);
        override_with(&mut v.wall_thickness_mm, self.wall_mm);
        if let Some(material) = &self.material {
            v.wall_material = material.clone();
        }

        let c = &mut cfg.controller;
        override_with(&mut c.kp, self.kp);
        override_with(&mut c.ki, self.ki);
        override_with(&mut c.kd, self.kd);

        override_with(&mut cfg.setpoint_c, self.setpoint);
        override_with(&mut cfg.duration_s, self.duration);
        override_with(&mut cfg.dt_s, self.dt);
        if let Some(backend) = self.backend {
            cfg.properties = backend;
        }
        cfg.feedforward |= self.feedforward;

        cfg.validate()?;
        Ok(cfg)
    }
}

fn override_with(slot: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn main() -> SimResult<()> {
    // Initialize tracing; stdout is reserved for results
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            every,
            json,
        } => cmd_run(&scenario.resolve()?, every, json),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Vessel { scenario, json } => cmd_vessel(&scenario.resolve()?, json),
        Commands::Materials => {
            cmd_materials();
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct RunOutput<'a> {
    scenario: &'a ScenarioConfig,
    metrics: &'a LoopMetrics,
    trajectory: &'a Trajectory,
}

fn cmd_run(cfg: &ScenarioConfig, every: usize, json: bool) -> SimResult<()> {
    let traj = run_scenario(cfg)?;
    let metrics = compute_loop_metrics(&traj, cfg.settling_band_c)?;

    if json {
        let output = RunOutput {
            scenario: cfg,
            metrics: &metrics,
            trajectory: &traj,
        };
        println!("{}", to_json(&output)?);
        return Ok(());
    }

    println!(
        "Scenario '{}': setpoint {:.1} °C, {} ticks of {} s ({})",
        cfg.name,
        cfg.setpoint_c,
        traj.len(),
        cfg.dt_s,
        cfg.properties
    );
    println!();
    println!(
        "{:>9}  {:>11}  {:>11}  {:>9}  {:>9}",
        "t [min]", "T_pid [°C]", "T_base [°C]", "P [W]", "Q [W]"
    );
    let every = every.max(1);
    for i in (0..traj.len()).filter(|&i| (i + 1) % every == 0 || i + 1 == traj.len()) {
        println!(
            "{:>9.1}  {:>11.2}  {:>11.2}  {:>9.0}  {:>9.1}",
            traj.time_s[i] / 60.0,
            traj.controlled_c[i],
            traj.baseline_c[i],
            traj.power_w[i],
            traj.heat_loss_w[i]
        );
    }
    println!();
    print_metrics(&metrics);
    if traj.fallback_ticks > 0 {
        println!(
            "  note: fallback properties used in {} of {} ticks",
            traj.fallback_ticks,
            traj.len()
        );
    }
    Ok(())
}

fn print_metrics(m: &LoopMetrics) {
    let fmt = |v: Option<f64>, unit: &str| match v {
        Some(x) => format!("{:.2} {}", x, unit),
        None => "not reached".to_string(),
    };
    println!("Loop metrics:");
    println!("  Final temperature:      {}", fmt(m.final_temp_c, "°C"));
    println!("  Baseline final:         {}", fmt(m.baseline_final_c, "°C"));
    println!("  Steady-state error:     {}", fmt(m.steady_state_error_c, "K"));
    println!("  Overshoot:              {}", fmt(m.overshoot_c, "K"));
    let minutes = |s: Option<f64>| s.map(|s| s / 60.0);
    println!("  Rise time (90%):        {}", fmt(minutes(m.rise_time_s), "min"));
    println!("  Settling time:          {}", fmt(minutes(m.settling_time_s), "min"));
    println!("  Mean abs deviation:     {}", fmt(m.mean_abs_deviation_c, "K"));
    println!("  Standard deviation:     {}", fmt(m.std_dev_c, "K"));
    println!("  Max power:              {}", fmt(m.max_power_w, "W"));
    println!("  Heating energy:         {:.1} kJ", m.heating_energy_kj);
    println!("  Cooling energy:         {:.1} kJ", m.cooling_energy_kj);
    println!("  Saturated:              {:.1} %", m.saturation_pct);
}

fn cmd_validate(path: &Path) -> SimResult<()> {
    println!("Validating scenario: {}", path.display());
    let cfg = load_scenario(path)?;
    info!(scenario = %cfg.name, "scenario loaded");
    println!(
        "✓ Scenario '{}' is valid ({} ticks of {} s)",
        cfg.name,
        cfg.ticks(),
        cfg.dt_s
    );
    Ok(())
}

#[derive(Serialize)]
struct VesselOutput<'a> {
    config: &'a VesselConfig,
    model: &'a str,
    geometry: &'a VesselGeometry,
    wall_conductivity_w_mk: f64,
    temperature_c: f64,
    internal: InternalConvection,
    h_external_w_m2k: f64,
    heat_loss_w: f64,
    thermal_mass_j_per_k: f64,
    fallback: bool,
}

fn cmd_vessel(cfg: &ScenarioConfig, json: bool) -> SimResult<()> {
    let vessel = ThermalProcess::new(cfg.vessel.clone(), cfg.properties.build()?)?;
    let output = VesselOutput {
        config: vessel.config(),
        model: vessel.model_name(),
        geometry: vessel.geometry(),
        wall_conductivity_w_mk: vessel.wall_conductivity(),
        temperature_c: vessel.temperature_c(),
        internal: vessel.internal_convection(),
        h_external_w_m2k: vessel.heat_transfer_coefficient_external(),
        heat_loss_w: vessel.heat_loss(),
        thermal_mass_j_per_k: vessel.thermal_mass_j_per_k(),
        fallback: vessel.property_source() == vt_fluids::PropertySource::Fallback,
    };

    if json {
        println!("{}", to_json(&output)?);
        return Ok(());
    }

    let g = output.geometry;
    println!(
        "Vessel ({} L, {} wall)",
        cfg.vessel.volume_l, cfg.vessel.wall_material
    );
    println!("  Internal radius:        {:.4} m", g.internal_radius_m);
    println!("  Internal height:        {:.4} m", g.internal_height_m);
    println!("  Internal area:          {:.4} m²", g.internal_area_m2);
    println!("  External radius:        {:.4} m", g.external_radius_m);
    println!("  External height:        {:.4} m", g.external_height_m);
    println!("  External area:          {:.4} m²", g.external_area_m2);
    println!("  Impeller diameter:      {:.4} m", g.impeller_diameter_m);
    println!(
        "  Wall conductivity:      {:.1} W/(m·K)",
        output.wall_conductivity_w_mk
    );
    let source = if output.fallback { ", fallback" } else { "" };
    println!(
        "At {:.2} °C ({}{}):",
        output.temperature_c, output.model, source
    );
    println!("  {}", vessel.properties().summary());
    let ic = &output.internal;
    println!(
        "  Re = {:.0}, Pr = {:.2}, Nu = {:.1} ({})",
        ic.reynolds, ic.prandtl, ic.nusselt, ic.regime
    );
    println!("  h_internal:             {:.1} W/(m²·K)", output.internal.h_w_m2k);
    println!("  h_external:             {:.2} W/(m²·K)", output.h_external_w_m2k);
    println!("  Heat loss:              {:.2} W", output.heat_loss_w);
    println!("  Thermal mass:           {:.0} J/K", output.thermal_mass_j_per_k);
    Ok(())
}

fn cmd_materials() {
    println!("Wall materials:");
    for material in WallMaterial::ALL {
        println!(
            "  {:<16} {:>7.1} W/(m·K)",
            material.key(),
            material.conductivity()
        );
    }
    println!("  aluminum is accepted for aluminium");
    println!("  unknown names use {DEFAULT_WALL_CONDUCTIVITY:.1} W/(m·K)");
}

fn to_json<T: Serialize>(value: &T) -> SimResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| SimError::Backend {
        message: format!("JSON serialization failed: {}", e),
    })
}
