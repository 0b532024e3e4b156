//! Scenario configuration and YAML loading.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use vt_controls::PidConfig;
use vt_core::numeric::{ensure_finite, ensure_positive};
use vt_fluids::{
    ConstantModel, CoolPropModel, PropertyModel, TransportProperties, WaterCorrelation,
};
use vt_vessel::VesselConfig;

/// Upper bound on the number of ticks a single scenario may request.
pub const MAX_TICKS: usize = 5_000_000;

/// Which property model the vessels evaluate liquid properties with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyBackend {
    /// Closed-form liquid-water fits.
    #[default]
    Correlation,
    /// CoolProp through rfluids.
    Coolprop,
    /// Reference water properties at every temperature.
    Constant,
}

impl PropertyBackend {
    pub fn build(&self) -> SimResult<Box<dyn PropertyModel>> {
        Ok(match self {
            PropertyBackend::Correlation => Box::new(WaterCorrelation),
            PropertyBackend::Coolprop => Box::new(CoolPropModel::water()),
            PropertyBackend::Constant => {
                Box::new(ConstantModel::new(TransportProperties::water_reference())?)
            }
        })
    }
}

impl std::fmt::Display for PropertyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PropertyBackend::Correlation => "correlation",
            PropertyBackend::Coolprop => "coolprop",
            PropertyBackend::Constant => "constant",
        })
    }
}

impl std::str::FromStr for PropertyBackend {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "correlation" | "water" => Ok(PropertyBackend::Correlation),
            "coolprop" => Ok(PropertyBackend::Coolprop),
            "constant" => Ok(PropertyBackend::Constant),
            _ => Err("unknown property backend (expected correlation, coolprop or constant)"),
        }
    }
}

/// One closed-loop run: a vessel, a controller, a setpoint and a horizon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: String,
    /// Target liquid temperature [°C]
    pub setpoint_c: f64,
    /// Simulated horizon [s]
    pub duration_s: f64,
    /// Integration step and controller sample time [s]
    pub dt_s: f64,
    /// Add the controlled vessel's current heat loss as feed-forward.
    pub feedforward: bool,
    /// Half-width of the band used for settling time [K]
    pub settling_band_c: f64,
    pub properties: PropertyBackend,
    pub vessel: VesselConfig,
    /// Gains and output bounds. `dt_s` here is replaced by the scenario `dt_s`.
    pub controller: PidConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            setpoint_c: 37.0,
            duration_s: 3600.0,
            dt_s: 5.0,
            feedforward: false,
            settling_band_c: 1.0,
            properties: PropertyBackend::default(),
            vessel: VesselConfig::default(),
            controller: PidConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> SimResult<Self> {
        let config: ScenarioConfig = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Number of controller/integration ticks, `duration_s / dt_s` rounded.
    pub fn ticks(&self) -> usize {
        (self.duration_s / self.dt_s).round() as usize
    }

    /// Controller configuration sampled at the scenario step.
    pub fn controller_config(&self) -> PidConfig {
        PidConfig {
            dt_s: self.dt_s,
            ..self.controller.clone()
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.setpoint_c, "setpoint_c")?;
        ensure_positive(self.duration_s, "duration_s")?;
        ensure_positive(self.dt_s, "dt_s")?;
        ensure_positive(self.settling_band_c, "settling_band_c")?;

        let ticks = self.duration_s / self.dt_s;
        if ticks.round() < 1.0 {
            return Err(SimError::InvalidArg {
                what: "duration_s must cover at least one dt_s",
            });
        }
        if ticks > MAX_TICKS as f64 {
            return Err(SimError::OutOfRange {
                what: "duration_s / dt_s exceeds the tick limit",
                value: ticks,
            });
        }

        self.vessel.validate()?;
        self.controller_config().validate()?;
        Ok(())
    }
}

/// Read, parse and validate a scenario file.
pub fn load_scenario(path: &Path) -> SimResult<ScenarioConfig> {
    let content = std::fs::read_to_string(path)?;
    ScenarioConfig::from_yaml_str(&content)
}
