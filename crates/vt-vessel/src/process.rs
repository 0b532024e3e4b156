//! The stirred-vessel thermal process.

use crate::config::VesselConfig;
use crate::convection::{FlowRegime, InternalConvection};
use crate::error::{VesselError, VesselResult};
use crate::geometry::VesselGeometry;
use crate::material::{WallMaterial, wall_conductivity};
use serde::Serialize;
use tracing::{debug, warn};
use vt_core::numeric::ensure_positive;
use vt_core::units::{degc, pa};
use vt_fluids::{
    PropertyModel, PropertySource, TransportProperties, WaterCorrelation, lookup_or_fallback,
};

/// Temperature differences below this give exactly zero heat loss [K].
const LOSS_DEADBAND_K: f64 = 0.01;

/// What happened during one [`ThermalProcess::step`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StepReport {
    /// Liquid temperature after the step [°C]
    pub temperature_c: f64,
    /// Power actually applied after actuator clamping [W]
    pub power_w: f64,
    /// Heat lost to ambient at the start of the step [W]
    pub heat_loss_w: f64,
    pub h_internal_w_m2k: f64,
    pub h_external_w_m2k: f64,
    pub regime: FlowRegime,
    /// Properties for this step came from the fallback set.
    pub used_fallback: bool,
}

/// Lumped model of a stirred liquid vessel losing heat to ambient air.
///
/// Geometry and wall material are fixed at construction. The liquid
/// temperature is the only state; it changes through [`apply_power`] /
/// [`step`] and [`reset_temperature`], and always stays inside the
/// configured practical range. Liquid properties follow the temperature
/// and are never allowed to fail: a rejected lookup substitutes the
/// reference water set.
///
/// [`apply_power`]: ThermalProcess::apply_power
/// [`step`]: ThermalProcess::step
/// [`reset_temperature`]: ThermalProcess::reset_temperature
pub struct ThermalProcess {
    config: VesselConfig,
    geometry: VesselGeometry,
    wall_conductivity: f64,
    model: Box<dyn PropertyModel>,
    fallback: TransportProperties,
    props: TransportProperties,
    source: PropertySource,
    temperature_c: f64,
}

impl ThermalProcess {
    /// Build a vessel evaluating liquid properties with `model`.
    pub fn new(config: VesselConfig, model: Box<dyn PropertyModel>) -> VesselResult<Self> {
        config.validate()?;
        let geometry = VesselGeometry::new(
            config.volume_m3(),
            config.aspect_ratio,
            config.wall_thickness_m(),
            config.impeller_ratio,
        )?;

        if config.wall_material.parse::<WallMaterial>().is_err() {
            warn!(
                material = %config.wall_material,
                "unknown wall material; using default conductivity"
            );
        }
        let wall_conductivity = wall_conductivity(&config.wall_material);

        let fallback = TransportProperties::water_reference();
        let temperature_c = config.temp_range_c.clamp(config.start_temp_c);

        debug!(
            model = model.name(),
            volume_m3 = geometry.volume_m3,
            radius_m = geometry.internal_radius_m,
            height_m = geometry.internal_height_m,
            impeller_m = geometry.impeller_diameter_m,
            wall_conductivity,
            "vessel constructed"
        );

        let mut process = Self {
            config,
            geometry,
            wall_conductivity,
            model,
            fallback,
            props: fallback,
            source: PropertySource::Model,
            temperature_c,
        };
        process.refresh_properties();
        Ok(process)
    }

    /// Build a vessel using the closed-form water correlations.
    pub fn with_water_correlation(config: VesselConfig) -> VesselResult<Self> {
        Self::new(config, Box::new(WaterCorrelation))
    }

    /// Re-evaluate liquid properties at the current temperature.
    ///
    /// Returns the source the new properties came from.
    fn refresh_properties(&mut self) -> PropertySource {
        let lookup = lookup_or_fallback(
            self.model.as_ref(),
            degc(self.temperature_c),
            pa(self.config.pressure_pa),
            &self.fallback,
        );

        match (self.source, lookup.source) {
            (PropertySource::Model, PropertySource::Fallback) => warn!(
                model = self.model.name(),
                temperature_c = self.temperature_c,
                error = ?lookup.error,
                "property lookup failed; using fallback properties"
            ),
            (PropertySource::Fallback, PropertySource::Model) => debug!(
                model = self.model.name(),
                temperature_c = self.temperature_c,
                "property lookup recovered"
            ),
            _ => {}
        }

        self.props = lookup.properties;
        self.source = lookup.source;
        lookup.source
    }

    /// Agitated-side film coefficient and the dimensionless numbers behind it.
    pub fn internal_convection(&self) -> InternalConvection {
        self.config.internal_convection.evaluate(
            &self.props,
            self.config.impeller_speed_rps(),
            self.geometry.impeller_diameter_m,
        )
    }

    /// Internal film coefficient [W/(m²·K)].
    pub fn heat_transfer_coefficient_internal(&self) -> f64 {
        self.internal_convection().h_w_m2k
    }

    /// External natural-convection coefficient [W/(m²·K)].
    pub fn heat_transfer_coefficient_external(&self) -> f64 {
        self.config
            .external_convection
            .coefficient(self.temperature_c - self.config.ambient_temp_c)
    }

    /// Heat flowing from the liquid to ambient [W]; negative when ambient is warmer.
    pub fn heat_loss(&self) -> f64 {
        self.heat_loss_with(
            self.heat_transfer_coefficient_internal(),
            self.heat_transfer_coefficient_external(),
        )
    }

    fn heat_loss_with(&self, h_int: f64, h_ext: f64) -> f64 {
        let delta_t = self.temperature_c - self.config.ambient_temp_c;
        if delta_t.abs() < LOSS_DEADBAND_K {
            return 0.0;
        }
        let g = &self.geometry;
        let a_wall = g.wall_area_m2(self.config.wall_reference_area);

        let r_int = 1.0 / (h_int * g.internal_area_m2);
        let r_wall = g.wall_thickness_m / (self.wall_conductivity * a_wall);
        let r_ext = 1.0 / (h_ext * g.external_area_m2);

        delta_t / (r_int + r_wall + r_ext)
    }

    /// Apply `power_w` for `dt_s` seconds and return the new temperature [°C].
    pub fn apply_power(&mut self, power_w: f64, dt_s: f64) -> VesselResult<f64> {
        self.step(power_w, dt_s).map(|report| report.temperature_c)
    }

    /// One forward-Euler step.
    ///
    /// Power is clamped to the actuator limits; properties, coefficients and
    /// heat loss are evaluated at the temperature at the start of the step.
    /// A non-positive `dt_s` or NaN power is rejected without touching state.
    pub fn step(&mut self, power_w: f64, dt_s: f64) -> VesselResult<StepReport> {
        let dt_s = ensure_positive(dt_s, "dt_s")?;
        if power_w.is_nan() {
            return Err(VesselError::InvalidArg {
                what: "power_w must not be NaN",
            });
        }
        let power_w = power_w.clamp(self.config.max_cooling_w, self.config.max_heating_w);

        let source = self.refresh_properties();
        let internal = self.internal_convection();
        let h_ext = self.heat_transfer_coefficient_external();
        let loss_w = self.heat_loss_with(internal.h_w_m2k, h_ext);

        let delta_t = (power_w - loss_w) * dt_s / self.thermal_mass_j_per_k();
        self.temperature_c = self.config.temp_range_c.clamp(self.temperature_c + delta_t);

        // Keep properties in step with the new temperature for observers.
        self.refresh_properties();

        Ok(StepReport {
            temperature_c: self.temperature_c,
            power_w,
            heat_loss_w: loss_w,
            h_internal_w_m2k: internal.h_w_m2k,
            h_external_w_m2k: h_ext,
            regime: internal.regime,
            used_fallback: source == PropertySource::Fallback,
        })
    }

    /// Set the temperature to `value` (or the configured start temperature),
    /// clamped to the practical range, and refresh the liquid properties.
    pub fn reset_temperature(&mut self, value: Option<f64>) -> VesselResult<()> {
        let t_c = value.unwrap_or(self.config.start_temp_c);
        if t_c.is_nan() {
            return Err(VesselError::InvalidArg {
                what: "reset temperature must not be NaN",
            });
        }
        self.temperature_c = self.config.temp_range_c.clamp(t_c);
        self.refresh_properties();
        Ok(())
    }

    /// `rho · V · cp` at the current properties [J/K].
    pub fn thermal_mass_j_per_k(&self) -> f64 {
        self.props.rho.value * self.geometry.volume_m3 * self.props.cp.value
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn ambient_temp_c(&self) -> f64 {
        self.config.ambient_temp_c
    }

    pub fn geometry(&self) -> &VesselGeometry {
        &self.geometry
    }

    /// Wall conductivity [W/(m·K)] resolved from the material name.
    pub fn wall_conductivity(&self) -> f64 {
        self.wall_conductivity
    }

    pub fn properties(&self) -> &TransportProperties {
        &self.props
    }

    pub fn property_source(&self) -> PropertySource {
        self.source
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Actuator limits as `(max_cooling_w, max_heating_w)`.
    pub fn power_limits(&self) -> (f64, f64) {
        (self.config.max_cooling_w, self.config.max_heating_w)
    }

    pub fn config(&self) -> &VesselConfig {
        &self.config
    }
}

impl std::fmt::Debug for ThermalProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermalProcess")
            .field("model", &self.model.name())
            .field("temperature_c", &self.temperature_c)
            .field("ambient_temp_c", &self.config.ambient_temp_c)
            .field("source", &self.source)
            .finish()
    }
}
