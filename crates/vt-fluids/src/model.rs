//! Property model trait and validation helpers.

use crate::error::{FluidError, FluidResult};
use vt_core::units::{
    Density, DynVisc, Pressure, SpecificHeat, Temperature, ThermalConductivity, jpkgk, kgpm3,
    pas, wpmk,
};

/// Transport and caloric properties of the vessel medium at one state.
///
/// These four values are everything the lumped vessel model needs: `cp` and
/// `rho` for the thermal mass, `k` and `mu` for the dimensionless numbers of
/// the convection correlations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransportProperties {
    /// Specific heat capacity at constant pressure [J/(kg·K)]
    pub cp: SpecificHeat,

    /// Density [kg/m³]
    pub rho: Density,

    /// Thermal conductivity [W/(m·K)]
    pub k: ThermalConductivity,

    /// Dynamic viscosity [Pa·s]
    pub mu: DynVisc,
}

impl TransportProperties {
    /// Build from raw SI values.
    pub fn from_si(cp_j_kgk: f64, rho_kg_m3: f64, k_w_mk: f64, mu_pa_s: f64) -> Self {
        Self {
            cp: jpkgk(cp_j_kgk),
            rho: kgpm3(rho_kg_m3),
            k: wpmk(k_w_mk),
            mu: pas(mu_pa_s),
        }
    }

    /// Liquid water near room temperature at 1 atm.
    ///
    /// This is the substitute used whenever a property lookup fails.
    pub fn water_reference() -> Self {
        Self::from_si(4186.0, 997.0, 0.606, 0.001_002)
    }

    /// Prandtl number `cp · mu / k`.
    pub fn prandtl(&self) -> f64 {
        self.cp.value * self.mu.value / self.k.value
    }

    /// Return a summary string of all contained properties (for debugging).
    pub fn summary(&self) -> String {
        format!(
            "Props(cp={:.1}J/kg·K,ρ={:.2}kg/m³,k={:.4}W/m·K,μ={:.3e}Pa·s)",
            self.cp.value, self.rho.value, self.k.value, self.mu.value
        )
    }
}

/// Trait for fluid property models.
///
/// Implementations must be thread-safe (Send + Sync) so a vessel holding a
/// boxed model stays `Send`. Lookups may fail outside the model's validity
/// domain; they must never return non-physical values as `Ok`.
pub trait PropertyModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Evaluate the medium at temperature `t` and pressure `p`.
    fn properties(&self, t: Temperature, p: Pressure) -> FluidResult<TransportProperties>;
}

/// Temperature-independent properties.
///
/// Useful for isolating the vessel dynamics from property variation, and as
/// a stand-in when no backend is available.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantModel {
    pub props: TransportProperties,
}

impl ConstantModel {
    pub fn new(props: TransportProperties) -> FluidResult<Self> {
        validation::validate_properties(&props)?;
        Ok(Self { props })
    }
}

impl PropertyModel for ConstantModel {
    fn name(&self) -> &str {
        "Constant"
    }

    fn properties(&self, t: Temperature, p: Pressure) -> FluidResult<TransportProperties> {
        validation::validate_temperature(t)?;
        validation::validate_pressure(p)?;
        Ok(self.props)
    }
}

/// Validation helpers for fluid properties.
pub(crate) mod validation {
    use super::*;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> FluidResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> FluidResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    fn positive_finite(v: f64, what: &'static str) -> FluidResult<()> {
        if !v.is_finite() || v <= 0.0 {
            return Err(FluidError::NonPhysical { what });
        }
        Ok(())
    }

    /// Ensure every property is positive and finite.
    pub fn validate_properties(props: &TransportProperties) -> FluidResult<()> {
        positive_finite(props.cp.value, "cp must be positive and finite")?;
        positive_finite(props.rho.value, "density must be positive and finite")?;
        positive_finite(props.k.value, "conductivity must be positive and finite")?;
        positive_finite(props.mu.value, "viscosity must be positive and finite")?;
        Ok(())
    }
}
