//! CoolProp-based property model.

use crate::error::{FluidError, FluidResult};
use crate::model::{PropertyModel, TransportProperties, validation};
use rfluids::prelude::*;
use vt_core::units::{Pressure, Temperature};

/// CoolProp backend for the vessel medium.
///
/// Wraps a single pure substance (water by default). Every lookup builds a
/// fresh `Fluid` at (P, T), so the model itself carries no mutable state.
pub struct CoolPropModel {
    pure: Pure,
}

impl CoolPropModel {
    /// Create a model for an arbitrary pure substance.
    pub fn new(pure: Pure) -> Self {
        Self { pure }
    }

    /// Liquid water, the reference medium.
    pub fn water() -> Self {
        Self::new(Pure::Water)
    }

    /// Create a Fluid instance at given P,T state.
    fn fluid_at_pt(&self, p_pa: f64, t_k: f64) -> FluidResult<Fluid> {
        Fluid::from(self.pure)
            .in_state(FluidInput::pressure(p_pa), FluidInput::temperature(t_k))
            .map_err(|e| FluidError::Backend {
                message: format!("rfluids error at P={} Pa, T={} K: {}", p_pa, t_k, e),
            })
    }
}

impl Default for CoolPropModel {
    fn default() -> Self {
        Self::water()
    }
}

impl PropertyModel for CoolPropModel {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn properties(&self, t: Temperature, p: Pressure) -> FluidResult<TransportProperties> {
        validation::validate_pressure(p)?;
        validation::validate_temperature(t)?;

        let mut fluid = self.fluid_at_pt(p.value, t.value)?;

        let cp = fluid.specific_heat().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting specific heat: {}", e),
        })?;
        let rho = fluid.density().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting density: {}", e),
        })?;
        let k = fluid.conductivity().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting conductivity: {}", e),
        })?;
        let mu = fluid.dynamic_viscosity().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting viscosity: {}", e),
        })?;

        let props = TransportProperties::from_si(cp, rho, k, mu);
        validation::validate_properties(&props)?;
        Ok(props)
    }
}
