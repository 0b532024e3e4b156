//! Closed-form property correlations for liquid water.
//!
//! Used when the CoolProp backend is not wanted (tests, quick runs) or as a
//! second opinion next to it. The fits cover liquid water at atmospheric
//! pressure between the melting and boiling points:
//!
//! - density: Thiesen–Scheel–Diesselhorst
//! - specific heat: fourth-order least-squares polynomial in °C
//! - conductivity: quadratic in reduced temperature `T / 298.15 K`
//! - viscosity: Vogel equation `mu = A · 10^(B / (T − C))`
//!
//! Pressure dependence is neglected (incompressible liquid); the pressure
//! argument is only validated.

use crate::error::{FluidError, FluidResult};
use crate::model::{PropertyModel, TransportProperties, validation};
use vt_core::units::constants::ZERO_CELSIUS_K;
use vt_core::units::{Pressure, Temperature, to_celsius};

/// Liquid water correlations valid strictly between 0 °C and 100 °C.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterCorrelation;

impl WaterCorrelation {
    /// Lower bound of the validity domain [K] (exclusive).
    pub const T_MIN_K: f64 = ZERO_CELSIUS_K;
    /// Upper bound of the validity domain [K] (exclusive).
    pub const T_MAX_K: f64 = ZERO_CELSIUS_K + 100.0;

    pub fn new() -> Self {
        Self
    }

    /// Density [kg/m³] at `t_c` °C.
    pub fn density(t_c: f64) -> f64 {
        1000.0
            * (1.0
                - (t_c + 288.9414) / (508_929.2 * (t_c + 68.129_63)) * (t_c - 3.9863).powi(2))
    }

    /// Specific heat capacity [J/(kg·K)] at `t_c` °C.
    pub fn specific_heat(t_c: f64) -> f64 {
        4219.487 - 2.968_921 * t_c + 7.432_136e-2 * t_c.powi(2) - 7.527_987e-4 * t_c.powi(3)
            + 3.034_376e-6 * t_c.powi(4)
    }

    /// Thermal conductivity [W/(m·K)] at `t_k` kelvin.
    pub fn conductivity(t_k: f64) -> f64 {
        let tr = t_k / 298.15;
        0.6065 * (-1.484_45 + 4.122_92 * tr - 1.638_66 * tr * tr)
    }

    /// Dynamic viscosity [Pa·s] at `t_k` kelvin.
    pub fn viscosity(t_k: f64) -> f64 {
        2.414e-5 * 10f64.powf(247.8 / (t_k - 140.0))
    }
}

impl PropertyModel for WaterCorrelation {
    fn name(&self) -> &str {
        "WaterCorrelation"
    }

    fn properties(&self, t: Temperature, p: Pressure) -> FluidResult<TransportProperties> {
        validation::validate_pressure(p)?;
        validation::validate_temperature(t)?;

        let t_k = t.value;
        if t_k <= Self::T_MIN_K || t_k >= Self::T_MAX_K {
            return Err(FluidError::OutOfRange {
                what: "liquid water correlation temperature",
                value: t_k,
            });
        }
        let t_c = to_celsius(t);

        let props = TransportProperties::from_si(
            Self::specific_heat(t_c),
            Self::density(t_c),
            Self::conductivity(t_k),
            Self::viscosity(t_k),
        );
        validation::validate_properties(&props)?;
        Ok(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vt_core::units::{constants::atm, degc, pa};

    #[test]
    fn room_temperature_matches_reference_water() {
        let props = WaterCorrelation.properties(degc(20.0), atm()).unwrap();
        // Reference values at 20 °C: 998.2 kg/m³, 4184 J/(kg·K), 0.598 W/(m·K), 1.002 mPa·s
        assert!((props.rho.value - 998.2).abs() < 0.5, "{}", props.summary());
        assert!((props.cp.value - 4184.0).abs() < 5.0, "{}", props.summary());
        assert!((props.k.value - 0.598).abs() < 0.005, "{}", props.summary());
        assert!((props.mu.value - 1.002e-3).abs() < 2e-5, "{}", props.summary());
    }

    #[test]
    fn density_peaks_near_four_celsius() {
        let at_4 = WaterCorrelation::density(4.0);
        assert!(at_4 > WaterCorrelation::density(1.0));
        assert!(at_4 > WaterCorrelation::density(10.0));
        assert!((at_4 - 1000.0).abs() < 0.1);
    }

    #[test]
    fn viscosity_falls_with_temperature() {
        let cold = WaterCorrelation::viscosity(283.15);
        let warm = WaterCorrelation::viscosity(333.15);
        assert!(cold > 2.0 * warm);
    }

    #[test]
    fn rejects_temperatures_outside_liquid_range() {
        let model = WaterCorrelation::new();
        assert!(matches!(
            model.properties(degc(0.0), atm()),
            Err(FluidError::OutOfRange { .. })
        ));
        assert!(matches!(
            model.properties(degc(100.0), atm()),
            Err(FluidError::OutOfRange { .. })
        ));
        assert!(model.properties(degc(99.0), atm()).is_ok());
    }

    #[test]
    fn rejects_non_physical_pressure() {
        assert!(WaterCorrelation.properties(degc(20.0), pa(-1.0)).is_err());
    }
}
