//! Film coefficients on both sides of the vessel wall.
//!
//! Inside, the impeller drives forced convection characterised by the
//! impeller Reynolds number `Re = n · d² · rho / mu` (n in rev/s, d the
//! impeller diameter) and the Prandtl number of the liquid. The Nusselt
//! number is picked from a regime table and `h = Nu · k / d`.
//!
//! Outside, still air gives a weak natural-convection coefficient growing
//! with the fourth root of the wall-to-ambient temperature difference.

use crate::error::{VesselError, VesselResult};
use serde::{Deserialize, Serialize};
use vt_core::numeric::{ensure_finite, ensure_non_negative, ensure_positive};
use vt_fluids::TransportProperties;

/// Which Nusselt correlation produced the internal coefficient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRegime {
    /// Re below the stagnation threshold; conduction-like floor Nu.
    Stagnant,
    Laminar,
    Transitional,
    Turbulent,
    /// No correlation applies (Pr out of range, laminar branch disabled,
    /// non-finite inputs); floor Nu.
    Uncorrelated,
}

impl FlowRegime {
    pub fn label(&self) -> &'static str {
        match self {
            FlowRegime::Stagnant => "stagnant",
            FlowRegime::Laminar => "laminar",
            FlowRegime::Transitional => "transitional",
            FlowRegime::Turbulent => "turbulent",
            FlowRegime::Uncorrelated => "uncorrelated",
        }
    }
}

impl std::fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// `Nu = c · Re^re_exp · Pr^pr_exp`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerLaw {
    pub c: f64,
    pub re_exp: f64,
    pub pr_exp: f64,
}

impl PowerLaw {
    pub const fn new(c: f64, re_exp: f64, pr_exp: f64) -> Self {
        Self { c, re_exp, pr_exp }
    }

    pub fn eval(&self, re: f64, pr: f64) -> f64 {
        self.c * re.powf(self.re_exp) * pr.powf(self.pr_exp)
    }

    fn validate(&self, what: &'static str) -> VesselResult<()> {
        ensure_positive(self.c, what)?;
        ensure_finite(self.re_exp, what)?;
        ensure_finite(self.pr_exp, what)?;
        Ok(())
    }
}

/// Regime table for the agitated-side Nusselt number.
///
/// Regimes are tested in order: stagnant, laminar, transitional, turbulent;
/// anything left over gets the floor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NusseltCorrelation {
    /// Below this Re the liquid is treated as stagnant.
    pub stagnant_re: f64,
    /// Upper Re of the laminar branch and lower (exclusive) Re of the
    /// transitional branch.
    pub laminar_re_max: f64,
    /// Lower Re of the turbulent branch.
    pub turbulent_re_min: f64,
    /// Minimum Pr for any correlation.
    pub pr_min: f64,
    /// Upper (exclusive) Pr of the transitional branch.
    pub transitional_pr_max: f64,
    pub laminar_enabled: bool,
    pub laminar: PowerLaw,
    pub transitional: PowerLaw,
    pub turbulent: PowerLaw,
    /// Nu for stagnant and uncorrelated conditions.
    pub nu_floor: f64,
    /// Lower bound on the resulting coefficient [W/(m²·K)].
    pub h_min: f64,
}

impl Default for NusseltCorrelation {
    fn default() -> Self {
        Self {
            stagnant_re: 10.0,
            laminar_re_max: 4500.0,
            turbulent_re_min: 1.0e4,
            pr_min: 0.6,
            transitional_pr_max: 160.0,
            laminar_enabled: true,
            laminar: PowerLaw::new(0.664, 0.5, 1.0 / 3.0),
            transitional: PowerLaw::new(0.354, 0.714, 0.260),
            turbulent: PowerLaw::new(0.023, 0.8, 0.4),
            nu_floor: 3.66,
            h_min: 150.0,
        }
    }
}

/// Internal film coefficient together with the numbers that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct InternalConvection {
    pub reynolds: f64,
    pub prandtl: f64,
    pub nusselt: f64,
    pub regime: FlowRegime,
    /// Film coefficient [W/(m²·K)]
    pub h_w_m2k: f64,
}

impl NusseltCorrelation {
    pub fn regime(&self, re: f64, pr: f64) -> FlowRegime {
        if !re.is_finite() || !pr.is_finite() {
            return FlowRegime::Uncorrelated;
        }
        if re < self.stagnant_re {
            FlowRegime::Stagnant
        } else if self.laminar_enabled && re <= self.laminar_re_max && pr >= self.pr_min {
            FlowRegime::Laminar
        } else if re > self.laminar_re_max
            && re < self.turbulent_re_min
            && pr > self.pr_min
            && pr < self.transitional_pr_max
        {
            FlowRegime::Transitional
        } else if re >= self.turbulent_re_min && pr >= self.pr_min {
            FlowRegime::Turbulent
        } else {
            FlowRegime::Uncorrelated
        }
    }

    /// Nusselt number and the regime it came from.
    pub fn nusselt(&self, re: f64, pr: f64) -> (f64, FlowRegime) {
        let regime = self.regime(re, pr);
        let nu = match regime {
            FlowRegime::Laminar => self.laminar.eval(re, pr),
            FlowRegime::Transitional => self.transitional.eval(re, pr),
            FlowRegime::Turbulent => self.turbulent.eval(re, pr),
            FlowRegime::Stagnant | FlowRegime::Uncorrelated => self.nu_floor,
        };
        if nu.is_finite() {
            (nu, regime)
        } else {
            (self.nu_floor, FlowRegime::Uncorrelated)
        }
    }

    /// Agitated-side coefficient for liquid `props` stirred at `speed_rps`
    /// by an impeller of `diameter_m`.
    pub fn evaluate(
        &self,
        props: &TransportProperties,
        speed_rps: f64,
        diameter_m: f64,
    ) -> InternalConvection {
        let re = speed_rps * diameter_m * diameter_m * props.rho.value / props.mu.value;
        let pr = props.prandtl();
        let (nu, regime) = self.nusselt(re, pr);

        let h = nu * props.k.value / diameter_m;
        let h = if h.is_finite() { h.max(self.h_min) } else { self.h_min };

        InternalConvection {
            reynolds: re,
            prandtl: pr,
            nusselt: nu,
            regime,
            h_w_m2k: h,
        }
    }

    pub fn validate(&self) -> VesselResult<()> {
        ensure_non_negative(self.stagnant_re, "stagnant_re")?;
        ensure_positive(self.laminar_re_max, "laminar_re_max")?;
        ensure_positive(self.turbulent_re_min, "turbulent_re_min")?;
        if self.stagnant_re > self.laminar_re_max || self.laminar_re_max > self.turbulent_re_min {
            return Err(VesselError::InvalidArg {
                what: "Reynolds thresholds must satisfy stagnant <= laminar max <= turbulent min",
            });
        }
        ensure_non_negative(self.pr_min, "pr_min")?;
        ensure_positive(self.transitional_pr_max, "transitional_pr_max")?;
        self.laminar.validate("laminar correlation")?;
        self.transitional.validate("transitional correlation")?;
        self.turbulent.validate("turbulent correlation")?;
        ensure_positive(self.nu_floor, "nu_floor")?;
        ensure_positive(self.h_min, "h_min")?;
        Ok(())
    }
}

/// Natural convection to ambient air: `h = base + scale · |ΔT|^0.25`, capped at `max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConvection {
    pub base: f64,
    pub scale: f64,
    pub max: f64,
}

impl Default for ExternalConvection {
    fn default() -> Self {
        Self {
            base: 5.0,
            scale: 2.0,
            max: 35.0,
        }
    }
}

impl ExternalConvection {
    /// Coefficient [W/(m²·K)] for a wall-to-ambient difference of `delta_t` K.
    pub fn coefficient(&self, delta_t: f64) -> f64 {
        let h = self.base + self.scale * delta_t.abs().powf(0.25);
        if h.is_finite() { h.min(self.max) } else { self.max }
    }

    pub fn validate(&self) -> VesselResult<()> {
        ensure_positive(self.base, "external base coefficient")?;
        ensure_non_negative(self.scale, "external scale")?;
        ensure_finite(self.max, "external max coefficient")?;
        if self.max < self.base {
            return Err(VesselError::InvalidArg {
                what: "external max coefficient must not be below the base coefficient",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> TransportProperties {
        TransportProperties::water_reference()
    }

    #[test]
    fn regime_table_boundaries() {
        let c = NusseltCorrelation::default();
        assert_eq!(c.regime(5.0, 7.0), FlowRegime::Stagnant);
        assert_eq!(c.regime(10.0, 7.0), FlowRegime::Laminar);
        assert_eq!(c.regime(4500.0, 7.0), FlowRegime::Laminar);
        assert_eq!(c.regime(4500.1, 7.0), FlowRegime::Transitional);
        assert_eq!(c.regime(9999.0, 7.0), FlowRegime::Transitional);
        assert_eq!(c.regime(10_000.0, 7.0), FlowRegime::Turbulent);
        assert_eq!(c.regime(6000.0, 200.0), FlowRegime::Uncorrelated);
        assert_eq!(c.regime(1000.0, 0.3), FlowRegime::Uncorrelated);
        assert_eq!(c.regime(f64::NAN, 7.0), FlowRegime::Uncorrelated);
    }

    #[test]
    fn laminar_and_transitional_values() {
        let c = NusseltCorrelation::default();

        let (nu, regime) = c.nusselt(1000.0, 7.0);
        assert_eq!(regime, FlowRegime::Laminar);
        let expected = 0.664 * 1000f64.sqrt() * 7f64.cbrt();
        assert!((nu - expected).abs() < 1e-9, "laminar Nu = {nu}");

        let (nu, regime) = c.nusselt(6000.0, 7.0);
        assert_eq!(regime, FlowRegime::Transitional);
        let expected = 0.354 * 6000f64.powf(0.714) * 7f64.powf(0.260);
        assert!((nu - expected).abs() < 1e-9, "transitional Nu = {nu}");
    }

    #[test]
    fn disabling_laminar_branch_uses_floor() {
        let c = NusseltCorrelation {
            laminar_enabled: false,
            ..Default::default()
        };
        let (nu, regime) = c.nusselt(1000.0, 7.0);
        assert_eq!(regime, FlowRegime::Uncorrelated);
        assert_eq!(nu, 3.66);
    }

    #[test]
    fn turbulent_coefficient_for_reference_vessel() {
        // 100 rpm, impeller one third of a 10 L (aspect 2) vessel diameter
        let c = NusseltCorrelation::default();
        let ic = c.evaluate(&water(), 100.0 / 60.0, 0.077_836);
        assert_eq!(ic.regime, FlowRegime::Turbulent);
        assert!(ic.reynolds > 1.0e4 && ic.reynolds < 1.02e4, "Re = {}", ic.reynolds);
        assert!(ic.h_w_m2k > 550.0 && ic.h_w_m2k < 700.0, "h = {}", ic.h_w_m2k);
        let expected = ic.nusselt * 0.606 / 0.077_836;
        assert!((ic.h_w_m2k - expected).abs() < 1e-9);
    }

    #[test]
    fn still_liquid_is_held_at_minimum_coefficient() {
        let c = NusseltCorrelation::default();
        let ic = c.evaluate(&water(), 0.0, 0.077_836);
        assert_eq!(ic.regime, FlowRegime::Stagnant);
        assert_eq!(ic.nusselt, 3.66);
        assert_eq!(ic.h_w_m2k, 150.0);
    }

    #[test]
    fn external_coefficient_grows_then_caps() {
        let e = ExternalConvection::default();
        assert_eq!(e.coefficient(0.0), 5.0);
        assert!((e.coefficient(16.0) - 9.0).abs() < 1e-12);
        assert!((e.coefficient(-16.0) - 9.0).abs() < 1e-12);
        assert_eq!(e.coefficient(1.0e9), 35.0);
        assert_eq!(e.coefficient(f64::INFINITY), 35.0);
    }

    #[test]
    fn default_tables_validate() {
        assert!(NusseltCorrelation::default().validate().is_ok());
        assert!(ExternalConvection::default().validate().is_ok());
        let bad = NusseltCorrelation {
            laminar_re_max: 2.0e4,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = ExternalConvection {
            max: 1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
