//! Vessel configuration.

use crate::convection::{ExternalConvection, NusseltCorrelation};
use crate::error::{VesselError, VesselResult};
use crate::geometry::ReferenceArea;
use serde::{Deserialize, Serialize};
use vt_core::numeric::{ensure_finite, ensure_non_negative, ensure_positive};
use vt_core::units::constants::{ABSOLUTE_ZERO_C, ATM_PA};

/// Closed interval the liquid temperature is held in [°C].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min_c: f64,
    pub max_c: f64,
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self {
            min_c: 4.0,
            max_c: 100.0,
        }
    }
}

impl TemperatureRange {
    pub fn clamp(&self, t_c: f64) -> f64 {
        vt_core::numeric::clamp_finite(t_c, self.min_c, self.max_c)
    }

    pub fn contains(&self, t_c: f64) -> bool {
        (self.min_c..=self.max_c).contains(&t_c)
    }
}

/// Everything needed to build a [`ThermalProcess`](crate::ThermalProcess).
///
/// Field names carry their units; every field has a default so partial
/// YAML documents deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    /// Internal liquid volume [L]
    pub volume_l: f64,
    /// Initial liquid temperature [°C]
    pub start_temp_c: f64,
    /// Surrounding air temperature [°C]
    pub ambient_temp_c: f64,
    pub impeller_speed_rpm: f64,
    /// Looked up in the wall material table; unknown names get the default conductivity.
    pub wall_material: String,
    pub wall_thickness_mm: f64,
    /// Internal height over internal radius.
    pub aspect_ratio: f64,
    /// Impeller diameter over internal diameter.
    pub impeller_ratio: f64,
    /// Largest heating power the actuator delivers [W], >= 0
    pub max_heating_w: f64,
    /// Largest cooling power as a negative number [W], <= 0
    pub max_cooling_w: f64,
    pub temp_range_c: TemperatureRange,
    /// Pressure the liquid properties are evaluated at [Pa]
    pub pressure_pa: f64,
    pub wall_reference_area: ReferenceArea,
    pub internal_convection: NusseltCorrelation,
    pub external_convection: ExternalConvection,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            volume_l: 10.0,
            start_temp_c: 20.0,
            ambient_temp_c: 20.0,
            impeller_speed_rpm: 100.0,
            wall_material: "steel".to_string(),
            wall_thickness_mm: 5.0,
            aspect_ratio: 2.0,
            impeller_ratio: 1.0 / 3.0,
            max_heating_w: 5000.0,
            max_cooling_w: -2000.0,
            temp_range_c: TemperatureRange::default(),
            pressure_pa: ATM_PA,
            wall_reference_area: ReferenceArea::default(),
            internal_convection: NusseltCorrelation::default(),
            external_convection: ExternalConvection::default(),
        }
    }
}

impl VesselConfig {
    pub fn volume_m3(&self) -> f64 {
        self.volume_l * 1.0e-3
    }

    pub fn wall_thickness_m(&self) -> f64 {
        self.wall_thickness_mm * 1.0e-3
    }

    pub fn impeller_speed_rps(&self) -> f64 {
        self.impeller_speed_rpm / 60.0
    }

    pub fn validate(&self) -> VesselResult<()> {
        ensure_positive(self.volume_l, "volume_l")?;
        ensure_positive(self.wall_thickness_mm, "wall_thickness_mm")?;
        ensure_non_negative(self.impeller_speed_rpm, "impeller_speed_rpm")?;
        ensure_positive(self.aspect_ratio, "aspect_ratio")?;
        let ratio = ensure_positive(self.impeller_ratio, "impeller_ratio")?;
        if ratio > 1.0 {
            return Err(VesselError::OutOfRange {
                what: "impeller_ratio must be in (0, 1]",
                value: ratio,
            });
        }

        check_temperature(self.start_temp_c, "start_temp_c")?;
        check_temperature(self.ambient_temp_c, "ambient_temp_c")?;
        check_temperature(self.temp_range_c.min_c, "temp_range_c.min_c")?;
        check_temperature(self.temp_range_c.max_c, "temp_range_c.max_c")?;
        if self.temp_range_c.min_c >= self.temp_range_c.max_c {
            return Err(VesselError::InvalidArg {
                what: "temp_range_c must satisfy min_c < max_c",
            });
        }

        ensure_non_negative(self.max_heating_w, "max_heating_w")?;
        let cooling = ensure_finite(self.max_cooling_w, "max_cooling_w")?;
        if cooling > 0.0 {
            return Err(VesselError::OutOfRange {
                what: "max_cooling_w must be zero or negative",
                value: cooling,
            });
        }

        ensure_positive(self.pressure_pa, "pressure_pa")?;
        self.internal_convection.validate()?;
        self.external_convection.validate()?;
        Ok(())
    }
}

fn check_temperature(t_c: f64, what: &'static str) -> VesselResult<()> {
    let t_c = ensure_finite(t_c, what)?;
    if t_c < ABSOLUTE_ZERO_C {
        return Err(VesselError::OutOfRange { what, value: t_c });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = VesselConfig::default();
        assert!(cfg.validate().is_ok());
        assert!((cfg.volume_m3() - 0.010).abs() < 1e-15);
        assert!((cfg.impeller_speed_rps() - 100.0 / 60.0).abs() < 1e-15);
    }

    #[test]
    fn rejects_each_invalid_field() {
        let cases: [fn(&mut VesselConfig); 11] = [
            |c| c.volume_l = 0.0,
            |c| c.wall_thickness_mm = -1.0,
            |c| c.impeller_speed_rpm = -10.0,
            |c| c.aspect_ratio = 0.0,
            |c| c.impeller_ratio = 1.2,
            |c| c.start_temp_c = -300.0,
            |c| c.ambient_temp_c = f64::NAN,
            |c| c.max_heating_w = -1.0,
            |c| c.max_cooling_w = 10.0,
            |c| {
                c.temp_range_c = TemperatureRange {
                    min_c: 50.0,
                    max_c: 50.0,
                }
            },
            |c| c.pressure_pa = 0.0,
        ];
        for (i, mutate) in cases.into_iter().enumerate() {
            let mut cfg = VesselConfig::default();
            mutate(&mut cfg);
            assert!(cfg.validate().is_err(), "case {i} should be rejected");
        }
    }

    #[test]
    fn zero_speed_is_allowed() {
        let cfg = VesselConfig {
            impeller_speed_rpm: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: VesselConfig = serde_yaml::from_str(
            "volume_l: 25\nwall_material: Glass\nwall_reference_area: internal\n",
        )
        .unwrap();
        assert_eq!(cfg.volume_l, 25.0);
        assert_eq!(cfg.wall_material, "Glass");
        assert_eq!(cfg.wall_reference_area, ReferenceArea::Internal);
        assert_eq!(cfg.max_heating_w, 5000.0);
        assert_eq!(cfg.internal_convection, NusseltCorrelation::default());
    }

    #[test]
    fn range_clamp_maps_nan_to_min() {
        let r = TemperatureRange::default();
        assert_eq!(r.clamp(f64::NAN), 4.0);
        assert_eq!(r.clamp(150.0), 100.0);
        assert!(r.contains(37.0));
    }
}
