//! Cylindrical vessel geometry derived from volume and aspect ratio.

use crate::error::{VesselError, VesselResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use vt_core::numeric::ensure_positive;

/// Which surface the wall conduction resistance is referred to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceArea {
    Internal,
    External,
    /// Arithmetic mean of internal and external area.
    #[default]
    Mean,
}

/// Fixed dimensions of a closed cylinder with a wall of uniform thickness.
///
/// All lengths in m, areas in m², volume in m³. Areas include both end caps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VesselGeometry {
    pub volume_m3: f64,
    pub internal_radius_m: f64,
    pub internal_height_m: f64,
    pub internal_area_m2: f64,
    pub external_radius_m: f64,
    pub external_height_m: f64,
    pub external_area_m2: f64,
    pub wall_thickness_m: f64,
    pub impeller_diameter_m: f64,
}

impl VesselGeometry {
    /// Size a cylinder holding `volume_m3` with `height = aspect_ratio · radius`.
    ///
    /// The wall adds `wall_thickness_m` to the radius and to each end. The
    /// impeller spans `impeller_ratio` of the internal diameter.
    pub fn new(
        volume_m3: f64,
        aspect_ratio: f64,
        wall_thickness_m: f64,
        impeller_ratio: f64,
    ) -> VesselResult<Self> {
        ensure_positive(volume_m3, "volume_m3")?;
        ensure_positive(aspect_ratio, "aspect_ratio")?;
        ensure_positive(wall_thickness_m, "wall_thickness_m")?;
        ensure_positive(impeller_ratio, "impeller_ratio")?;
        if impeller_ratio > 1.0 {
            return Err(VesselError::OutOfRange {
                what: "impeller_ratio must be in (0, 1]",
                value: impeller_ratio,
            });
        }

        let r = (volume_m3 / (PI * aspect_ratio)).cbrt();
        let h = aspect_ratio * r;
        let r_ext = r + wall_thickness_m;
        let h_ext = h + 2.0 * wall_thickness_m;

        Ok(Self {
            volume_m3,
            internal_radius_m: r,
            internal_height_m: h,
            internal_area_m2: cylinder_area(r, h),
            external_radius_m: r_ext,
            external_height_m: h_ext,
            external_area_m2: cylinder_area(r_ext, h_ext),
            wall_thickness_m,
            impeller_diameter_m: impeller_ratio * 2.0 * r,
        })
    }

    /// Area the wall conduction resistance is evaluated on.
    pub fn wall_area_m2(&self, reference: ReferenceArea) -> f64 {
        match reference {
            ReferenceArea::Internal => self.internal_area_m2,
            ReferenceArea::External => self.external_area_m2,
            ReferenceArea::Mean => 0.5 * (self.internal_area_m2 + self.external_area_m2),
        }
    }
}

/// Total surface of a closed cylinder: two caps plus the mantle.
fn cylinder_area(r: f64, h: f64) -> f64 {
    2.0 * PI * r * r + 2.0 * PI * r * h
}
