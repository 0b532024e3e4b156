//! vt-vessel: lumped thermal model of a stirred, jacketless vessel.
//!
//! One well-mixed liquid volume exchanges heat with ambient air through a
//! series network of internal film, wall conduction and external film. The
//! internal film coefficient follows the impeller Reynolds number; the
//! external one is natural convection. Power is integrated with forward
//! Euler at a caller-chosen step.

pub mod config;
pub mod convection;
pub mod error;
pub mod geometry;
pub mod material;
pub mod process;

pub use config::{TemperatureRange, VesselConfig};
pub use convection::{
    ExternalConvection, FlowRegime, InternalConvection, NusseltCorrelation, PowerLaw,
};
pub use error::{VesselError, VesselResult};
pub use geometry::{ReferenceArea, VesselGeometry};
pub use material::{DEFAULT_WALL_CONDUCTIVITY, WallMaterial, wall_conductivity};
pub use process::{StepReport, ThermalProcess};
