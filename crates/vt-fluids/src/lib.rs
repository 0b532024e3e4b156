//! vt-fluids: liquid property lookup for vesseltherm.
//!
//! Provides:
//! - `PropertyModel` trait: `properties(T, p) -> {cp, rho, k, mu}`
//! - CoolProp backend for real fluid properties
//! - Closed-form liquid water correlations (no native backend required)
//! - Reference-fluid fallback used when a lookup fails
//!
//! # Architecture
//!
//! The vessel model only needs four transport properties at the current bulk
//! temperature. This crate isolates it from backend dependencies behind
//! `PropertyModel`. Backends are allowed to fail (out-of-domain temperature,
//! backend errors); callers that must keep integrating go through
//! [`lookup_or_fallback`], which never fails.
//!
//! # Example
//!
//! ```no_run
//! use vt_fluids::{CoolPropModel, PropertyModel};
//! use vt_core::units::{constants::atm, degc};
//!
//! let model = CoolPropModel::water();
//! let props = model.properties(degc(20.0), atm()).unwrap();
//! println!("cp = {} J/(kg·K)", props.cp.value);
//! ```

pub mod coolprop;
pub mod correlation;
pub mod error;
pub mod fallback;
pub mod model;

// Re-exports for ergonomics
pub use coolprop::CoolPropModel;
pub use correlation::WaterCorrelation;
pub use error::{FluidError, FluidResult};
pub use fallback::{PropertyLookup, PropertySource, lookup_or_fallback};
pub use model::{ConstantModel, PropertyModel, TransportProperties};
