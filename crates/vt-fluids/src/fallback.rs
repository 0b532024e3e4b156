//! Fail-closed property lookup.
//!
//! The vessel integrator must keep stepping even when the backend rejects a
//! state (temperatures clamped onto the edge of the liquid range, backend
//! errors). The policy is:
//! 1. Try the configured model.
//! 2. If it fails, substitute the caller's fallback properties.
//! 3. Report which source was used so callers can log transitions.

use crate::error::FluidError;
use crate::model::{PropertyModel, TransportProperties};
use vt_core::units::{Pressure, Temperature};

/// Where a set of properties came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertySource {
    /// Evaluated by the property model.
    Model,
    /// Substituted after the model failed.
    Fallback,
}

/// Outcome of [`lookup_or_fallback`].
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyLookup {
    pub properties: TransportProperties,
    pub source: PropertySource,
    /// The model error that triggered the fallback, if any.
    pub error: Option<FluidError>,
}

impl PropertyLookup {
    pub fn is_fallback(&self) -> bool {
        self.source == PropertySource::Fallback
    }
}

/// Evaluate `model` at (t, p), substituting `fallback` on any failure.
///
/// Never fails.
pub fn lookup_or_fallback(
    model: &dyn PropertyModel,
    t: Temperature,
    p: Pressure,
    fallback: &TransportProperties,
) -> PropertyLookup {
    match model.properties(t, p) {
        Ok(properties) => PropertyLookup {
            properties,
            source: PropertySource::Model,
            error: None,
        },
        Err(err) => PropertyLookup {
            properties: *fallback,
            source: PropertySource::Fallback,
            error: Some(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::WaterCorrelation;
    use crate::error::FluidResult;
    use vt_core::units::{constants::atm, degc};

    struct AlwaysFails;

    impl PropertyModel for AlwaysFails {
        fn name(&self) -> &str {
            "AlwaysFails"
        }

        fn properties(&self, _t: Temperature, _p: Pressure) -> FluidResult<TransportProperties> {
            Err(FluidError::Backend {
                message: "unavailable".into(),
            })
        }
    }

    #[test]
    fn model_result_is_used_when_available() {
        let fallback = TransportProperties::water_reference();
        let lookup = lookup_or_fallback(&WaterCorrelation, degc(37.0), atm(), &fallback);
        assert_eq!(lookup.source, PropertySource::Model);
        assert!(lookup.error.is_none());
        assert_ne!(lookup.properties, fallback);
    }

    #[test]
    fn failure_substitutes_fallback() {
        let fallback = TransportProperties::water_reference();
        let lookup = lookup_or_fallback(&AlwaysFails, degc(37.0), atm(), &fallback);
        assert!(lookup.is_fallback());
        assert_eq!(lookup.properties, fallback);
        assert!(matches!(lookup.error, Some(FluidError::Backend { .. })));
    }

    #[test]
    fn out_of_domain_temperature_falls_back() {
        let fallback = TransportProperties::water_reference();
        let lookup = lookup_or_fallback(&WaterCorrelation, degc(100.0), atm(), &fallback);
        assert!(lookup.is_fallback());
        assert_eq!(lookup.properties.cp.value, 4186.0);
    }
}
