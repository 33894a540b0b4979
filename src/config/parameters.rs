//! Operating parameters for carbon computations
//!
//! Defines the recognized scalar parameters, their documented defaults
//! and valid ranges, and the override mechanism used to vary them
//! per computation without touching the baseline set.

use crate::error::{RackCarbonError, Result};
use serde::{Deserialize, Serialize};

/// Default grid emissions factor in kgCO2e/kWh.
///
/// A blended-grid placeholder; real runs replace it with the output of
/// [`crate::model::CarbonIntensityEstimator::average`].
pub const DEFAULT_EMISSIONS_FACTOR: f64 = 0.12;

/// Default Power Usage Effectiveness (total facility / IT power).
pub const DEFAULT_PUE: f64 = 1.2;

/// Default fraction of nameplate power actually drawn per component.
pub const DEFAULT_POWER_FACTOR: f64 = 0.6;

/// Default marginal fan power per watt of server power.
///
/// Real runs replace it with a fitted [`crate::model::FanPowerFit`] slope.
pub const DEFAULT_FAN_SLOPE: f64 = 0.05;

/// Hours in the operational year used to annualize power draw.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Scalar operating parameters for one carbon computation.
///
/// Instances are immutable per computation: overrides are applied with
/// [`ParameterSet::with_overrides`], which returns a new merged set and
/// never mutates the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Grid emissions factor in kgCO2e/kWh (> 0)
    pub emissions_factor: f64,
    /// Power Usage Effectiveness (>= 1)
    pub pue: f64,
    /// Component utilization factor in (0, 1]
    pub power_factor: f64,
    /// Marginal fan power per watt of server power (>= 0)
    pub fan_slope: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            emissions_factor: DEFAULT_EMISSIONS_FACTOR,
            pue: DEFAULT_PUE,
            power_factor: DEFAULT_POWER_FACTOR,
            fan_slope: DEFAULT_FAN_SLOPE,
        }
    }
}

impl ParameterSet {
    /// Produce a new set with the given overrides applied.
    ///
    /// Fields left `None` in the overrides keep their current value.
    pub fn with_overrides(&self, overrides: &ParameterOverrides) -> Self {
        Self {
            emissions_factor: overrides.emissions_factor.unwrap_or(self.emissions_factor),
            pue: overrides.pue.unwrap_or(self.pue),
            power_factor: overrides.power_factor.unwrap_or(self.power_factor),
            fan_slope: overrides.fan_slope.unwrap_or(self.fan_slope),
        }
    }

    /// Produce a new set with only the emissions factor replaced.
    ///
    /// Used by the sensitivity scanner, which varies this one parameter.
    pub fn with_emissions_factor(&self, emissions_factor: f64) -> Self {
        Self {
            emissions_factor,
            ..*self
        }
    }

    /// Validate all parameters against their documented ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.emissions_factor.is_finite() || self.emissions_factor <= 0.0 {
            return Err(RackCarbonError::config(format!(
                "emissions_factor must be a positive number of kgCO2e/kWh, got {}",
                self.emissions_factor
            )));
        }
        if !self.pue.is_finite() || self.pue < 1.0 {
            return Err(RackCarbonError::config(format!(
                "PUE must be >= 1, got {}",
                self.pue
            )));
        }
        if !self.power_factor.is_finite() || self.power_factor <= 0.0 || self.power_factor > 1.0 {
            return Err(RackCarbonError::config(format!(
                "power_factor must be in (0, 1], got {}",
                self.power_factor
            )));
        }
        if !self.fan_slope.is_finite() || self.fan_slope < 0.0 {
            return Err(RackCarbonError::config(format!(
                "fan_slope must be >= 0, got {}",
                self.fan_slope
            )));
        }
        Ok(())
    }
}

/// Partial parameter overrides.
///
/// Every field is optional; unknown keys in an override file are rejected
/// at deserialization time rather than silently ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterOverrides {
    /// Override for the grid emissions factor (kgCO2e/kWh)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissions_factor: Option<f64>,
    /// Override for PUE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pue: Option<f64>,
    /// Override for the utilization factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_factor: Option<f64>,
    /// Override for the fan power slope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan_slope: Option<f64>,
}

impl ParameterOverrides {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.emissions_factor.is_none()
            && self.pue.is_none()
            && self.power_factor.is_none()
            && self.fan_slope.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ParameterSet::default().validate().is_ok());
    }

    #[test]
    fn test_override_merge_is_pure() {
        let base = ParameterSet::default();
        let overrides = ParameterOverrides {
            pue: Some(1.5),
            ..Default::default()
        };
        let merged = base.with_overrides(&overrides);

        assert_eq!(merged.pue, 1.5);
        assert_eq!(merged.emissions_factor, base.emissions_factor);
        // The base set is untouched
        assert_eq!(base.pue, DEFAULT_PUE);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut params = ParameterSet::default();
        params.pue = 0.9;
        assert!(params.validate().is_err());

        params = ParameterSet::default();
        params.power_factor = 0.0;
        assert!(params.validate().is_err());

        params = ParameterSet::default();
        params.power_factor = 1.2;
        assert!(params.validate().is_err());

        params = ParameterSet::default();
        params.fan_slope = -0.01;
        assert!(params.validate().is_err());

        params = ParameterSet::default();
        params.emissions_factor = 0.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_unknown_override_key_rejected() {
        let result: std::result::Result<ParameterOverrides, _> =
            serde_json::from_str(r#"{"pue": 1.3, "voltage": 240}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_emissions_factor_substitution() {
        let base = ParameterSet::default();
        let varied = base.with_emissions_factor(0.4);
        assert_eq!(varied.emissions_factor, 0.4);
        assert_eq!(varied.pue, base.pue);
    }
}
