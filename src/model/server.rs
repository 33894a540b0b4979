//! Per-server carbon model
//!
//! Converts a server bill-of-materials and an operating parameter set
//! into operational and embodied carbon figures, normalized per sellable
//! core and amortized over the server's lifetime so the two figures are
//! additive.

use crate::config::{ParameterSet, HOURS_PER_YEAR};
use crate::data::{RackUnits, ServerConfig};
use crate::error::{RackCarbonError, Result};
use serde::{Deserialize, Serialize};

/// Default declared no-fan power for a 1U chassis, watts
pub const DEFAULT_BASELINE_1U_W: f64 = 500.0;

/// Default declared no-fan power for a 2U chassis, watts
pub const DEFAULT_BASELINE_2U_W: f64 = 800.0;

/// Declared baseline no-fan power per chassis class
///
/// Fan power scales with the difference between a server's no-fan power
/// and the declared baseline for its rack-unit class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChassisBaselines {
    /// Baseline no-fan power for 1U chassis, watts
    pub u1_watts: f64,
    /// Baseline no-fan power for 2U chassis, watts
    pub u2_watts: f64,
}

impl Default for ChassisBaselines {
    fn default() -> Self {
        Self {
            u1_watts: DEFAULT_BASELINE_1U_W,
            u2_watts: DEFAULT_BASELINE_2U_W,
        }
    }
}

impl ChassisBaselines {
    /// Baseline watts for a rack-unit class
    pub fn for_class(&self, class: RackUnits) -> f64 {
        match class {
            RackUnits::U1 => self.u1_watts,
            RackUnits::U2 => self.u2_watts,
        }
    }

    /// Replace the entry for one class, returning the new table
    pub fn with_watts(mut self, class: RackUnits, watts: f64) -> Self {
        match class {
            RackUnits::U1 => self.u1_watts = watts,
            RackUnits::U2 => self.u2_watts = watts,
        }
        self
    }

    /// Declare the reference design's computed no-fan power as the
    /// baseline for its own chassis class.
    ///
    /// The reference design then carries zero marginal fan power and
    /// alternatives in the same class scale from the power difference.
    pub fn from_reference(config: &ServerConfig, params: &ParameterSet) -> Result<Self> {
        let no_fan = ServerCarbonModel::no_fan_power_w(config, params)?;
        Ok(Self::default().with_watts(config.rack_units, no_fan))
    }
}

/// Derived carbon figures for one (config, parameter set) pair
///
/// Immutable once computed; a new result is produced for every pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCarbonResult {
    /// Design name, carried over from the config
    pub design: String,
    /// Operational carbon per sellable core, kgCO2e/core/year
    pub operational_kg_per_core_year: f64,
    /// Embodied carbon per sellable core, kgCO2e/core/year
    pub embodied_kg_per_core_year: f64,
    /// Total carbon per sellable core, kgCO2e/core/year
    pub total_kg_per_core_year: f64,
    /// Unamortized lifetime carbon for one server, kgCO2e
    ///
    /// This is the figure multiplied by maintenance overhead factors in
    /// the cluster aggregation.
    pub per_server_lifetime_kg: f64,
    /// Number of sellable (virtual) cores
    pub virtual_cores: u32,
    /// Share of lifetime rack carbon that is operational, percent
    pub operational_share_pct: f64,
    /// Total server power including cooling fans, watts
    pub total_power_w: f64,
}

impl ServerCarbonResult {
    /// Operational share as a fraction in [0, 1]
    pub fn operational_share_fraction(&self) -> f64 {
        self.operational_share_pct / 100.0
    }
}

/// The per-server carbon model
pub struct ServerCarbonModel;

impl ServerCarbonModel {
    /// Server power without cooling, watts: nameplate component power
    /// scaled by the utilization factor.
    pub fn no_fan_power_w(config: &ServerConfig, params: &ParameterSet) -> Result<f64> {
        let mut nameplate = 0.0;
        for component in &config.components {
            let power = component.power_w.ok_or_else(|| {
                RackCarbonError::missing_attribute(&component.name, "power_w")
            })?;
            nameplate += power * component.quantity as f64;
        }
        Ok(nameplate * params.power_factor)
    }

    /// Total embodied manufacturing carbon for one server, kgCO2e
    pub fn embodied_kg(config: &ServerConfig) -> Result<f64> {
        let mut total = 0.0;
        for component in &config.components {
            let embodied = component.embodied_kg.ok_or_else(|| {
                RackCarbonError::missing_attribute(&component.name, "embodied_kg")
            })?;
            total += embodied * component.quantity as f64;
        }
        Ok(total)
    }

    /// Evaluate the full carbon model for one (config, parameter set) pair
    pub fn evaluate(
        config: &ServerConfig,
        params: &ParameterSet,
        baselines: &ChassisBaselines,
    ) -> Result<ServerCarbonResult> {
        params.validate()?;
        config.validate()?;

        if config.sellable_cores == 0 {
            return Err(RackCarbonError::config(format!(
                "server config '{}' declares zero sellable cores",
                config.name
            )));
        }

        let no_fan_w = Self::no_fan_power_w(config, params)?;
        let baseline_w = baselines.for_class(config.rack_units);
        let fan_w = (no_fan_w - baseline_w) * params.fan_slope;
        let total_w = no_fan_w + fan_w;
        if total_w < 0.0 {
            return Err(RackCarbonError::config(format!(
                "server config '{}' yields negative total power {:.1} W",
                config.name, total_w
            )));
        }

        let operational_kg_year =
            total_w / 1000.0 * HOURS_PER_YEAR * params.pue * params.emissions_factor;
        let operational_lifetime_kg = operational_kg_year * config.lifetime_years;

        let embodied_total_kg = Self::embodied_kg(config)?;
        let embodied_kg_year = embodied_total_kg / config.lifetime_years;

        let lifetime_total_kg = operational_lifetime_kg + embodied_total_kg;
        if lifetime_total_kg <= 0.0 {
            return Err(RackCarbonError::computation(format!(
                "server config '{}' has zero lifetime carbon; cannot derive shares",
                config.name
            )));
        }

        let cores = config.sellable_cores as f64;
        let result = ServerCarbonResult {
            design: config.name.clone(),
            operational_kg_per_core_year: operational_kg_year / cores,
            embodied_kg_per_core_year: embodied_kg_year / cores,
            total_kg_per_core_year: (operational_kg_year + embodied_kg_year) / cores,
            per_server_lifetime_kg: lifetime_total_kg,
            virtual_cores: config.sellable_cores,
            operational_share_pct: operational_lifetime_kg / lifetime_total_kg * 100.0,
            total_power_w: total_w,
        };

        tracing::debug!(
            "evaluated '{}': {:.1} W, {:.2} kg/core/yr, {:.0} kg lifetime",
            result.design,
            result.total_power_w,
            result.total_kg_per_core_year,
            result.per_server_lifetime_kg
        );
        Ok(result)
    }
}
