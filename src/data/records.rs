//! Input record types for the carbon models
//!
//! These are the logical shapes consumed from external datasets: server
//! bills-of-materials, datacenter intensity records, fan power samples,
//! cluster size records, and component failure rate tables. All of them
//! are read-only for the lifetime of a computation.

use crate::error::{RackCarbonError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Chassis rack-unit class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RackUnits {
    /// 1U chassis
    #[serde(rename = "1U")]
    U1,
    /// 2U chassis
    #[serde(rename = "2U")]
    U2,
}

impl RackUnits {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::U1 => "1U",
            Self::U2 => "2U",
        }
    }
}

fn default_quantity() -> u32 {
    1
}

/// One hardware component in a server bill-of-materials
///
/// Power and embodied carbon attributes are optional at the record level;
/// the carbon model raises a configuration error when an attribute it
/// needs is absent, rather than zero-filling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Component {
    /// Component name (e.g. "cpu0", "dimm3")
    pub name: String,
    /// Component class, joined against the AFR table (e.g. "CPU", "DIMM")
    pub class: String,
    /// Number of identical units
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Nameplate power draw in watts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_w: Option<f64>,
    /// Manufacturing carbon in kgCO2e per unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embodied_kg: Option<f64>,
}

fn default_lifetime_years() -> f64 {
    6.0
}

/// A server hardware configuration (bill-of-materials)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Design name (e.g. "baseline-gen9")
    pub name: String,
    /// Chassis rack-unit class
    pub rack_units: RackUnits,
    /// Number of sellable compute cores (may exclude reserved cores)
    pub sellable_cores: u32,
    /// Amortization horizon in years
    #[serde(default = "default_lifetime_years")]
    pub lifetime_years: f64,
    /// Hardware component list
    pub components: Vec<Component>,
}

impl ServerConfig {
    /// Validate structural invariants that can be checked at load time.
    ///
    /// Zero sellable cores is left to the carbon model, which reports it
    /// as a configuration error at computation time.
    pub fn validate(&self) -> Result<()> {
        if self.components.is_empty() {
            return Err(RackCarbonError::config(format!(
                "server config '{}' has no components",
                self.name
            )));
        }
        if !self.lifetime_years.is_finite() || self.lifetime_years <= 0.0 {
            return Err(RackCarbonError::config(format!(
                "server config '{}' has non-positive lifetime_years {}",
                self.name, self.lifetime_years
            )));
        }
        for component in &self.components {
            if component.quantity == 0 {
                return Err(RackCarbonError::config(format!(
                    "component '{}' in '{}' has zero quantity",
                    component.name, self.name
                )));
            }
            if let Some(power) = component.power_w {
                if !power.is_finite() || power < 0.0 {
                    return Err(RackCarbonError::config(format!(
                        "component '{}' in '{}' has invalid power_w {}",
                        component.name, self.name, power
                    )));
                }
            }
            if let Some(embodied) = component.embodied_kg {
                if !embodied.is_finite() || embodied < 0.0 {
                    return Err(RackCarbonError::config(format!(
                        "component '{}' in '{}' has invalid embodied_kg {}",
                        component.name, self.name, embodied
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One datacenter record from the intensity dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatacenterRecord {
    /// Region identifier (e.g. "us-west")
    pub region: String,
    /// Renewable energy share in percent, [0, 100]
    pub renewable_pct: f64,
    /// Average renewable carbon intensity in gCO2e/kWh
    pub renewable_intensity: f64,
    /// Average grid carbon intensity in gCO2e/kWh
    pub grid_intensity: f64,
}

/// One measured (server power, fan power) sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FanSample {
    /// Total server power in watts
    pub server_power_w: f64,
    /// Fan power in watts
    pub fan_power_w: f64,
}

/// One observed cluster and its replacement split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRow {
    /// Server count of the original baseline-only cluster
    pub original_size: u64,
    /// Baseline servers retained in the new cluster
    pub new_baseline: u64,
    /// Alternative-design servers in the new cluster
    pub new_greensku: u64,
}

/// Component-class keyed annualized failure rate table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AfrTable {
    rates: HashMap<String, f64>,
}

impl AfrTable {
    /// Build a table from (class, AFR) entries
    pub fn from_entries(entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            rates: entries.into_iter().collect(),
        }
    }

    /// Insert or replace one class entry
    pub fn insert(&mut self, class: impl Into<String>, afr: f64) {
        self.rates.insert(class.into(), afr);
    }

    /// Look up the AFR for a component class
    pub fn get(&self, class: &str) -> Result<f64> {
        self.rates
            .get(class)
            .copied()
            .ok_or_else(|| RackCarbonError::MissingAfr(class.to_string()))
    }

    /// Number of classes in the table
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// True when the table has no entries
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ServerConfig {
        ServerConfig {
            name: "test".to_string(),
            rack_units: RackUnits::U1,
            sellable_cores: 64,
            lifetime_years: 6.0,
            components: vec![Component {
                name: "cpu0".to_string(),
                class: "CPU".to_string(),
                quantity: 2,
                power_w: Some(150.0),
                embodied_kg: Some(20.0),
            }],
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(sample_config().validate().is_ok());

        let mut config = sample_config();
        config.components.clear();
        assert!(config.validate().is_err());

        let mut config = sample_config();
        config.lifetime_years = 0.0;
        assert!(config.validate().is_err());

        let mut config = sample_config();
        config.components[0].quantity = 0;
        assert!(config.validate().is_err());

        let mut config = sample_config();
        config.components[0].power_w = Some(-5.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_unknown_field_rejected() {
        let json = r#"{
            "name": "x",
            "rack_units": "1U",
            "sellable_cores": 8,
            "components": [],
            "paint_color": "green"
        }"#;
        let result: std::result::Result<ServerConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_afr_table_lookup() {
        let table = AfrTable::from_entries([("CPU".to_string(), 0.02)]);
        assert_eq!(table.get("CPU").unwrap(), 0.02);

        let err = table.get("DIMM").unwrap_err();
        assert!(err.is_lookup_failure());
    }

    #[test]
    fn test_rack_units_serde_labels() {
        let config = sample_config();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"1U\""));
        assert_eq!(RackUnits::U2.label(), "2U");
    }
}
