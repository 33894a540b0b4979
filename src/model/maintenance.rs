//! Failure-rate-driven maintenance model
//!
//! Derives a server-level annualized failure rate from per-component
//! rates, interpreted downstream as the fraction of servers expected to
//! need replacement per year. The replacement overhead applies to
//! embodied carbon (extra manufactured units), not operational carbon.

use crate::data::{AfrTable, ServerConfig};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Derived server-level failure figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceResult {
    /// Design name, carried over from the config
    pub design: String,
    /// Server-level annualized failure rate
    server_afr: f64,
}

impl MaintenanceResult {
    /// Server-level annualized failure rate
    pub fn server_afr(&self) -> f64 {
        self.server_afr
    }

    /// Multiplicative replacement overhead factor, `1 + AFR`
    pub fn overhead_factor(&self) -> f64 {
        1.0 + self.server_afr
    }
}

/// The maintenance model
pub struct MaintenanceModel;

impl MaintenanceModel {
    /// Compute the server AFR for a configuration.
    ///
    /// Components fail independently, so the server survives a year with
    /// probability `Π (1 - afr_c)^qty` and the server AFR is the
    /// complement. A component class absent from the table is a lookup
    /// error.
    pub fn evaluate(config: &ServerConfig, table: &AfrTable) -> Result<MaintenanceResult> {
        let mut survival = 1.0_f64;
        for component in &config.components {
            let afr = table.get(&component.class)?;
            survival *= (1.0 - afr).powi(component.quantity as i32);
        }
        let server_afr = 1.0 - survival;
        tracing::debug!("server AFR for '{}': {:.4}", config.name, server_afr);
        Ok(MaintenanceResult {
            design: config.name.clone(),
            server_afr,
        })
    }
}
