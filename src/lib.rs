//! # RackCarbon - Server Fleet Carbon Accounting
//!
//! RackCarbon estimates and compares the carbon footprint of alternative
//! datacenter server hardware configurations. For a server
//! bill-of-materials and a set of operating parameters it computes
//! operational and embodied carbon per unit of useful compute, and rolls
//! per-server figures up to cluster- and datacenter-level savings when a
//! baseline design is replaced by an alternative at scale.
//!
//! ## Features
//!
//! - **Per-server carbon model**: operational + embodied carbon,
//!   normalized per sellable core and amortized over server lifetime
//! - **Grid intensity estimation**: renewable/grid blending over a
//!   datacenter dataset
//! - **Linear fan power model**: OLS fit of fan power vs. server power
//! - **Maintenance overhead**: failure-rate-driven replacement factors
//! - **Cluster aggregation**: growth buffers, failure overhead, weighted
//!   and unweighted rollups
//! - **Sensitivity sweeps**: savings curves over the emissions factor
//!
//! ## Quick Start
//!
//! ```no_run
//! use rackcarbon::config::ParameterSet;
//! use rackcarbon::data::load_server_config;
//! use rackcarbon::model::{ChassisBaselines, ServerCarbonModel};
//! use std::path::Path;
//!
//! let config = load_server_config(Path::new("baseline.json")).unwrap();
//! let params = ParameterSet::default();
//! let baselines = ChassisBaselines::from_reference(&config, &params).unwrap();
//!
//! let result = ServerCarbonModel::evaluate(&config, &params, &baselines).unwrap();
//! println!("{:.2} kgCO2e/core/yr", result.total_kg_per_core_year);
//! ```
//!
//! ## Cluster Comparison
//!
//! ```no_run
//! use rackcarbon::aggregate::{rollup, ClusterAggregator};
//! use rackcarbon::config::{ParameterSet, RollupPolicy};
//! use rackcarbon::data::{load_afr_table, load_cluster_rows, load_server_config};
//! use rackcarbon::model::{ChassisBaselines, MaintenanceModel, ServerCarbonModel};
//! use std::path::Path;
//!
//! let baseline = load_server_config(Path::new("baseline.json")).unwrap();
//! let alternative = load_server_config(Path::new("greensku.json")).unwrap();
//! let clusters = load_cluster_rows(Path::new("clusters.csv")).unwrap();
//! let afr = load_afr_table(Path::new("afr.csv")).unwrap();
//!
//! let params = ParameterSet::default();
//! let chassis = ChassisBaselines::from_reference(&baseline, &params).unwrap();
//!
//! let base_carbon = ServerCarbonModel::evaluate(&baseline, &params, &chassis).unwrap();
//! let alt_carbon = ServerCarbonModel::evaluate(&alternative, &params, &chassis).unwrap();
//! let base_maint = MaintenanceModel::evaluate(&baseline, &afr).unwrap();
//! let alt_maint = MaintenanceModel::evaluate(&alternative, &afr).unwrap();
//!
//! let aggregator =
//!     ClusterAggregator::new(&base_carbon, &base_maint, &alt_carbon, &alt_maint, 0.1).unwrap();
//! let savings = aggregator.evaluate_all(&clusters).unwrap();
//! let headline = rollup(&savings, RollupPolicy::Weighted).unwrap();
//! println!("cluster savings: {:.1}%", headline);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod report;

// Re-export commonly used types
pub use aggregate::{ClusterAggregator, ClusterSavings, SensitivityScanner, SweepSeries};
pub use config::{ParameterOverrides, ParameterSet, RollupPolicy};
pub use error::{RackCarbonError, Result};
pub use model::{
    CarbonIntensityEstimator, FanPowerFit, MaintenanceModel, MaintenanceResult, ServerCarbonModel,
    ServerCarbonResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use rackcarbon::prelude::*;
    //! ```

    pub use crate::aggregate::{
        core_savings_pct, datacenter_savings_pct, rollup, server_savings_pct, ClusterAggregator,
        ClusterSavings, DatacenterProfile, SensitivityScanner, SweepPoint, SweepSeries,
    };
    pub use crate::config::{OutputFormat, ParameterOverrides, ParameterSet, RollupPolicy};
    pub use crate::data::{
        AfrTable, ClusterRow, Component, DatacenterRecord, FanSample, RackUnits, ServerConfig,
    };
    pub use crate::error::{RackCarbonError, Result};
    pub use crate::model::{
        CarbonIntensityEstimator, ChassisBaselines, FanPowerFit, MaintenanceModel,
        MaintenanceResult, ServerCarbonModel, ServerCarbonResult,
    };
    pub use crate::report::{render_sweep, DesignReport, SavingsReport};
}
