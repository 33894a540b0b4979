//! Cluster and datacenter savings aggregation
//!
//! Rolls per-server carbon figures up to cluster-level savings
//! percentages for a baseline-to-alternative replacement, with
//! failure-replacement overhead and growth buffers, and discounts the
//! cluster figure down to a datacenter-level figure.

use crate::config::RollupPolicy;
use crate::data::ClusterRow;
use crate::error::{RackCarbonError, Result};
use crate::model::{MaintenanceResult, ServerCarbonResult};
use serde::{Deserialize, Serialize};

/// Savings outcome for one cluster row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSavings {
    /// The input cluster record
    pub row: ClusterRow,
    /// Lifetime carbon of the baseline-only cluster, kgCO2e
    pub baseline_total_kg: f64,
    /// Lifetime carbon of the mixed replacement cluster, kgCO2e
    pub mixed_total_kg: f64,
    /// Percentage saved by the replacement (negative = regression)
    pub savings_pct: f64,
}

/// Datacenter-level discounting profile
///
/// The shares of total datacenter operational and embodied carbon that
/// are attributable to compute equipment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatacenterProfile {
    /// Fraction of datacenter operational carbon from compute, [0, 1]
    pub compute_operational_fraction: f64,
    /// Fraction of datacenter embodied carbon from compute, [0, 1]
    pub compute_embodied_fraction: f64,
}

impl Default for DatacenterProfile {
    fn default() -> Self {
        Self {
            compute_operational_fraction: 0.676,
            compute_embodied_fraction: 0.419,
        }
    }
}

impl DatacenterProfile {
    /// Validate both fractions against [0, 1]
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("compute_operational_fraction", self.compute_operational_fraction),
            ("compute_embodied_fraction", self.compute_embodied_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                return Err(RackCarbonError::input(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Aggregates per-server results over observed clusters
pub struct ClusterAggregator<'a> {
    baseline: &'a ServerCarbonResult,
    baseline_maintenance: &'a MaintenanceResult,
    alternative: &'a ServerCarbonResult,
    alternative_maintenance: &'a MaintenanceResult,
    buffer_fraction: f64,
}

impl<'a> ClusterAggregator<'a> {
    /// Create an aggregator for one baseline/alternative design pair
    pub fn new(
        baseline: &'a ServerCarbonResult,
        baseline_maintenance: &'a MaintenanceResult,
        alternative: &'a ServerCarbonResult,
        alternative_maintenance: &'a MaintenanceResult,
        buffer_fraction: f64,
    ) -> Result<Self> {
        if !buffer_fraction.is_finite() || buffer_fraction < 0.0 {
            return Err(RackCarbonError::input(format!(
                "buffer_fraction must be >= 0, got {}",
                buffer_fraction
            )));
        }
        Ok(Self {
            baseline,
            baseline_maintenance,
            alternative,
            alternative_maintenance,
            buffer_fraction,
        })
    }

    /// Growth buffer for a baseline-only cluster: always rounded up to
    /// the next whole server so the buffer footprint is never understated.
    pub fn growth_buffer(&self, cluster_size: u64) -> u64 {
        (cluster_size as f64 * self.buffer_fraction).ceil() as u64
    }

    /// Growth buffer for a mixed cluster, sized in baseline-server
    /// equivalents over the combined core capacity of both designs.
    pub fn mixed_buffer(&self, row: &ClusterRow) -> u64 {
        let baseline_cores = self.baseline.virtual_cores as f64;
        let core_equivalent = (row.new_baseline as f64 * baseline_cores
            + row.new_greensku as f64 * self.alternative.virtual_cores as f64)
            / baseline_cores;
        (self.buffer_fraction * core_equivalent).ceil() as u64
    }

    /// Compute the savings for one cluster row
    pub fn evaluate_row(&self, row: &ClusterRow) -> Result<ClusterSavings> {
        let og_overhead = self.baseline_maintenance.overhead_factor();
        let new_overhead = self.alternative_maintenance.overhead_factor();
        let per_baseline_kg = self.baseline.per_server_lifetime_kg;
        let per_alternative_kg = self.alternative.per_server_lifetime_kg;

        let baseline_count = row.original_size + self.growth_buffer(row.original_size);
        let baseline_total_kg = baseline_count as f64 * per_baseline_kg * og_overhead;

        if baseline_total_kg == 0.0 {
            return Err(RackCarbonError::computation(format!(
                "baseline cluster total is zero for original_size {}; savings undefined",
                row.original_size
            )));
        }

        let mixed_count = row.new_baseline + self.mixed_buffer(row);
        let mixed_total_kg = mixed_count as f64 * per_baseline_kg * og_overhead
            + row.new_greensku as f64 * per_alternative_kg * new_overhead;

        let savings_pct = (baseline_total_kg - mixed_total_kg) * 100.0 / baseline_total_kg;

        Ok(ClusterSavings {
            row: *row,
            baseline_total_kg,
            mixed_total_kg,
            savings_pct,
        })
    }

    /// Compute savings for every cluster row, preserving input order
    pub fn evaluate_all(&self, rows: &[ClusterRow]) -> Result<Vec<ClusterSavings>> {
        rows.iter().map(|row| self.evaluate_row(row)).collect()
    }
}

/// Roll per-cluster savings up to a single percentage
pub fn rollup(savings: &[ClusterSavings], policy: RollupPolicy) -> Result<f64> {
    if savings.is_empty() {
        return Err(RackCarbonError::computation(
            "cannot roll up an empty set of cluster savings",
        ));
    }
    match policy {
        RollupPolicy::Unweighted => {
            let sum: f64 = savings.iter().map(|s| s.savings_pct).sum();
            Ok(sum / savings.len() as f64)
        }
        RollupPolicy::Weighted => {
            let total_weight: f64 = savings.iter().map(|s| s.row.original_size as f64).sum();
            if total_weight == 0.0 {
                return Err(RackCarbonError::computation(
                    "total cluster weight is zero; weighted rollup undefined",
                ));
            }
            let weighted: f64 = savings
                .iter()
                .map(|s| s.savings_pct * s.row.original_size as f64)
                .sum();
            Ok(weighted / total_weight)
        }
    }
}

/// Per-core savings percentage between two designs
pub fn core_savings_pct(
    baseline: &ServerCarbonResult,
    alternative: &ServerCarbonResult,
) -> Result<f64> {
    if baseline.total_kg_per_core_year == 0.0 {
        return Err(RackCarbonError::computation(
            "baseline per-core carbon is zero; savings undefined",
        ));
    }
    Ok(
        (baseline.total_kg_per_core_year - alternative.total_kg_per_core_year) * 100.0
            / baseline.total_kg_per_core_year,
    )
}

/// Per-server savings percentage between two designs
pub fn server_savings_pct(
    baseline: &ServerCarbonResult,
    alternative: &ServerCarbonResult,
) -> Result<f64> {
    if baseline.per_server_lifetime_kg == 0.0 {
        return Err(RackCarbonError::computation(
            "baseline per-server carbon is zero; savings undefined",
        ));
    }
    Ok(
        (baseline.per_server_lifetime_kg - alternative.per_server_lifetime_kg) * 100.0
            / baseline.per_server_lifetime_kg,
    )
}

/// Discount a cluster-level savings percentage to datacenter level.
///
/// The compute share of total datacenter carbon is a blend of the
/// operational and embodied compute fractions, weighted by the baseline
/// design's operational-vs-embodied split.
pub fn datacenter_savings_pct(
    cluster_savings_pct: f64,
    baseline: &ServerCarbonResult,
    profile: &DatacenterProfile,
) -> Result<f64> {
    profile.validate()?;
    let operational_share = baseline.operational_share_fraction();
    let compute_share = profile.compute_operational_fraction * operational_share
        + profile.compute_embodied_fraction * (1.0 - operational_share);
    Ok(cluster_savings_pct * compute_share)
}


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    fn carbon(per_server_kg: f64, cores: u32) -> ServerCarbonResult {
        ServerCarbonResult {
            design: "p".to_string(),
            operational_kg_per_core_year: 0.0,
            embodied_kg_per_core_year: 0.0,
            total_kg_per_core_year: per_server_kg / 6.0 / cores as f64,
            per_server_lifetime_kg: per_server_kg,
            virtual_cores: cores,
            operational_share_pct: 50.0,
            total_power_w: 400.0,
        }
    }

    fn no_failures() -> MaintenanceResult {
        use crate::data::{AfrTable, Component, RackUnits, ServerConfig};
        use crate::model::MaintenanceModel;
        let config = ServerConfig {
            name: "p".to_string(),
            rack_units: RackUnits::U1,
            sellable_cores: 1,
            lifetime_years: 6.0,
            components: vec![Component {
                name: "c".to_string(),
                class: "C".to_string(),
                quantity: 1,
                power_w: Some(1.0),
                embodied_kg: Some(1.0),
            }],
        };
        let table = AfrTable::from_entries([("C".to_string(), 0.0)]);
        MaintenanceModel::evaluate(&config, &table).unwrap()
    }

    proptest! {
        // Growing the alternative's share at constant core-equivalents
        // never decreases savings when the alternative is cheaper.
        #[test]
        fn greener_share_never_hurts(
            total in 1u64..500,
            split in 0u64..500,
            shift in 1u64..500,
        ) {
            let split = split.min(total);
            let shift = shift.min(split);

            let base = carbon(6000.0, 64);
            let alt = carbon(4000.0, 64);
            let maint = no_failures();
            let aggregator =
                ClusterAggregator::new(&base, &maint, &alt, &maint, 0.1).unwrap();

            let before = aggregator.evaluate_row(&ClusterRow {
                original_size: total,
                new_baseline: split,
                new_greensku: total - split,
            }).unwrap();
            let after = aggregator.evaluate_row(&ClusterRow {
                original_size: total,
                new_baseline: split - shift,
                new_greensku: total - split + shift,
            }).unwrap();

            prop_assert!(after.savings_pct >= before.savings_pct - 1e-9);
        }
    }
}
