//! Carbon intensity sensitivity scanning
//!
//! Re-runs the per-server model and the weighted cluster rollup while
//! varying the emissions factor across an ordered sequence of steps,
//! producing a savings curve per alternative design. Every point is an
//! independent pure recomputation; no state is shared between steps.

use crate::config::{ParameterSet, RollupPolicy};
use crate::data::{AfrTable, ClusterRow, ServerConfig};
use crate::error::Result;
use crate::model::{ChassisBaselines, MaintenanceModel, ServerCarbonModel};
use crate::aggregate::{rollup, ClusterAggregator};
use serde::{Deserialize, Serialize};

/// One point on a savings curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Emissions factor for this step, kgCO2e/kWh
    pub emissions_factor: f64,
    /// Weighted cluster-level savings at this step, percent
    pub savings_pct: f64,
}

/// The savings curve for one alternative design
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSeries {
    /// Alternative design name
    pub design: String,
    /// Points in the same order as the input steps
    pub points: Vec<SweepPoint>,
}

/// Sensitivity scanner over the emissions factor
pub struct SensitivityScanner<'a> {
    baseline: &'a ServerConfig,
    alternatives: &'a [ServerConfig],
    clusters: &'a [ClusterRow],
    afr_table: &'a AfrTable,
    params: ParameterSet,
    chassis: ChassisBaselines,
    buffer_fraction: f64,
}

impl<'a> SensitivityScanner<'a> {
    /// Create a scanner holding every input fixed except the emissions
    /// factor, which the scan varies.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        baseline: &'a ServerConfig,
        alternatives: &'a [ServerConfig],
        clusters: &'a [ClusterRow],
        afr_table: &'a AfrTable,
        params: ParameterSet,
        chassis: ChassisBaselines,
        buffer_fraction: f64,
    ) -> Self {
        Self {
            baseline,
            alternatives,
            clusters,
            afr_table,
            params,
            chassis,
            buffer_fraction,
        }
    }

    /// Run the sweep across the given ordered steps.
    ///
    /// Output series preserve both the step order and the alternative
    /// design order of the inputs.
    pub fn scan(&self, ci_steps: &[f64]) -> Result<Vec<SweepSeries>> {
        let baseline_maintenance = MaintenanceModel::evaluate(self.baseline, self.afr_table)?;

        let mut series: Vec<SweepSeries> = self
            .alternatives
            .iter()
            .map(|alt| SweepSeries {
                design: alt.name.clone(),
                points: Vec::with_capacity(ci_steps.len()),
            })
            .collect();

        for &step in ci_steps {
            let params = self.params.with_emissions_factor(step);
            let baseline_carbon =
                ServerCarbonModel::evaluate(self.baseline, &params, &self.chassis)?;

            for (alt, entry) in self.alternatives.iter().zip(&mut series) {
                let alt_carbon = ServerCarbonModel::evaluate(alt, &params, &self.chassis)?;
                let alt_maintenance = MaintenanceModel::evaluate(alt, self.afr_table)?;

                let aggregator = ClusterAggregator::new(
                    &baseline_carbon,
                    &baseline_maintenance,
                    &alt_carbon,
                    &alt_maintenance,
                    self.buffer_fraction,
                )?;
                let savings = aggregator.evaluate_all(self.clusters)?;
                let savings_pct = rollup(&savings, RollupPolicy::Weighted)?;

                entry.points.push(SweepPoint {
                    emissions_factor: step,
                    savings_pct,
                });
            }
            tracing::debug!("sweep step {:.4} kgCO2e/kWh complete", step);
        }

        Ok(series)
    }
}
