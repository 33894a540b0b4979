//! Savings report assembly and rendering
//!
//! Bundles the typed results of a comparison into one report value and
//! renders it as text, JSON, or CSV. Rendering is a pure formatting step
//! over already-computed results; no model computation happens here.

use crate::aggregate::{ClusterSavings, SweepSeries};
use crate::config::{OutputFormat, RollupPolicy};
use crate::error::{RackCarbonError, Result};
use crate::model::ServerCarbonResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comparison results for one alternative design
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignReport {
    /// Alternative design name
    pub design: String,
    /// Per-server carbon figures for the alternative
    pub carbon: ServerCarbonResult,
    /// Server-level AFR of the alternative
    pub server_afr: f64,
    /// Per-core savings vs. baseline, percent
    pub core_savings_pct: f64,
    /// Per-server savings vs. baseline, percent
    pub server_savings_pct: f64,
    /// Per-cluster savings rows
    pub clusters: Vec<ClusterSavings>,
    /// Size-weighted cluster rollup, percent
    pub cluster_savings_weighted_pct: f64,
    /// Unweighted cluster rollup, percent
    pub cluster_savings_unweighted_pct: f64,
    /// Datacenter-level savings, percent
    pub datacenter_savings_pct: f64,
}

/// A full comparison report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsReport {
    /// Report creation time
    pub generated_at: DateTime<Utc>,
    /// Baseline per-server carbon figures
    pub baseline: ServerCarbonResult,
    /// Server-level AFR of the baseline
    pub baseline_afr: f64,
    /// Growth buffer fraction used for cluster totals
    pub buffer_fraction: f64,
    /// Rollup policy used for the headline figure
    pub headline_rollup: RollupPolicy,
    /// One entry per alternative design
    pub designs: Vec<DesignReport>,
}

impl SavingsReport {
    /// Create a report around a baseline result
    pub fn new(
        baseline: ServerCarbonResult,
        baseline_afr: f64,
        buffer_fraction: f64,
        headline_rollup: RollupPolicy,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            baseline,
            baseline_afr,
            buffer_fraction,
            headline_rollup,
            designs: Vec::new(),
        }
    }

    /// The headline savings figure for a design entry
    pub fn headline_pct(&self, design: &DesignReport) -> f64 {
        match self.headline_rollup {
            RollupPolicy::Weighted => design.cluster_savings_weighted_pct,
            RollupPolicy::Unweighted => design.cluster_savings_unweighted_pct,
        }
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => render_json(self),
            OutputFormat::Csv => Ok(self.render_csv()),
        }
    }

    /// Human-readable console report
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Carbon Savings Report ===\n\n");
        out.push_str(&format!(
            "Baseline: {} ({} cores, {:.1} W)\n",
            self.baseline.design, self.baseline.virtual_cores, self.baseline.total_power_w
        ));
        out.push_str(&format!(
            "  Total: {:.2} kgCO2e/core/yr ({:.2} operational, {:.2} embodied)\n",
            self.baseline.total_kg_per_core_year,
            self.baseline.operational_kg_per_core_year,
            self.baseline.embodied_kg_per_core_year
        ));
        out.push_str(&format!(
            "  Lifetime per server: {:.0} kgCO2e, operational share {:.1}%\n",
            self.baseline.per_server_lifetime_kg, self.baseline.operational_share_pct
        ));
        out.push_str(&format!(
            "  Server AFR: {:.2}%\n",
            self.baseline_afr * 100.0
        ));
        out.push_str(&format!(
            "  Buffer fraction: {:.0}%\n",
            self.buffer_fraction * 100.0
        ));

        for design in &self.designs {
            out.push_str(&format!(
                "\nAlternative: {} ({} cores, {:.1} W)\n",
                design.design, design.carbon.virtual_cores, design.carbon.total_power_w
            ));
            out.push_str(&format!(
                "  Total: {:.2} kgCO2e/core/yr, server AFR {:.2}%\n",
                design.carbon.total_kg_per_core_year,
                design.server_afr * 100.0
            ));
            out.push_str(&format!(
                "  Per-core savings:   {:+.2}%\n",
                design.core_savings_pct
            ));
            out.push_str(&format!(
                "  Per-server savings: {:+.2}%\n",
                design.server_savings_pct
            ));
            out.push_str(&format!(
                "  Cluster savings:    {:+.2}% weighted, {:+.2}% unweighted ({} clusters)\n",
                design.cluster_savings_weighted_pct,
                design.cluster_savings_unweighted_pct,
                design.clusters.len()
            ));
            out.push_str(&format!(
                "  Datacenter savings: {:+.2}%\n",
                design.datacenter_savings_pct
            ));
            out.push_str(&format!(
                "  Headline:           {:+.2}%\n",
                self.headline_pct(design)
            ));
        }
        out
    }

    /// CSV rendering: one row per (design, cluster), then summary rows
    pub fn render_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(
            "design,original_size,new_baseline,new_greensku,baseline_total_kg,mixed_total_kg,savings_pct\n",
        );
        for design in &self.designs {
            for cluster in &design.clusters {
                out.push_str(&format!(
                    "{},{},{},{},{:.3},{:.3},{:.4}\n",
                    design.design,
                    cluster.row.original_size,
                    cluster.row.new_baseline,
                    cluster.row.new_greensku,
                    cluster.baseline_total_kg,
                    cluster.mixed_total_kg,
                    cluster.savings_pct
                ));
            }
            out.push_str(&format!(
                "{},summary,,,,,{:.4}\n",
                design.design,
                self.headline_pct(design)
            ));
        }
        out
    }
}

/// Render a sweep result in the requested format
pub fn render_sweep(series: &[SweepSeries], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str("=== Carbon Intensity Sweep ===\n");
            for s in series {
                out.push_str(&format!("\nDesign: {}\n", s.design));
                out.push_str("  kgCO2e/kWh    savings %\n");
                for point in &s.points {
                    out.push_str(&format!(
                        "  {:<12.4}  {:+.3}\n",
                        point.emissions_factor, point.savings_pct
                    ));
                }
            }
            Ok(out)
        }
        OutputFormat::Json => render_json(&series),
        OutputFormat::Csv => {
            let mut out = String::from("design,emissions_factor,savings_pct\n");
            for s in series {
                for point in &s.points {
                    out.push_str(&format!(
                        "{},{},{:.4}\n",
                        s.design, point.emissions_factor, point.savings_pct
                    ));
                }
            }
            Ok(out)
        }
    }
}

fn render_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| RackCarbonError::computation(format!("report serialization failed: {}", e)))
}
