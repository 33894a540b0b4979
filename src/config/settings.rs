//! CLI definition for RackCarbon
//!
//! Defines all command-line arguments, subcommands, and output options
//! for the carbon comparison workflows.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// RackCarbon - carbon footprint comparison for datacenter server fleets
#[derive(Parser, Debug, Clone)]
#[command(name = "rackcarbon")]
#[command(author = "RackCarbon Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Estimate and compare server fleet carbon footprints")]
#[command(long_about = r#"
RackCarbon estimates the operational and embodied carbon of datacenter
server configurations and computes the savings from replacing a baseline
design with an alternative design at cluster and datacenter scale.

Examples:
  rackcarbon compare -b base.json -a alt.json --clusters clusters.csv --afr afr.csv
  rackcarbon sweep -b base.json -a alt.json --clusters clusters.csv --afr afr.csv \
      --ci-steps 0.05,0.1,0.2,0.4
  rackcarbon intensity --datacenters dc.csv --region us-west
  rackcarbon fan-fit --samples fans.csv --normalize
"#)]
pub struct CliArgs {
    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Output format for reports
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compare a baseline design against one or more alternatives
    #[command(name = "compare")]
    Compare {
        /// Baseline server configuration (JSON)
        #[arg(short = 'b', long, value_name = "PATH")]
        baseline: PathBuf,

        /// Alternative server configuration (JSON, repeatable)
        #[arg(short = 'a', long = "alternative", value_name = "PATH", required = true)]
        alternatives: Vec<PathBuf>,

        /// Cluster size records (CSV)
        #[arg(long, value_name = "PATH")]
        clusters: PathBuf,

        /// Component failure rate table (CSV)
        #[arg(long, value_name = "PATH")]
        afr: PathBuf,

        /// Datacenter intensity dataset (CSV); sets the emissions factor
        /// to the dataset average when provided
        #[arg(long, value_name = "PATH")]
        datacenters: Option<PathBuf>,

        /// Parameter override file (JSON)
        #[arg(long, value_name = "PATH")]
        params: Option<PathBuf>,

        /// Growth buffer as a fraction of cluster size
        #[arg(long, default_value = "0.1", value_name = "FRACTION")]
        buffer_fraction: f64,

        /// Rollup policy for the headline cluster figure
        #[arg(long, value_enum, default_value = "weighted")]
        rollup: RollupPolicy,

        /// Fraction of datacenter operational carbon attributable to compute
        #[arg(long, default_value = "0.676", value_name = "FRACTION")]
        compute_operational_fraction: f64,

        /// Fraction of datacenter embodied carbon attributable to compute
        #[arg(long, default_value = "0.419", value_name = "FRACTION")]
        compute_embodied_fraction: f64,
    },

    /// Sweep the emissions factor and report savings per step
    #[command(name = "sweep")]
    Sweep {
        /// Baseline server configuration (JSON)
        #[arg(short = 'b', long, value_name = "PATH")]
        baseline: PathBuf,

        /// Alternative server configuration (JSON, repeatable)
        #[arg(short = 'a', long = "alternative", value_name = "PATH", required = true)]
        alternatives: Vec<PathBuf>,

        /// Cluster size records (CSV)
        #[arg(long, value_name = "PATH")]
        clusters: PathBuf,

        /// Component failure rate table (CSV)
        #[arg(long, value_name = "PATH")]
        afr: PathBuf,

        /// Parameter override file (JSON)
        #[arg(long, value_name = "PATH")]
        params: Option<PathBuf>,

        /// Ordered emissions factor steps in kgCO2e/kWh (comma separated)
        #[arg(long, value_name = "STEPS", value_delimiter = ',', required = true)]
        ci_steps: Vec<f64>,

        /// Growth buffer as a fraction of cluster size
        #[arg(long, default_value = "0.1", value_name = "FRACTION")]
        buffer_fraction: f64,
    },

    /// Estimate grid carbon intensity from a datacenter dataset
    #[command(name = "intensity")]
    Intensity {
        /// Datacenter intensity dataset (CSV)
        #[arg(long, value_name = "PATH")]
        datacenters: PathBuf,

        /// Report a single region instead of the dataset average
        #[arg(long, value_name = "REGION")]
        region: Option<String>,
    },

    /// Fit the linear fan power model from measured samples
    #[command(name = "fan-fit")]
    FanFit {
        /// Fan power samples (CSV of server_power_w,fan_power_w)
        #[arg(long, value_name = "PATH")]
        samples: PathBuf,

        /// Normalize fan power by its maximum before fitting
        #[arg(long)]
        normalize: bool,
    },
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

/// Rollup policy for multi-cluster savings
///
/// Both flavors are preserved because reported reference figures depend
/// on which one a given call site uses.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RollupPolicy {
    /// Unweighted arithmetic mean of per-cluster percentages
    Unweighted,
    /// Mean weighted by original cluster size (the headline figure)
    #[default]
    Weighted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollup_policy_default() {
        assert_eq!(RollupPolicy::default(), RollupPolicy::Weighted);
    }

    #[test]
    fn test_cli_parses_compare() {
        let args = CliArgs::try_parse_from([
            "rackcarbon",
            "compare",
            "-b",
            "base.json",
            "-a",
            "alt.json",
            "--clusters",
            "clusters.csv",
            "--afr",
            "afr.csv",
        ])
        .unwrap();

        match args.command {
            Commands::Compare {
                baseline,
                alternatives,
                buffer_fraction,
                rollup,
                ..
            } => {
                assert_eq!(baseline, PathBuf::from("base.json"));
                assert_eq!(alternatives.len(), 1);
                assert_eq!(buffer_fraction, 0.1);
                assert_eq!(rollup, RollupPolicy::Weighted);
            }
            _ => panic!("expected compare subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_sweep_steps() {
        let args = CliArgs::try_parse_from([
            "rackcarbon",
            "sweep",
            "-b",
            "base.json",
            "-a",
            "alt.json",
            "--clusters",
            "clusters.csv",
            "--afr",
            "afr.csv",
            "--ci-steps",
            "0.05,0.1,0.2",
        ])
        .unwrap();

        match args.command {
            Commands::Sweep { ci_steps, .. } => {
                assert_eq!(ci_steps, vec![0.05, 0.1, 0.2]);
            }
            _ => panic!("expected sweep subcommand"),
        }
    }
}
