//! RackCarbon CLI - Server Fleet Carbon Accounting
//!
//! Compares the carbon footprint of datacenter server designs at server,
//! cluster, and datacenter granularity.

use clap::Parser;
use rackcarbon::aggregate::{
    core_savings_pct, datacenter_savings_pct, rollup, server_savings_pct, ClusterAggregator,
    DatacenterProfile, SensitivityScanner,
};
use rackcarbon::config::{CliArgs, Commands, OutputFormat, ParameterSet, RollupPolicy};
use rackcarbon::data::{
    load_afr_table, load_cluster_rows, load_datacenters, load_fan_samples,
    load_parameter_overrides, load_server_config,
};
use rackcarbon::error::Result;
use rackcarbon::model::{
    CarbonIntensityEstimator, ChassisBaselines, FanPowerFit, MaintenanceModel, ServerCarbonModel,
};
use rackcarbon::report::{render_sweep, DesignReport, SavingsReport};
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    // Parse CLI arguments
    let args = CliArgs::parse();

    // Handle result
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<()> {
    match &args.command {
        Commands::Compare {
            baseline,
            alternatives,
            clusters,
            afr,
            datacenters,
            params,
            buffer_fraction,
            rollup: rollup_policy,
            compute_operational_fraction,
            compute_embodied_fraction,
        } => cmd_compare(
            args,
            baseline,
            alternatives,
            clusters,
            afr,
            datacenters.as_deref(),
            params.as_deref(),
            *buffer_fraction,
            *rollup_policy,
            DatacenterProfile {
                compute_operational_fraction: *compute_operational_fraction,
                compute_embodied_fraction: *compute_embodied_fraction,
            },
        ),
        Commands::Sweep {
            baseline,
            alternatives,
            clusters,
            afr,
            params,
            ci_steps,
            buffer_fraction,
        } => cmd_sweep(
            args,
            baseline,
            alternatives,
            clusters,
            afr,
            params.as_deref(),
            ci_steps,
            *buffer_fraction,
        ),
        Commands::Intensity {
            datacenters,
            region,
        } => cmd_intensity(args, datacenters, region.as_deref()),
        Commands::FanFit { samples, normalize } => {
            cmd_fan_fit(args, samples, *normalize)
        }
    }
}

/// Build the effective parameter set for a run.
///
/// A datacenter dataset sets the emissions factor to its average; an
/// explicit override file wins over both the defaults and the dataset.
fn effective_params(
    datacenters: Option<&Path>,
    overrides: Option<&Path>,
) -> Result<ParameterSet> {
    let mut params = ParameterSet::default();

    if let Some(path) = datacenters {
        let records = load_datacenters(path)?;
        let estimator = CarbonIntensityEstimator::new(records);
        params = params.with_emissions_factor(estimator.average()?);
        tracing::debug!(
            "emissions factor from dataset average: {:.4} kgCO2e/kWh",
            params.emissions_factor
        );
    }

    if let Some(path) = overrides {
        let loaded = load_parameter_overrides(path)?;
        params = params.with_overrides(&loaded);
    }

    params.validate()?;
    Ok(params)
}

#[allow(clippy::too_many_arguments)]
fn cmd_compare(
    args: &CliArgs,
    baseline_path: &Path,
    alternative_paths: &[std::path::PathBuf],
    clusters_path: &Path,
    afr_path: &Path,
    datacenters_path: Option<&Path>,
    params_path: Option<&Path>,
    buffer_fraction: f64,
    rollup_policy: RollupPolicy,
    profile: DatacenterProfile,
) -> Result<()> {
    let baseline = load_server_config(baseline_path)?;
    let clusters = load_cluster_rows(clusters_path)?;
    let afr_table = load_afr_table(afr_path)?;
    let params = effective_params(datacenters_path, params_path)?;

    if args.verbose > 0 {
        eprintln!(
            "Parameters: emissions_factor={} pue={} power_factor={} fan_slope={}",
            params.emissions_factor, params.pue, params.power_factor, params.fan_slope
        );
    }

    // The baseline design declares the no-fan power for its own chassis class
    let chassis = ChassisBaselines::from_reference(&baseline, &params)?;
    let base_carbon = ServerCarbonModel::evaluate(&baseline, &params, &chassis)?;
    let base_maint = MaintenanceModel::evaluate(&baseline, &afr_table)?;

    let mut report = SavingsReport::new(
        base_carbon.clone(),
        base_maint.server_afr(),
        buffer_fraction,
        rollup_policy,
    );

    for path in alternative_paths {
        let alternative = load_server_config(path)?;
        let alt_carbon = ServerCarbonModel::evaluate(&alternative, &params, &chassis)?;
        let alt_maint = MaintenanceModel::evaluate(&alternative, &afr_table)?;

        let aggregator = ClusterAggregator::new(
            &base_carbon,
            &base_maint,
            &alt_carbon,
            &alt_maint,
            buffer_fraction,
        )?;
        let cluster_savings = aggregator.evaluate_all(&clusters)?;
        let weighted = rollup(&cluster_savings, RollupPolicy::Weighted)?;
        let unweighted = rollup(&cluster_savings, RollupPolicy::Unweighted)?;

        report.designs.push(DesignReport {
            design: alternative.name.clone(),
            core_savings_pct: core_savings_pct(&base_carbon, &alt_carbon)?,
            server_savings_pct: server_savings_pct(&base_carbon, &alt_carbon)?,
            datacenter_savings_pct: datacenter_savings_pct(weighted, &base_carbon, &profile)?,
            server_afr: alt_maint.server_afr(),
            carbon: alt_carbon,
            clusters: cluster_savings,
            cluster_savings_weighted_pct: weighted,
            cluster_savings_unweighted_pct: unweighted,
        });
    }

    if !args.quiet {
        print!("{}", report.render(args.format)?);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_sweep(
    args: &CliArgs,
    baseline_path: &Path,
    alternative_paths: &[std::path::PathBuf],
    clusters_path: &Path,
    afr_path: &Path,
    params_path: Option<&Path>,
    ci_steps: &[f64],
    buffer_fraction: f64,
) -> Result<()> {
    let baseline = load_server_config(baseline_path)?;
    let alternatives: Vec<_> = alternative_paths
        .iter()
        .map(|p| load_server_config(p))
        .collect::<Result<_>>()?;
    let clusters = load_cluster_rows(clusters_path)?;
    let afr_table = load_afr_table(afr_path)?;
    let params = effective_params(None, params_path)?;
    let chassis = ChassisBaselines::from_reference(&baseline, &params)?;

    let scanner = SensitivityScanner::new(
        &baseline,
        &alternatives,
        &clusters,
        &afr_table,
        params,
        chassis,
        buffer_fraction,
    );
    let series = scanner.scan(ci_steps)?;

    if !args.quiet {
        print!("{}", render_sweep(&series, args.format)?);
    }
    Ok(())
}

#[derive(Serialize)]
struct IntensityOutput {
    scope: String,
    carbon_intensity_kg_per_kwh: f64,
}

fn cmd_intensity(args: &CliArgs, datacenters_path: &Path, region: Option<&str>) -> Result<()> {
    let records = load_datacenters(datacenters_path)?;
    let estimator = CarbonIntensityEstimator::new(records);

    let output = match region {
        Some(region) => IntensityOutput {
            scope: region.to_string(),
            carbon_intensity_kg_per_kwh: estimator.for_region(region)?,
        },
        None => IntensityOutput {
            scope: format!("average of {} regions", estimator.len()),
            carbon_intensity_kg_per_kwh: estimator.average()?,
        },
    };

    if args.quiet {
        return Ok(());
    }
    match args.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&output)
                .map_err(|e| rackcarbon::error::RackCarbonError::computation(e.to_string()))?
        ),
        OutputFormat::Csv => println!(
            "scope,carbon_intensity_kg_per_kwh\n{},{:.6}",
            output.scope, output.carbon_intensity_kg_per_kwh
        ),
        OutputFormat::Text => println!(
            "Carbon intensity ({}): {:.4} kgCO2e/kWh",
            output.scope, output.carbon_intensity_kg_per_kwh
        ),
    }
    Ok(())
}

#[derive(Serialize)]
struct FanFitOutput {
    slope: f64,
    intercept: f64,
    samples: usize,
    normalized: bool,
}

fn cmd_fan_fit(args: &CliArgs, samples_path: &Path, normalize: bool) -> Result<()> {
    let samples = load_fan_samples(samples_path)?;
    let fit = FanPowerFit::fit(&samples, normalize)?;

    let output = FanFitOutput {
        slope: fit.slope,
        intercept: fit.intercept,
        samples: samples.len(),
        normalized: normalize,
    };

    if args.quiet {
        return Ok(());
    }
    match args.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&output)
                .map_err(|e| rackcarbon::error::RackCarbonError::computation(e.to_string()))?
        ),
        OutputFormat::Csv => println!(
            "slope,intercept,samples,normalized\n{:.6},{:.4},{},{}",
            output.slope, output.intercept, output.samples, output.normalized
        ),
        OutputFormat::Text => {
            println!("Fan power fit over {} samples:", output.samples);
            println!("  Slope:     {:.6} W fan / W server", output.slope);
            println!("  Intercept: {:.4}", output.intercept);
            if normalize {
                println!("  (fan samples normalized by their maximum before fitting)");
            }
        }
    }
    Ok(())
}
