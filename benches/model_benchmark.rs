//! Performance benchmarks for RackCarbon
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rackcarbon::aggregate::{rollup, ClusterAggregator, SensitivityScanner};
use rackcarbon::config::{ParameterSet, RollupPolicy};
use rackcarbon::data::{AfrTable, ClusterRow, Component, RackUnits, ServerConfig};
use rackcarbon::model::{ChassisBaselines, MaintenanceModel, ServerCarbonModel};

/// Build a server config with the given number of components
fn make_config(name: &str, components: usize, power_w: f64) -> ServerConfig {
    ServerConfig {
        name: name.to_string(),
        rack_units: RackUnits::U2,
        sellable_cores: 96,
        lifetime_years: 6.0,
        components: (0..components)
            .map(|i| Component {
                name: format!("component_{}", i),
                class: if i % 2 == 0 { "CPU" } else { "DIMM" }.to_string(),
                quantity: 1,
                power_w: Some(power_w / components as f64),
                embodied_kg: Some(12.0),
            })
            .collect(),
    }
}

fn afr_table() -> AfrTable {
    AfrTable::from_entries([("CPU".to_string(), 0.02), ("DIMM".to_string(), 0.01)])
}

fn make_clusters(count: usize) -> Vec<ClusterRow> {
    (0..count)
        .map(|i| ClusterRow {
            original_size: 50 + (i as u64 % 200),
            new_baseline: 20 + (i as u64 % 50),
            new_greensku: 30 + (i as u64 % 150),
        })
        .collect()
}

fn bench_server_model(c: &mut Criterion) {
    let params = ParameterSet::default();
    let mut group = c.benchmark_group("server_model");

    for components in [8usize, 32, 128] {
        let config = make_config("bench", components, 900.0);
        let chassis = ChassisBaselines::default();
        group.throughput(Throughput::Elements(components as u64));
        group.bench_with_input(
            BenchmarkId::new("evaluate", components),
            &config,
            |b, config| {
                b.iter(|| {
                    ServerCarbonModel::evaluate(black_box(config), &params, &chassis).unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_cluster_aggregation(c: &mut Criterion) {
    let params = ParameterSet::default();
    let baseline = make_config("baseline", 16, 1000.0);
    let alternative = make_config("alternative", 16, 800.0);
    let table = afr_table();
    let chassis = ChassisBaselines::from_reference(&baseline, &params).unwrap();

    let base_carbon = ServerCarbonModel::evaluate(&baseline, &params, &chassis).unwrap();
    let alt_carbon = ServerCarbonModel::evaluate(&alternative, &params, &chassis).unwrap();
    let base_maint = MaintenanceModel::evaluate(&baseline, &table).unwrap();
    let alt_maint = MaintenanceModel::evaluate(&alternative, &table).unwrap();

    let mut group = c.benchmark_group("cluster_aggregation");
    for rows in [100usize, 1000, 10000] {
        let clusters = make_clusters(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(
            BenchmarkId::new("evaluate_all", rows),
            &clusters,
            |b, clusters| {
                b.iter(|| {
                    let aggregator = ClusterAggregator::new(
                        &base_carbon,
                        &base_maint,
                        &alt_carbon,
                        &alt_maint,
                        0.1,
                    )
                    .unwrap();
                    let savings = aggregator.evaluate_all(black_box(clusters)).unwrap();
                    rollup(&savings, RollupPolicy::Weighted).unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_sensitivity_sweep(c: &mut Criterion) {
    let params = ParameterSet::default();
    let baseline = make_config("baseline", 16, 1000.0);
    let alternatives = vec![make_config("alternative", 16, 800.0)];
    let clusters = make_clusters(200);
    let table = afr_table();
    let chassis = ChassisBaselines::from_reference(&baseline, &params).unwrap();

    let steps: Vec<f64> = (1..=50).map(|i| i as f64 * 0.01).collect();

    c.bench_function("sweep_50_steps_200_clusters", |b| {
        b.iter(|| {
            let scanner = SensitivityScanner::new(
                &baseline,
                &alternatives,
                &clusters,
                &table,
                params,
                chassis,
                0.1,
            );
            scanner.scan(black_box(&steps)).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_server_model,
    bench_cluster_aggregation,
    bench_sensitivity_sweep
);
criterion_main!(benches);
