//! File loaders for configs and reference datasets
//!
//! Server configurations and parameter overrides are JSON documents.
//! The tabular reference datasets (datacenter intensity, fan samples,
//! cluster sizes, AFR tables) are small header-carrying CSV files parsed
//! line by line; every malformed field is surfaced with its path and
//! line number instead of being coerced or skipped.

use crate::config::ParameterOverrides;
use crate::data::{AfrTable, ClusterRow, DatacenterRecord, FanSample, ServerConfig};
use crate::error::{IoResultExt, RackCarbonError, Result};
use std::path::Path;

/// Load and validate a server configuration from JSON
pub fn load_server_config(path: &Path) -> Result<ServerConfig> {
    let text = std::fs::read_to_string(path).with_path(path)?;
    let config: ServerConfig =
        serde_json::from_str(&text).map_err(|e| RackCarbonError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
    config.validate()?;
    tracing::debug!(
        "loaded server config '{}' ({} components)",
        config.name,
        config.components.len()
    );
    Ok(config)
}

/// Load parameter overrides from JSON
///
/// Unknown keys fail deserialization rather than being ignored.
pub fn load_parameter_overrides(path: &Path) -> Result<ParameterOverrides> {
    let text = std::fs::read_to_string(path).with_path(path)?;
    serde_json::from_str(&text).map_err(|e| RackCarbonError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the datacenter intensity dataset
///
/// Expected header: `region,renewable_pct,renewable_intensity,grid_intensity`
pub fn load_datacenters(path: &Path) -> Result<Vec<DatacenterRecord>> {
    let mut records = Vec::new();
    for (line_no, fields) in
        read_csv(path, "region,renewable_pct,renewable_intensity,grid_intensity", 4)?
    {
        let record = DatacenterRecord {
            region: fields[0].to_string(),
            renewable_pct: parse_f64(path, line_no, "renewable_pct", &fields[1])?,
            renewable_intensity: parse_f64(path, line_no, "renewable_intensity", &fields[2])?,
            grid_intensity: parse_f64(path, line_no, "grid_intensity", &fields[3])?,
        };
        if !(0.0..=100.0).contains(&record.renewable_pct) {
            return Err(RackCarbonError::malformed(
                path,
                line_no,
                format!("renewable_pct {} outside [0, 100]", record.renewable_pct),
            ));
        }
        if record.renewable_intensity < 0.0 || record.grid_intensity < 0.0 {
            return Err(RackCarbonError::malformed(
                path,
                line_no,
                "carbon intensities must be non-negative",
            ));
        }
        records.push(record);
    }
    Ok(records)
}

/// Load fan power samples
///
/// Expected header: `server_power_w,fan_power_w`. The fan model itself
/// enforces the minimum sample count, but an empty file is rejected here.
pub fn load_fan_samples(path: &Path) -> Result<Vec<FanSample>> {
    let mut samples = Vec::new();
    for (line_no, fields) in read_csv(path, "server_power_w,fan_power_w", 2)? {
        samples.push(FanSample {
            server_power_w: parse_f64(path, line_no, "server_power_w", &fields[0])?,
            fan_power_w: parse_f64(path, line_no, "fan_power_w", &fields[1])?,
        });
    }
    if samples.is_empty() {
        return Err(RackCarbonError::input(format!(
            "no fan samples in '{}'",
            path.display()
        )));
    }
    Ok(samples)
}

/// Load cluster size records
///
/// Expected header: `original_size,new_baseline,new_greensku`
pub fn load_cluster_rows(path: &Path) -> Result<Vec<ClusterRow>> {
    let mut rows = Vec::new();
    for (line_no, fields) in read_csv(path, "original_size,new_baseline,new_greensku", 3)? {
        rows.push(ClusterRow {
            original_size: parse_count(path, line_no, "original_size", &fields[0])?,
            new_baseline: parse_count(path, line_no, "new_baseline", &fields[1])?,
            new_greensku: parse_count(path, line_no, "new_greensku", &fields[2])?,
        });
    }
    Ok(rows)
}

/// Load the component failure rate table
///
/// Expected header: `component_class,afr`
pub fn load_afr_table(path: &Path) -> Result<AfrTable> {
    let mut table = AfrTable::default();
    for (line_no, fields) in read_csv(path, "component_class,afr", 2)? {
        let afr = parse_f64(path, line_no, "afr", &fields[1])?;
        if afr < 0.0 {
            return Err(RackCarbonError::malformed(
                path,
                line_no,
                format!("negative AFR {} for class '{}'", afr, fields[0]),
            ));
        }
        table.insert(fields[0].clone(), afr);
    }
    Ok(table)
}

/// Read a CSV file, check its header, and return trimmed data rows
/// with their 1-based line numbers. Blank lines are skipped.
fn read_csv(
    path: &Path,
    expected_header: &str,
    expected_fields: usize,
) -> Result<Vec<(usize, Vec<String>)>> {
    let text = std::fs::read_to_string(path).with_path(path)?;
    let mut lines = text.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line.trim().to_string(),
            None => {
                return Err(RackCarbonError::input(format!(
                    "'{}' is empty",
                    path.display()
                )))
            }
        }
    };
    if header != expected_header {
        return Err(RackCarbonError::input(format!(
            "'{}' has header '{}', expected '{}'",
            path.display(),
            header,
            expected_header
        )));
    }

    let mut rows = Vec::new();
    for (index, line) in lines {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
        if fields.len() != expected_fields {
            return Err(RackCarbonError::malformed(
                path,
                line_no,
                format!("expected {} fields, got {}", expected_fields, fields.len()),
            ));
        }
        rows.push((line_no, fields));
    }
    Ok(rows)
}

fn parse_f64(path: &Path, line_no: usize, field: &str, value: &str) -> Result<f64> {
    let parsed: f64 = value.parse().map_err(|_| {
        RackCarbonError::malformed(path, line_no, format!("invalid {} '{}'", field, value))
    })?;
    if !parsed.is_finite() {
        return Err(RackCarbonError::malformed(
            path,
            line_no,
            format!("non-finite {} '{}'", field, value),
        ));
    }
    Ok(parsed)
}

fn parse_count(path: &Path, line_no: usize, field: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| {
        RackCarbonError::malformed(
            path,
            line_no,
            format!("invalid {} '{}' (expected non-negative integer)", field, value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_datacenters() {
        let file = write_file(
            "region,renewable_pct,renewable_intensity,grid_intensity\n\
             us-west,40,12.0,380.0\n\
             eu-north,85,10.5,110.0\n",
        );
        let records = load_datacenters(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region, "us-west");
        assert_eq!(records[1].renewable_pct, 85.0);
    }

    #[test]
    fn test_datacenter_pct_out_of_range() {
        let file = write_file(
            "region,renewable_pct,renewable_intensity,grid_intensity\n\
             us-west,140,12.0,380.0\n",
        );
        let err = load_datacenters(file.path()).unwrap_err();
        assert!(err.to_string().contains("renewable_pct"));
    }

    #[test]
    fn test_bad_header_rejected() {
        let file = write_file("region,pct\nus-west,40\n");
        assert!(load_datacenters(file.path()).is_err());
    }

    #[test]
    fn test_load_cluster_rows() {
        let file = write_file(
            "original_size,new_baseline,new_greensku\n\
             95,45,50\n\
             \n\
             200,100,100\n",
        );
        let rows = load_cluster_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].original_size, 95);
        assert_eq!(rows[1].new_greensku, 100);
    }

    #[test]
    fn test_negative_count_rejected() {
        let file = write_file("original_size,new_baseline,new_greensku\n-5,0,0\n");
        let err = load_cluster_rows(file.path()).unwrap_err();
        assert!(err.to_string().contains("non-negative integer"));
    }

    #[test]
    fn test_load_afr_table() {
        let file = write_file("component_class,afr\nCPU,0.02\nDIMM,0.04\n");
        let table = load_afr_table(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("DIMM").unwrap(), 0.04);
    }

    #[test]
    fn test_load_fan_samples_line_numbers() {
        let file = write_file("server_power_w,fan_power_w\n400,20\nbogus,25\n");
        let err = load_fan_samples(file.path()).unwrap_err();
        match err {
            RackCarbonError::Malformed { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_server_config_roundtrip() {
        let file = write_file(
            r#"{
                "name": "baseline",
                "rack_units": "2U",
                "sellable_cores": 96,
                "components": [
                    {"name": "cpu0", "class": "CPU", "quantity": 2,
                     "power_w": 180.0, "embodied_kg": 25.0}
                ]
            }"#,
        );
        let config = load_server_config(file.path()).unwrap();
        assert_eq!(config.name, "baseline");
        assert_eq!(config.lifetime_years, 6.0);
    }

    #[test]
    fn test_override_file_unknown_key() {
        let file = write_file(r#"{"pue": 1.4, "wattage": 900}"#);
        assert!(load_parameter_overrides(file.path()).is_err());
    }
}
