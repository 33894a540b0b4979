//! Grid carbon intensity estimation
//!
//! Derives effective carbon intensity figures from a datacenter dataset
//! by blending each region's renewable and grid intensities according to
//! its renewable energy share.

use crate::data::DatacenterRecord;
use crate::error::{RackCarbonError, Result};

/// Estimator over a datacenter intensity dataset
///
/// Pure function of its input table; the records are never modified.
#[derive(Debug, Clone)]
pub struct CarbonIntensityEstimator {
    records: Vec<DatacenterRecord>,
}

impl CarbonIntensityEstimator {
    /// Create an estimator over the given records
    pub fn new(records: Vec<DatacenterRecord>) -> Self {
        Self { records }
    }

    /// Effective carbon intensity of one record in kgCO2e/kWh.
    ///
    /// Blends renewable and grid intensity by the renewable share, then
    /// converts from gCO2e/kWh.
    pub fn record_intensity(record: &DatacenterRecord) -> f64 {
        let renewable_fraction = record.renewable_pct / 100.0;
        let blended_g = renewable_fraction * record.renewable_intensity
            + (1.0 - renewable_fraction) * record.grid_intensity;
        blended_g / 1000.0
    }

    /// Unweighted arithmetic mean intensity across all records, kgCO2e/kWh
    pub fn average(&self) -> Result<f64> {
        if self.records.is_empty() {
            return Err(RackCarbonError::input(
                "cannot average an empty datacenter dataset",
            ));
        }
        let sum: f64 = self.records.iter().map(Self::record_intensity).sum();
        Ok(sum / self.records.len() as f64)
    }

    /// Intensity for a single region, kgCO2e/kWh
    pub fn for_region(&self, region: &str) -> Result<f64> {
        self.records
            .iter()
            .find(|r| r.region == region)
            .map(Self::record_intensity)
            .ok_or_else(|| RackCarbonError::UnknownRegion(region.to_string()))
    }

    /// Number of records in the dataset
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the dataset has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: &str, renewable_pct: f64, renewable: f64, grid: f64) -> DatacenterRecord {
        DatacenterRecord {
            region: region.to_string(),
            renewable_pct,
            renewable_intensity: renewable,
            grid_intensity: grid,
        }
    }

    #[test]
    fn test_record_intensity_blend() {
        // 50% renewable at 10 g, 50% grid at 400 g -> 205 g -> 0.205 kg
        let r = record("x", 50.0, 10.0, 400.0);
        let ci = CarbonIntensityEstimator::record_intensity(&r);
        assert!((ci - 0.205).abs() < 1e-12);
    }

    #[test]
    fn test_fully_renewable_record() {
        let r = record("x", 100.0, 12.0, 400.0);
        let ci = CarbonIntensityEstimator::record_intensity(&r);
        assert!((ci - 0.012).abs() < 1e-12);
    }

    #[test]
    fn test_average() {
        let estimator = CarbonIntensityEstimator::new(vec![
            record("a", 0.0, 0.0, 400.0),
            record("b", 0.0, 0.0, 200.0),
        ]);
        let avg = estimator.average().unwrap();
        assert!((avg - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_average_empty_fails() {
        let estimator = CarbonIntensityEstimator::new(Vec::new());
        assert!(estimator.average().is_err());
    }

    #[test]
    fn test_region_lookup() {
        let estimator = CarbonIntensityEstimator::new(vec![record("us-west", 40.0, 12.0, 380.0)]);
        assert!(estimator.for_region("us-west").is_ok());

        let err = estimator.for_region("mars-1").unwrap_err();
        assert!(err.is_lookup_failure());
    }
}
