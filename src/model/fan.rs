//! Linear fan power model
//!
//! Fits a first-degree polynomial to measured (server power, fan power)
//! samples by ordinary least squares. The slope is the marginal fan power
//! per watt of server power and is the value consumed downstream; the
//! intercept is informational.

use crate::data::FanSample;
use crate::error::{RackCarbonError, Result};

/// Result of a fan power fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanPowerFit {
    /// Marginal fan power per watt of server power
    pub slope: f64,
    /// Fan power at zero server power (informational)
    pub intercept: f64,
}

impl FanPowerFit {
    /// Fit the linear model to the given samples.
    ///
    /// With `normalize`, fan power samples are divided by their maximum
    /// before fitting, which changes the slope's units; callers must use
    /// the same convention for the baseline power they scale against.
    ///
    /// Requires at least 2 samples with distinct server power values.
    pub fn fit(samples: &[FanSample], normalize: bool) -> Result<Self> {
        if samples.len() < 2 {
            return Err(RackCarbonError::input(format!(
                "fan power fit requires at least 2 samples, got {}",
                samples.len()
            )));
        }

        let fan_values: Vec<f64> = if normalize {
            let max = samples
                .iter()
                .map(|s| s.fan_power_w)
                .fold(f64::NEG_INFINITY, f64::max);
            if max <= 0.0 {
                return Err(RackCarbonError::input(
                    "cannot normalize fan samples with non-positive maximum",
                ));
            }
            samples.iter().map(|s| s.fan_power_w / max).collect()
        } else {
            samples.iter().map(|s| s.fan_power_w).collect()
        };

        let n = samples.len() as f64;
        let mean_x: f64 = samples.iter().map(|s| s.server_power_w).sum::<f64>() / n;
        let mean_y: f64 = fan_values.iter().sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (sample, &fan) in samples.iter().zip(&fan_values) {
            let dx = sample.server_power_w - mean_x;
            sxx += dx * dx;
            sxy += dx * (fan - mean_y);
        }

        if sxx == 0.0 {
            return Err(RackCarbonError::input(
                "fan power fit requires at least 2 distinct server power values",
            ));
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        tracing::debug!("fan power fit: slope={:.6} intercept={:.3}", slope, intercept);

        Ok(Self { slope, intercept })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(server: f64, fan: f64) -> FanSample {
        FanSample {
            server_power_w: server,
            fan_power_w: fan,
        }
    }

    #[test]
    fn test_exact_line_recovered() {
        // fan = 0.05 * server + 3
        let samples = vec![
            sample(200.0, 13.0),
            sample(400.0, 23.0),
            sample(600.0, 33.0),
        ];
        let fit = FanPowerFit::fit(&samples, false).unwrap();
        assert!((fit.slope - 0.05).abs() < 1e-12);
        assert!((fit.intercept - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_points_suffice() {
        let samples = vec![sample(100.0, 10.0), sample(300.0, 30.0)];
        let fit = FanPowerFit::fit(&samples, false).unwrap();
        assert!((fit.slope - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_too_few_samples() {
        let samples = vec![sample(100.0, 10.0)];
        assert!(FanPowerFit::fit(&samples, false).is_err());
    }

    #[test]
    fn test_degenerate_x_values() {
        let samples = vec![sample(100.0, 10.0), sample(100.0, 20.0)];
        assert!(FanPowerFit::fit(&samples, false).is_err());
    }

    #[test]
    fn test_normalized_slope_scaling() {
        // Normalizing by the max fan power (30) scales the slope by 1/30
        let samples = vec![
            sample(200.0, 10.0),
            sample(400.0, 20.0),
            sample(600.0, 30.0),
        ];
        let raw = FanPowerFit::fit(&samples, false).unwrap();
        let normalized = FanPowerFit::fit(&samples, true).unwrap();
        assert!((normalized.slope - raw.slope / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_all_zero_fans() {
        let samples = vec![sample(200.0, 0.0), sample(400.0, 0.0)];
        assert!(FanPowerFit::fit(&samples, true).is_err());
    }
}
