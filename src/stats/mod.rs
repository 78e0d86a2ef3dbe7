//! Descriptive statistics over BD results.
//!
//! Used to condense a column of per-sequence BD values into a single line:
//! - [`Summary`]: count, mean, median, spread, percentiles
//! - [`mean`], [`median`], [`std_dev`], [`percentile`]

use serde::{Deserialize, Serialize};

/// Descriptive statistics for a set of BD values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values.
    pub count: usize,
    /// Mean value.
    pub mean: f64,
    /// Median value.
    pub median: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl Summary {
    /// Compute summary statistics; non-finite values are ignored.
    ///
    /// Returns `None` if no finite values remain.
    #[must_use]
    pub fn compute(values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        if sorted.is_empty() {
            return None;
        }

        Some(Self {
            count: sorted.len(),
            mean: mean(&sorted),
            median: percentile_sorted(&sorted, 0.5),
            std_dev: std_dev(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p5: percentile_sorted(&sorted, 0.05),
            p25: percentile_sorted(&sorted, 0.25),
            p75: percentile_sorted(&sorted, 0.75),
            p95: percentile_sorted(&sorted, 0.95),
        })
    }
}

/// Arithmetic mean; 0 for an empty slice.
///
/// # Example
///
/// ```
/// use bd_eval::stats::mean;
///
/// assert!((mean(&[-10.0, -20.0, -30.0]) + 20.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; even-length slices average the two middle values.
///
/// # Example
///
/// ```
/// use bd_eval::stats::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
/// assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 0.5)
}

/// Sample standard deviation (N-1 denominator); 0 for fewer than two values.
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Percentile with linear interpolation between ranks (R-7); `p` in 0..=1.
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> f64 {
    percentile_sorted(&sorted_finite(values), p)
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let idx = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = idx.floor() as usize;
            let upper = idx.ceil() as usize;
            let frac = idx - lower as f64;
            sorted[lower] * (1.0 - frac) + sorted[upper] * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_compute() {
        let summary = Summary::compute(&[-12.0, -8.0, -10.0, -6.0, -14.0]).unwrap();

        assert_eq!(summary.count, 5);
        assert!((summary.mean + 10.0).abs() < 1e-12);
        assert!((summary.median + 10.0).abs() < 1e-12);
        assert_eq!(summary.min, -14.0);
        assert_eq!(summary.max, -6.0);
        assert!((summary.p25 + 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_skips_nan() {
        let summary = Summary::compute(&[1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!(summary.count, 2);
        assert!(Summary::compute(&[f64::NAN]).is_none());
        assert!(Summary::compute(&[]).is_none());
    }

    #[test]
    fn test_percentile() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 0.5), 3.0);
        assert_eq!(percentile(&values, 1.0), 5.0);
        assert!((percentile(&values, 0.1) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&values) - 2.138).abs() < 0.001);
        assert_eq!(std_dev(&[1.0]), 0.0);
    }
}
