//! Monotone piecewise cubic Hermite interpolation (Fritsch-Carlson).

use super::quadrature::{self, SIMPSON_MAX_DEPTH, SIMPSON_TOLERANCE};
use crate::error::{Error, Result};

/// Shape-preserving piecewise cubic through every knot.
///
/// Between two consecutive knots the curve stays within the knot values, so
/// monotone input data yields a monotone curve.
#[derive(Debug, Clone, PartialEq)]
pub struct MonotoneCubic {
    x: Vec<f64>,
    y: Vec<f64>,
    slopes: Vec<f64>,
}

impl MonotoneCubic {
    /// Build the interpolant; `x` must be sorted and strictly increasing.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() || x.len() < 3 {
            return Err(Error::invalid("monotone cubic needs at least 3 matching knots"));
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::invalid("knots must be strictly increasing"));
        }
        let slopes = fritsch_carlson_slopes(&x, &y);
        Ok(Self { x, y, slopes })
    }

    /// Evaluate at `x`; outside the knots the end segment is extended.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let k = self.segment(x);
        let h = self.x[k + 1] - self.x[k];
        let t = (x - self.x[k]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        (2.0 * t3 - 3.0 * t2 + 1.0) * self.y[k]
            + (t3 - 2.0 * t2 + t) * h * self.slopes[k]
            + (-2.0 * t3 + 3.0 * t2) * self.y[k + 1]
            + (t3 - t2) * h * self.slopes[k + 1]
    }

    /// Integral over `[low, high]` by adaptive Simpson quadrature.
    #[must_use]
    pub fn integrate(&self, low: f64, high: f64) -> f64 {
        quadrature::adaptive_simpson(
            |x| self.evaluate(x),
            low,
            high,
            SIMPSON_TOLERANCE,
            SIMPSON_MAX_DEPTH,
        )
    }

    /// Knot range.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Derivative estimates at each knot.
    #[must_use]
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }

    /// Knots as `(x, y)` slices.
    #[must_use]
    pub fn knots(&self) -> (&[f64], &[f64]) {
        (&self.x, &self.y)
    }

    fn segment(&self, x: f64) -> usize {
        let last = self.x.len() - 2;
        self.x.partition_point(|&k| k <= x).saturating_sub(1).min(last)
    }
}

/// Knot derivatives that keep each segment monotone.
fn fritsch_carlson_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        // Local extremum or flat segment: clamp.
        if delta[k - 1] * delta[k] <= 0.0 {
            continue;
        }
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        d[k] = (w1 + w2) / (w1 / delta[k - 1] + w2 / delta[k]);
    }

    d[0] = end_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

/// Three-point end derivative, limited so the end segment cannot overshoot.
fn end_slope(h0: f64, h1: f64, delta0: f64, delta1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * delta0 - h0 * delta1) / (h0 + h1);
    if delta0 == 0.0 || d.signum() != delta0.signum() {
        0.0
    } else if delta0.signum() != delta1.signum() && d.abs() > 3.0 * delta0.abs() {
        3.0 * delta0
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knots() -> (Vec<f64>, Vec<f64>) {
        // Steep then flat: a plain cubic spline overshoots here.
        (
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            vec![0.0, 0.1, 0.2, 5.0, 5.1, 5.2],
        )
    }

    #[test]
    fn test_passes_through_knots() {
        let (x, y) = knots();
        let m = MonotoneCubic::new(x.clone(), y.clone()).unwrap();
        for (xi, yi) in x.iter().zip(&y) {
            assert!((m.evaluate(*xi) - yi).abs() < 1e-12);
        }
    }

    #[test]
    fn test_no_overshoot_between_knots() {
        let (x, y) = knots();
        let m = MonotoneCubic::new(x.clone(), y.clone()).unwrap();

        for k in 0..x.len() - 1 {
            let lo = y[k].min(y[k + 1]);
            let hi = y[k].max(y[k + 1]);
            for step in 0..=100 {
                let xv = x[k] + (x[k + 1] - x[k]) * f64::from(step) / 100.0;
                let v = m.evaluate(xv);
                assert!(v >= lo - 1e-12 && v <= hi + 1e-12, "overshoot at {xv}: {v}");
            }
        }
    }

    #[test]
    fn test_monotone_increasing() {
        let (x, y) = knots();
        let m = MonotoneCubic::new(x, y).unwrap();
        let mut prev = m.evaluate(0.0);
        for step in 1..=500 {
            let v = m.evaluate(5.0 * f64::from(step) / 500.0);
            assert!(v >= prev - 1e-12);
            prev = v;
        }
    }

    #[test]
    fn test_local_extremum_clamped() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![0.0, 2.0, 1.0, 3.0];
        let m = MonotoneCubic::new(x, y).unwrap();
        assert_eq!(m.slopes()[1], 0.0);
        assert_eq!(m.slopes()[2], 0.0);
    }

    #[test]
    fn test_interior_slope_harmonic_mean() {
        // Equal spacing reduces to the harmonic mean of adjacent secants.
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![0.0, 1.0, 4.0, 9.0];
        let m = MonotoneCubic::new(x, y).unwrap();
        let expected = 2.0 / (1.0 / 1.0 + 1.0 / 3.0);
        assert!((m.slopes()[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_linear_data_is_exact() {
        let x = vec![0.0, 1.0, 3.0, 4.0];
        let y = vec![1.0, 3.0, 7.0, 9.0];
        let m = MonotoneCubic::new(x, y).unwrap();
        assert!(m.slopes().iter().all(|d| (d - 2.0).abs() < 1e-12));
        // integral of 2x + 1 over [0.5, 3.5]
        assert!((m.integrate(0.5, 3.5) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_unsorted() {
        assert!(MonotoneCubic::new(vec![0.0, 2.0, 1.0], vec![0.0, 1.0, 2.0]).is_err());
    }
}
