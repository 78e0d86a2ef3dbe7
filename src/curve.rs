//! Rate-distortion sample and curve types.
//!
//! An [`RdCurve`] is the validated input to the BD engine: at least four
//! operating points, each with a strictly positive rate (rates are
//! log-transformed before fitting) and a finite quality value.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum number of samples needed for a degree-3 fit.
pub const MIN_CURVE_POINTS: usize = 4;

/// A single (rate, quality) operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RdSample {
    /// Bitrate (kbps, bpp, bytes; any positive unit).
    pub rate: f64,
    /// Quality metric value, e.g. PSNR in dB.
    pub quality: f64,
}

impl RdSample {
    /// Create a new sample.
    #[must_use]
    pub fn new(rate: f64, quality: f64) -> Self {
        Self { rate, quality }
    }
}

impl From<(f64, f64)> for RdSample {
    fn from((rate, quality): (f64, f64)) -> Self {
        Self { rate, quality }
    }
}

/// One configuration's operating points.
///
/// Construction validates the sample count and value ranges; the curve is
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RdSample>", into = "Vec<RdSample>")]
pub struct RdCurve {
    samples: Vec<RdSample>,
}

impl RdCurve {
    /// Build a curve from samples.
    ///
    /// # Example
    ///
    /// ```
    /// use bd_eval::RdCurve;
    ///
    /// let curve = RdCurve::from_pairs(&[
    ///     (1000.0, 30.0),
    ///     (2000.0, 33.0),
    ///     (4000.0, 36.0),
    ///     (8000.0, 39.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(curve.len(), 4);
    ///
    /// assert!(RdCurve::from_pairs(&[(1000.0, 30.0), (2000.0, 33.0), (4000.0, 36.0)]).is_err());
    /// ```
    pub fn new(samples: Vec<RdSample>) -> Result<Self> {
        if samples.len() < MIN_CURVE_POINTS {
            return Err(Error::invalid(format!(
                "need at least {} points, got {}",
                MIN_CURVE_POINTS,
                samples.len()
            )));
        }
        for (i, s) in samples.iter().enumerate() {
            if !s.rate.is_finite() || s.rate <= 0.0 {
                return Err(Error::invalid(format!(
                    "rate at index {} must be positive and finite, got {}",
                    i, s.rate
                )));
            }
            if !s.quality.is_finite() {
                return Err(Error::invalid(format!(
                    "quality at index {} is not finite: {}",
                    i, s.quality
                )));
            }
        }
        Ok(Self { samples })
    }

    /// Build a curve from `(rate, quality)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        Self::new(pairs.iter().copied().map(RdSample::from).collect())
    }

    /// Samples in their original order.
    #[must_use]
    pub fn samples(&self) -> &[RdSample] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed curve; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Parallel `(log_rate, quality)` arrays sorted by quality ascending.
    ///
    /// Natural log is used for the rate axis.
    #[must_use]
    pub fn log_domain(&self) -> (Vec<f64>, Vec<f64>) {
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.quality.total_cmp(&b.quality));
        sorted.iter().map(|s| (s.rate.ln(), s.quality)).unzip()
    }
}

impl TryFrom<Vec<RdSample>> for RdCurve {
    type Error = Error;

    fn try_from(samples: Vec<RdSample>) -> Result<Self> {
        Self::new(samples)
    }
}

impl From<RdCurve> for Vec<RdSample> {
    fn from(curve: RdCurve) -> Self {
        curve.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_too_few_points() {
        let err = RdCurve::from_pairs(&[(1.0, 30.0), (2.0, 31.0), (3.0, 32.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidCurve { .. }));
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let zero = RdCurve::from_pairs(&[(0.0, 30.0), (2.0, 31.0), (3.0, 32.0), (4.0, 33.0)]);
        assert!(matches!(zero, Err(Error::InvalidCurve { .. })));

        let negative = RdCurve::from_pairs(&[(1.0, 30.0), (-2.0, 31.0), (3.0, 32.0), (4.0, 33.0)]);
        assert!(matches!(negative, Err(Error::InvalidCurve { .. })));
    }

    #[test]
    fn test_rejects_nan_quality() {
        let curve = RdCurve::from_pairs(&[(1.0, 30.0), (2.0, f64::NAN), (3.0, 32.0), (4.0, 33.0)]);
        assert!(curve.is_err());
    }

    #[test]
    fn test_log_domain_sorted_by_quality() {
        let curve = RdCurve::from_pairs(&[
            (4000.0, 40.0),
            (1000.0, 30.0),
            (8000.0, 45.0),
            (2000.0, 35.0),
        ])
        .unwrap();

        let (log_rate, quality) = curve.log_domain();
        assert_eq!(quality, vec![30.0, 35.0, 40.0, 45.0]);
        assert!((log_rate[0] - 1000f64.ln()).abs() < 1e-12);
        assert!((log_rate[3] - 8000f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_serde_validates() {
        let json = r#"[{"rate":1.0,"quality":30.0},{"rate":2.0,"quality":31.0}]"#;
        assert!(serde_json::from_str::<RdCurve>(json).is_err());
    }
}
