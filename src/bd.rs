//! Bjontegaard-Delta computation.
//!
//! BD compares two rate-distortion curves over the range where both are
//! defined. Each curve is fitted with a continuous model, integrated over the
//! shared interval, and the averaged difference is reported either as a
//! quality delta (dB for PSNR) or as a percentage rate change.
//!
//! The second curve is measured relative to the first: a negative
//! [`BdMode::RateSaving`] result means curve 2 needs less rate than curve 1
//! for the same quality.
//!
//! ## Procedure
//!
//! 1. Sort each curve's samples by quality, take `ln(rate)`.
//! 2. Pick the independent axis: log-rate for [`BdMode::QualityDifference`],
//!    quality for [`BdMode::RateSaving`].
//! 3. Intersect the two domains; an empty intersection is an error.
//! 4. Fit both curves with the chosen [`Interpolation`] and average each over
//!    the intersection.
//! 5. Quality mode returns `avg2 - avg1`; rate mode returns
//!    `(exp(avg2 - avg1) - 1) * 100`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::curve::RdCurve;
use crate::error::{Error, Result};
pub use crate::interpolation::Interpolation;
use crate::interpolation::FittedCurve;

/// Default number of points in [`FittedSamples`].
pub const DEFAULT_FITTED_SAMPLES: usize = 100;

/// Which BD figure to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BdMode {
    /// Average quality difference at equal rate (BD-PSNR).
    QualityDifference,
    /// Average rate change in percent at equal quality (BD-rate).
    #[default]
    RateSaving,
}

impl BdMode {
    /// Canonical token for this mode.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::QualityDifference => "quality_difference",
            Self::RateSaving => "rate_saving",
        }
    }

    /// Unit suffix of the result.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Self::QualityDifference => "dB",
            Self::RateSaving => "%",
        }
    }
}

impl fmt::Display for BdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BdMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "quality_difference" | "quality" | "psnr" | "bd_psnr" => Ok(Self::QualityDifference),
            "rate_saving" | "rate" | "bd_rate" => Ok(Self::RateSaving),
            other => Err(Error::invalid(format!("unknown BD mode '{}'", other))),
        }
    }
}

/// Options for [`compute_bd_detailed`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BdOptions {
    /// Quality or rate figure.
    pub mode: BdMode,
    /// Curve-fitting strategy.
    pub interpolation: Interpolation,
    /// Points per fitted curve in the report (minimum 2).
    pub fitted_samples: usize,
}

impl Default for BdOptions {
    fn default() -> Self {
        Self {
            mode: BdMode::default(),
            interpolation: Interpolation::default(),
            fitted_samples: DEFAULT_FITTED_SAMPLES,
        }
    }
}

impl BdOptions {
    /// Options for the given mode and strategy.
    #[must_use]
    pub fn new(mode: BdMode, interpolation: Interpolation) -> Self {
        Self {
            mode,
            interpolation,
            ..Self::default()
        }
    }

    /// Set the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: BdMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the interpolation strategy.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set how many fitted points to report per curve.
    #[must_use]
    pub fn with_fitted_samples(mut self, count: usize) -> Self {
        self.fitted_samples = count.max(2);
        self
    }
}

/// Closed integration interval on the independent axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl Interval {
    /// Overlap of two `(min, max)` domains.
    pub fn intersect(a: (f64, f64), b: (f64, f64)) -> Result<Self> {
        let low = a.0.max(b.0);
        let high = a.1.min(b.1);
        if low >= high {
            return Err(Error::NoOverlap { low, high });
        }
        Ok(Self { low, high })
    }

    /// Interval width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// A fitted curve sampled for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedSamples {
    /// Independent-axis values (log-rate or quality, depending on mode).
    pub x: Vec<f64>,
    /// Fitted values.
    pub y: Vec<f64>,
}

/// BD value plus the data needed to visualize it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BdReport {
    /// The BD figure (dB or percent).
    pub value: f64,
    /// Mode used.
    pub mode: BdMode,
    /// Strategy used.
    pub interpolation: Interpolation,
    /// Shared integration interval.
    pub interval: Interval,
    /// Per-curve average of the fitted model over the interval.
    pub averages: [f64; 2],
    /// Fitted curves sampled over their own domains.
    pub fitted: [FittedSamples; 2],
}

/// Compute the BD figure of `curve2` relative to `curve1`.
///
/// # Example
///
/// ```
/// use bd_eval::{BdMode, Interpolation, RdCurve, compute_bd};
///
/// let anchor = RdCurve::from_pairs(&[
///     (1000.0, 30.0),
///     (2000.0, 33.0),
///     (4000.0, 36.0),
///     (8000.0, 39.0),
/// ])
/// .unwrap();
/// // Same quality at 10% less rate everywhere.
/// let test = RdCurve::from_pairs(&[
///     (900.0, 30.0),
///     (1800.0, 33.0),
///     (3600.0, 36.0),
///     (7200.0, 39.0),
/// ])
/// .unwrap();
///
/// let bd = compute_bd(&anchor, &test, BdMode::RateSaving, Interpolation::GlobalCubic).unwrap();
/// assert!((bd + 10.0).abs() < 1e-6);
/// ```
pub fn compute_bd(
    curve1: &RdCurve,
    curve2: &RdCurve,
    mode: BdMode,
    interpolation: Interpolation,
) -> Result<f64> {
    let fit1 = fit_curve(curve1, mode, interpolation)?;
    let fit2 = fit_curve(curve2, mode, interpolation)?;
    let interval = Interval::intersect(fit1.domain(), fit2.domain())?;
    let (value, _) = delta(&fit1, &fit2, interval, mode);
    Ok(value)
}

/// Same as [`compute_bd`], also returning interval and fitted samples.
pub fn compute_bd_detailed(
    curve1: &RdCurve,
    curve2: &RdCurve,
    options: &BdOptions,
) -> Result<BdReport> {
    let fit1 = fit_curve(curve1, options.mode, options.interpolation)?;
    let fit2 = fit_curve(curve2, options.mode, options.interpolation)?;
    let interval = Interval::intersect(fit1.domain(), fit2.domain())?;
    let (value, averages) = delta(&fit1, &fit2, interval, options.mode);

    let sample = |fit: &FittedCurve| {
        let (x, y) = fit.sample(options.fitted_samples);
        FittedSamples { x, y }
    };

    Ok(BdReport {
        value,
        mode: options.mode,
        interpolation: options.interpolation,
        interval,
        averages,
        fitted: [sample(&fit1), sample(&fit2)],
    })
}

/// Fit one curve on the axis pair the mode calls for.
pub fn fit_curve(curve: &RdCurve, mode: BdMode, interpolation: Interpolation) -> Result<FittedCurve> {
    let (log_rate, quality) = curve.log_domain();
    match mode {
        BdMode::QualityDifference => FittedCurve::fit(interpolation, &log_rate, &quality),
        BdMode::RateSaving => FittedCurve::fit(interpolation, &quality, &log_rate),
    }
}

fn delta(fit1: &FittedCurve, fit2: &FittedCurve, interval: Interval, mode: BdMode) -> (f64, [f64; 2]) {
    let avg1 = fit1.integrate(interval.low, interval.high) / interval.width();
    let avg2 = fit2.integrate(interval.low, interval.high) / interval.width();
    let diff = avg2 - avg1;

    let value = match mode {
        BdMode::QualityDifference => diff,
        BdMode::RateSaving => (diff.exp() - 1.0) * 100.0,
    };
    (value, [avg1, avg2])
}
