//! Curve fitting for BD integration.
//!
//! Two interchangeable strategies turn a set of `(x, y)` samples into a
//! continuous curve that can be evaluated and integrated:
//!
//! - [`CubicPolynomial`]: one least-squares degree-3 polynomial through all
//!   samples, integrated in closed form.
//! - [`MonotoneCubic`]: shape-preserving piecewise cubic Hermite interpolant
//!   (Fritsch-Carlson slopes), integrated with adaptive Simpson quadrature.
//!
//! [`FittedCurve`] wraps either one so callers can stay strategy-agnostic.

mod monotone;
mod polynomial;
pub mod quadrature;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use monotone::MonotoneCubic;
pub use polynomial::CubicPolynomial;

use crate::curve::MIN_CURVE_POINTS;
use crate::error::{Error, Result};

/// Curve-fitting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Single least-squares cubic over all samples.
    #[default]
    GlobalCubic,
    /// Piecewise monotone cubic Hermite (PCHIP).
    #[serde(rename = "monotone_piecewise_cubic")]
    MonotoneCubic,
}

impl Interpolation {
    /// Canonical token for this strategy.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GlobalCubic => "global_cubic",
            Self::MonotoneCubic => "monotone_piecewise_cubic",
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "global_cubic" | "cubic" | "pol" | "polynomial" => Ok(Self::GlobalCubic),
            "monotone_piecewise_cubic" | "monotone" | "pchip" => Ok(Self::MonotoneCubic),
            other => Err(Error::invalid(format!("unknown interpolation '{}'", other))),
        }
    }
}

/// A continuous model fitted to one curve's samples.
#[derive(Debug, Clone)]
pub enum FittedCurve {
    /// Least-squares cubic.
    GlobalCubic(CubicPolynomial),
    /// Monotone piecewise cubic.
    MonotoneCubic(MonotoneCubic),
}

impl FittedCurve {
    /// Fit `y = f(x)` with the given strategy.
    ///
    /// Samples need not be sorted. The independent variable must contain at
    /// least four values and no duplicates.
    pub fn fit(strategy: Interpolation, x: &[f64], y: &[f64]) -> Result<Self> {
        let (x, y) = sorted_knots(x, y)?;
        match strategy {
            Interpolation::GlobalCubic => CubicPolynomial::fit(&x, &y).map(Self::GlobalCubic),
            Interpolation::MonotoneCubic => MonotoneCubic::new(x, y).map(Self::MonotoneCubic),
        }
    }

    /// Evaluate the fitted curve at `x`.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::GlobalCubic(p) => p.evaluate(x),
            Self::MonotoneCubic(m) => m.evaluate(x),
        }
    }

    /// Definite integral over `[low, high]`.
    #[must_use]
    pub fn integrate(&self, low: f64, high: f64) -> f64 {
        match self {
            Self::GlobalCubic(p) => p.integrate(low, high),
            Self::MonotoneCubic(m) => m.integrate(low, high),
        }
    }

    /// Range of the independent variable covered by the input samples.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::GlobalCubic(p) => p.domain(),
            Self::MonotoneCubic(m) => m.domain(),
        }
    }

    /// Sample the curve at `count` evenly spaced points over its domain.
    #[must_use]
    pub fn sample(&self, count: usize) -> (Vec<f64>, Vec<f64>) {
        let (lo, hi) = self.domain();
        let count = count.max(2);
        let step = (hi - lo) / (count - 1) as f64;
        (0..count)
            .map(|i| {
                let x = if i == count - 1 { hi } else { lo + step * i as f64 };
                (x, self.evaluate(x))
            })
            .unzip()
    }
}

/// Sort `(x, y)` pairs by `x` and reject degenerate inputs.
fn sorted_knots(x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    if x.len() != y.len() {
        return Err(Error::invalid(format!(
            "x and y lengths differ ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < MIN_CURVE_POINTS {
        return Err(Error::invalid(format!(
            "need at least {} points, got {}",
            MIN_CURVE_POINTS,
            x.len()
        )));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(Error::invalid("non-finite sample value"));
    }

    let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    if let Some(w) = pairs.windows(2).find(|w| w[1].0 <= w[0].0) {
        return Err(Error::invalid(format!(
            "duplicate independent value {}",
            w[0].0
        )));
    }

    Ok(pairs.into_iter().unzip())
}
