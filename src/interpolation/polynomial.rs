//! Least-squares cubic polynomial.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

const DEGREE: usize = 3;

/// `y = c0 + c1*t + c2*t^2 + c3*t^3` with `t = (x - center) / scale`.
///
/// Fitting in the normalized variable keeps the Vandermonde matrix well
/// conditioned for log-rate inputs around 6..10 and PSNR around 30..50.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicPolynomial {
    coeffs: [f64; DEGREE + 1],
    center: f64,
    scale: f64,
    domain: (f64, f64),
}

impl CubicPolynomial {
    /// Least-squares fit through `(x, y)`; `x` sorted and strictly increasing.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        let lo = x[0];
        let hi = x[x.len() - 1];
        let center = (lo + hi) / 2.0;
        let scale = (hi - lo) / 2.0;
        if scale <= 0.0 {
            return Err(Error::invalid("independent variable has zero range"));
        }

        let t: Vec<f64> = x.iter().map(|v| (v - center) / scale).collect();
        let vandermonde = DMatrix::from_fn(t.len(), DEGREE + 1, |r, c| t[r].powi(c as i32));
        let rhs = DVector::from_column_slice(y);

        let svd = vandermonde.svd(true, true);
        if svd.rank(1e-10) < DEGREE + 1 {
            return Err(Error::invalid("singular least-squares system"));
        }
        let solution = svd
            .solve(&rhs, 1e-12)
            .map_err(|e| Error::invalid(format!("least-squares solve failed: {}", e)))?;

        let mut coeffs = [0.0; DEGREE + 1];
        for (dst, src) in coeffs.iter_mut().zip(solution.iter()) {
            *dst = *src;
        }
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(Error::invalid("least-squares fit produced non-finite coefficients"));
        }

        Ok(Self {
            coeffs,
            center,
            scale,
            domain: (lo, hi),
        })
    }

    /// Evaluate at `x` (Horner form).
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let t = (x - self.center) / self.scale;
        self.coeffs
            .iter()
            .rev()
            .fold(0.0, |acc, &c| f64::mul_add(acc, t, c))
    }

    /// Closed-form definite integral over `[low, high]`.
    #[must_use]
    pub fn integrate(&self, low: f64, high: f64) -> f64 {
        let t_low = (low - self.center) / self.scale;
        let t_high = (high - self.center) / self.scale;
        self.scale * (self.antiderivative(t_high) - self.antiderivative(t_low))
    }

    /// Antiderivative in the normalized variable, zero at `t = 0`.
    fn antiderivative(&self, t: f64) -> f64 {
        self.coeffs
            .iter()
            .enumerate()
            .rev()
            .fold(0.0, |acc, (i, &c)| f64::mul_add(acc, t, c / (i + 1) as f64))
            * t
    }

    /// Coefficients in the original variable, lowest order first.
    #[must_use]
    pub fn coefficients(&self) -> [f64; DEGREE + 1] {
        // Expand c_k * ((x - m) / s)^k with the binomial theorem.
        let mut out = [0.0; DEGREE + 1];
        for (k, &c) in self.coeffs.iter().enumerate() {
            let ck = c / self.scale.powi(k as i32);
            for j in 0..=k {
                let binom = binomial(k, j) as f64;
                out[j] += ck * binom * (-self.center).powi((k - j) as i32);
            }
        }
        out
    }

    /// Range of the fitted samples.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

fn binomial(n: usize, k: usize) -> usize {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_cubic_recovered() {
        // y = 1 - 2x + 0.5x^2 + 0.25x^3
        let f = |x: f64| 1.0 - 2.0 * x + 0.5 * x * x + 0.25 * x * x * x;
        let x = [-1.0, 0.5, 2.0, 3.0, 4.5];
        let y: Vec<f64> = x.iter().map(|&v| f(v)).collect();

        let poly = CubicPolynomial::fit(&x, &y).unwrap();
        for v in [-1.0, 0.0, 1.7, 4.5] {
            assert!((poly.evaluate(v) - f(v)).abs() < 1e-9);
        }

        let c = poly.coefficients();
        assert!((c[0] - 1.0).abs() < 1e-9);
        assert!((c[1] + 2.0).abs() < 1e-9);
        assert!((c[2] - 0.5).abs() < 1e-9);
        assert!((c[3] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_integral_matches_antiderivative() {
        // y = 3x^2 on [1, 2] integrates to 7
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 3.0, 12.0, 27.0];
        let poly = CubicPolynomial::fit(&x, &y).unwrap();
        assert!((poly.integrate(1.0, 2.0) - 7.0).abs() < 1e-9);
        assert!((poly.integrate(2.0, 1.0) + 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_least_squares_on_noisy_line() {
        // Symmetric noise on a line leaves the best cubic close to the line.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [2.1, 3.9, 6.1, 7.9, 10.1, 11.9];
        let poly = CubicPolynomial::fit(&x, &y).unwrap();
        assert!((poly.evaluate(3.5) - 7.0).abs() < 0.2);
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(3, 0), 1);
        assert_eq!(binomial(3, 1), 3);
        assert_eq!(binomial(3, 2), 3);
        assert_eq!(binomial(3, 3), 1);
    }
}
