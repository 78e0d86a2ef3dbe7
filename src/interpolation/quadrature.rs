//! Adaptive Simpson quadrature.

/// Absolute tolerance used for BD integration.
pub const SIMPSON_TOLERANCE: f64 = 1e-10;

/// Recursion limit; bounds the number of function evaluations.
pub const SIMPSON_MAX_DEPTH: u32 = 50;

/// Integrate `f` over `[a, b]` to within roughly `tolerance`.
///
/// Each interval is split until the two-halves estimate agrees with the
/// whole-interval estimate, then Richardson-corrected.
///
/// # Example
///
/// ```
/// use bd_eval::interpolation::quadrature::adaptive_simpson;
///
/// let area = adaptive_simpson(|x| x.sin(), 0.0, std::f64::consts::PI, 1e-10, 50);
/// assert!((area - 2.0).abs() < 1e-9);
/// ```
pub fn adaptive_simpson<F>(f: F, a: f64, b: f64, tolerance: f64, max_depth: u32) -> f64
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return 0.0;
    }
    let fa = f(a);
    let fb = f(b);
    let whole = simpson(&f, a, fa, b, fb);
    refine(&f, whole, tolerance, max_depth)
}

struct Panel {
    a: f64,
    fa: f64,
    b: f64,
    fb: f64,
    m: f64,
    fm: f64,
    area: f64,
}

fn simpson<F: Fn(f64) -> f64>(f: &F, a: f64, fa: f64, b: f64, fb: f64) -> Panel {
    let m = (a + b) / 2.0;
    let fm = f(m);
    Panel {
        a,
        fa,
        b,
        fb,
        m,
        fm,
        area: (b - a) / 6.0 * (fa + 4.0 * fm + fb),
    }
}

fn refine<F: Fn(f64) -> f64>(f: &F, whole: Panel, tolerance: f64, depth: u32) -> f64 {
    let left = simpson(f, whole.a, whole.fa, whole.m, whole.fm);
    let right = simpson(f, whole.m, whole.fm, whole.b, whole.fb);
    let delta = left.area + right.area - whole.area;

    if depth == 0 || delta.abs() <= 15.0 * tolerance {
        return left.area + right.area + delta / 15.0;
    }
    refine(f, left, tolerance / 2.0, depth - 1) + refine(f, right, tolerance / 2.0, depth - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polynomial_exact() {
        let area = adaptive_simpson(|x| x * x * x - 2.0 * x, 0.0, 2.0, 1e-12, 20);
        assert!((area - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_reversed_bounds() {
        let forward = adaptive_simpson(|x| x.exp(), 0.0, 1.0, 1e-10, 50);
        let backward = adaptive_simpson(|x| x.exp(), 1.0, 0.0, 1e-10, 50);
        assert!((forward + backward).abs() < 1e-12);
        assert!((forward - (1f64.exp() - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_kink() {
        // |x| has a kink at zero that forces subdivision.
        let area = adaptive_simpson(f64::abs, -1.0, 3.0, 1e-10, 50);
        assert!((area - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_interval() {
        assert_eq!(adaptive_simpson(|x| x, 1.0, 1.0, 1e-10, 50), 0.0);
    }
}
