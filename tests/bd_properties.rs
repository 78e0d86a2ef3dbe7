//! Behavioural properties of the BD engine across strategies and modes.

use bd_eval::{
    BdMode, BdOptions, Error, FittedCurve, Interpolation, RdCurve, compute_bd, compute_bd_detailed,
};

const MODES: [BdMode; 2] = [BdMode::RateSaving, BdMode::QualityDifference];
const STRATEGIES: [Interpolation; 2] = [Interpolation::GlobalCubic, Interpolation::MonotoneCubic];

/// Smooth concave RD curve: quality is a quadratic in ln(rate).
fn smooth_curve(rate_scale: f64) -> RdCurve {
    let pairs: Vec<(f64, f64)> = [500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0]
        .iter()
        .map(|&r: &f64| {
            let l = r.ln();
            (r * rate_scale, 20.0 + 8.0 * l - 0.3 * l * l)
        })
        .collect();
    RdCurve::from_pairs(&pairs).unwrap()
}

fn anchor() -> RdCurve {
    RdCurve::from_pairs(&[
        (937.0112, 45.5074),
        (1405.4792, 47.0002),
        (3438.7128, 49.9565),
        (6448.6368, 52.1459),
    ])
    .unwrap()
}

fn test_curve() -> RdCurve {
    RdCurve::from_pairs(&[
        (822.0064, 45.7215),
        (1608.9144, 47.6227),
        (3086.912, 50.1394),
        (5784.7696, 52.3339),
    ])
    .unwrap()
}

#[test]
fn strategies_agree_on_smooth_data() {
    for mode in MODES {
        let cubic = compute_bd(&smooth_curve(1.0), &smooth_curve(0.85), mode, Interpolation::GlobalCubic)
            .unwrap();
        let pchip =
            compute_bd(&smooth_curve(1.0), &smooth_curve(0.85), mode, Interpolation::MonotoneCubic)
                .unwrap();
        let relative = (cubic - pchip).abs() / cubic.abs().max(pchip.abs());
        assert!(relative < 0.05, "{mode}: cubic {cubic} vs pchip {pchip}");
    }

    let cubic = compute_bd(&anchor(), &test_curve(), BdMode::RateSaving, Interpolation::GlobalCubic)
        .unwrap();
    let pchip = compute_bd(&anchor(), &test_curve(), BdMode::RateSaving, Interpolation::MonotoneCubic)
        .unwrap();
    assert!((cubic - pchip).abs() / cubic.abs() < 0.05);
}

#[test]
fn uniform_rate_scaling_is_recovered() {
    for interp in STRATEGIES {
        let bd = compute_bd(&smooth_curve(1.0), &smooth_curve(0.85), BdMode::RateSaving, interp)
            .unwrap();
        assert!((bd + 15.0).abs() < 1e-6, "{interp}: {bd}");
    }
}

#[test]
fn sign_follows_direction_of_improvement() {
    for interp in STRATEGIES {
        // Test curve needs less rate at equal quality.
        let rate = compute_bd(&anchor(), &test_curve(), BdMode::RateSaving, interp).unwrap();
        assert!(rate < 0.0);
        // And reaches higher quality at equal rate.
        let quality = compute_bd(&anchor(), &test_curve(), BdMode::QualityDifference, interp).unwrap();
        assert!(quality > 0.0);
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    for mode in MODES {
        for interp in STRATEGIES {
            let first = compute_bd(&anchor(), &test_curve(), mode, interp).unwrap();
            let second = compute_bd(&anchor(), &test_curve(), mode, interp).unwrap();
            assert_eq!(first.to_bits(), second.to_bits());
        }
    }
}

#[test]
fn concurrent_calls_match_sequential() {
    let expected = compute_bd(&anchor(), &test_curve(), BdMode::RateSaving, Interpolation::MonotoneCubic)
        .unwrap();

    let results: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    compute_bd(&anchor(), &test_curve(), BdMode::RateSaving, Interpolation::MonotoneCubic)
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for value in results {
        assert_eq!(value.to_bits(), expected.to_bits());
    }
}

#[test]
fn invalid_samples_are_rejected() {
    let bad_rates = [0.0, -10.0, f64::NAN, f64::INFINITY];
    for rate in bad_rates {
        let result = RdCurve::from_pairs(&[(rate, 30.0), (200.0, 32.0), (400.0, 34.0), (800.0, 36.0)]);
        assert!(matches!(result, Err(Error::InvalidCurve { .. })), "rate {rate}");
    }

    let nan_quality =
        RdCurve::from_pairs(&[(100.0, f64::NAN), (200.0, 32.0), (400.0, 34.0), (800.0, 36.0)]);
    assert!(matches!(nan_quality, Err(Error::InvalidCurve { .. })));

    let too_short = RdCurve::from_pairs(&[(100.0, 30.0), (200.0, 32.0), (400.0, 34.0)]);
    assert!(matches!(too_short, Err(Error::InvalidCurve { .. })));
}

#[test]
fn disjoint_curves_report_no_overlap() {
    let low = RdCurve::from_pairs(&[(100.0, 20.0), (200.0, 22.0), (400.0, 24.0), (800.0, 26.0)])
        .unwrap();
    let high = RdCurve::from_pairs(&[(1000.0, 30.0), (2000.0, 32.0), (4000.0, 34.0), (8000.0, 36.0)])
        .unwrap();

    for mode in MODES {
        for interp in STRATEGIES {
            match compute_bd(&low, &high, mode, interp) {
                Err(Error::NoOverlap { low, high }) => assert!(low >= high),
                other => panic!("{mode} {interp}: expected NoOverlap, got {other:?}"),
            }
        }
    }
}

#[test]
fn monotone_fit_has_no_overshoot() {
    // Quality saturates sharply; a global cubic would wiggle here.
    let x = [6.0, 7.0, 8.0, 9.0, 10.0, 11.0];
    let y = [30.0, 38.0, 40.0, 40.2, 40.3, 40.35];
    let fit = FittedCurve::fit(Interpolation::MonotoneCubic, &x, &y).unwrap();

    let (xs, ys) = fit.sample(500);
    assert_eq!(xs.len(), 500);
    for pair in ys.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-12, "not monotone: {pair:?}");
    }
    for &v in &ys {
        assert!((30.0 - 1e-9..=40.35 + 1e-9).contains(&v), "overshoot: {v}");
    }
    for (&xi, &yi) in x.iter().zip(&y) {
        assert!((fit.evaluate(xi) - yi).abs() < 1e-12);
    }
}

#[test]
fn detailed_report_is_consistent_with_scalar() {
    for mode in MODES {
        for interp in STRATEGIES {
            let scalar = compute_bd(&anchor(), &test_curve(), mode, interp).unwrap();
            let options = BdOptions::new(mode, interp);
            let report = compute_bd_detailed(&anchor(), &test_curve(), &options).unwrap();

            assert_eq!(report.value.to_bits(), scalar.to_bits());
            assert_eq!(report.mode, mode);
            assert_eq!(report.interpolation, interp);
            assert!(report.interval.low < report.interval.high);
            for fitted in &report.fitted {
                assert_eq!(fitted.x.len(), options.fitted_samples);
                assert_eq!(fitted.y.len(), options.fitted_samples);
            }
        }
    }
}
