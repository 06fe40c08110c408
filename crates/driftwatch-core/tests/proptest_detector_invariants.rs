//! Property-based invariant tests for the rolling window, drift tracker and
//! anomaly detector.
//!
//! Rolling window (1–3):
//! 1. Length never exceeds capacity.
//! 2. Contents equal the last `capacity` pushed values, oldest first.
//! 3. Mean lies between min and max of the contents; std is non-negative.
//!
//! Drift tracker (4–6):
//! 4. Cold start: first update sets mean to the value and variance to 0.
//! 5. Variance is never negative.
//! 6. State matches the literal recurrence, variance after mean.
//!
//! Detector (7–13):
//! 7. Window length equals window_size once ≥ window_size samples were seen.
//! 8. The first window_size − 1 samples are never anomalous.
//! 9. A flat window followed by the same value is never anomalous.
//! 10. |z| ≤ sqrt(window_size − 1) for every active sample.
//! 11. Phase never returns to WarmingUp.
//! 12. Determinism: same config + sequence → same classifications.
//! 13. Anomaly counter equals the number of `true` results.

use std::num::NonZeroUsize;

use driftwatch_core::{
    AnomalyDetector, DetectorConfig, DetectorPhase, DriftTracker, RollingWindow,
};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn config_strategy() -> impl Strategy<Value = DetectorConfig> {
    (
        1usize..=40,      // window_size
        0.001f64..=1.0,   // alpha
        0.1f64..=6.0,     // z_threshold
    )
        .prop_map(|(w, a, z)| DetectorConfig::new(w, a, z))
}

fn values(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-1.0e4f64..=1.0e4, 1..=max_len)
}

/// Integer-valued samples keep window means exact for flat windows, so the
/// z bound can be checked with a tight tolerance.
fn integer_values(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec((-1_000i32..=1_000).prop_map(f64::from), 1..=max_len)
}

fn capacity(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("strategy yields n >= 1")
}

// ═════════════════════════════════════════════════════════════════════════
// ROLLING WINDOW
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    // 1.
    #[test]
    fn window_len_bounded(n in 1usize..=32, xs in values(200)) {
        let mut w = RollingWindow::new(capacity(n));
        for x in xs {
            w.push(x);
            prop_assert!(w.len() <= n);
        }
    }

    // 2.
    #[test]
    fn window_keeps_most_recent(n in 1usize..=32, xs in values(200)) {
        let mut w = RollingWindow::new(capacity(n));
        for &x in &xs {
            w.push(x);
        }
        let start = xs.len().saturating_sub(n);
        let expected: Vec<f64> = xs[start..].to_vec();
        prop_assert_eq!(w.iter().collect::<Vec<_>>(), expected);
    }

    // 3.
    #[test]
    fn window_statistics_sane(n in 1usize..=32, xs in values(100)) {
        let mut w = RollingWindow::new(capacity(n));
        for x in xs {
            w.push(x);
        }
        let min = w.iter().fold(f64::INFINITY, f64::min);
        let max = w.iter().fold(f64::NEG_INFINITY, f64::max);
        let mean = w.mean();
        let tol = 1e-9 * (1.0 + max.abs().max(min.abs()));
        prop_assert!(mean >= min - tol && mean <= max + tol, "mean={mean} min={min} max={max}");
        prop_assert!(w.std_dev() >= 0.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// DRIFT TRACKER
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    // 4.
    #[test]
    fn ewma_cold_start(alpha in 0.001f64..=1.0, v in -1.0e6f64..=1.0e6) {
        let mut t = DriftTracker::new(alpha).unwrap();
        t.update(v);
        prop_assert_eq!(t.mean(), v);
        prop_assert_eq!(t.variance(), 0.0);
    }

    // 5.
    #[test]
    fn ewma_variance_non_negative(alpha in 0.001f64..=1.0, xs in values(200)) {
        let mut t = DriftTracker::new(alpha).unwrap();
        for x in xs {
            t.update(x);
            prop_assert!(t.variance() >= 0.0);
        }
    }

    // 6.
    #[test]
    fn ewma_matches_recurrence(alpha in 0.001f64..=1.0, xs in values(100)) {
        let mut t = DriftTracker::new(alpha).unwrap();
        let mut mean = 0.0f64;
        let mut var = 0.0f64;
        for (i, &x) in xs.iter().enumerate() {
            t.update(x);
            if i == 0 {
                mean = x;
                var = 0.0;
            } else {
                mean = alpha * x + (1.0 - alpha) * mean;
                var = alpha * (x - mean) * (x - mean) + (1.0 - alpha) * var;
            }
            prop_assert_eq!(t.mean(), mean);
            prop_assert_eq!(t.variance(), var);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// DETECTOR
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    // 7.
    #[test]
    fn detector_memory_bounded(config in config_strategy(), xs in values(300)) {
        let mut d = AnomalyDetector::new(config).unwrap();
        for (i, &x) in xs.iter().enumerate() {
            d.classify(x);
            if i + 1 >= config.window_size {
                prop_assert_eq!(d.window().len(), config.window_size);
            } else {
                prop_assert_eq!(d.window().len(), i + 1);
            }
        }
    }

    // 8.
    #[test]
    fn warm_up_never_flags(
        config in config_strategy(),
        xs in proptest::collection::vec(prop_oneof![
            Just(f64::MAX), Just(f64::MIN), Just(0.0), -1.0e12f64..=1.0e12
        ], 1..=40),
    ) {
        let mut d = AnomalyDetector::new(config).unwrap();
        for (i, &x) in xs.iter().enumerate().take(config.window_size - 1) {
            prop_assert!(!d.classify(x), "sample {i} flagged during warm-up");
            prop_assert!(!d.drift().is_initialized());
        }
    }

    // 9.
    #[test]
    fn flat_window_never_flags(config in config_strategy(), c in -1.0e6f64..=1.0e6) {
        let mut d = AnomalyDetector::new(config).unwrap();
        for _ in 0..config.window_size {
            d.classify(c);
        }
        let out = d.observe(c);
        prop_assert_eq!(out.z_score, 0.0);
        prop_assert!(!out.is_anomaly);
    }

    // 10.
    #[test]
    fn z_score_bounded_by_window(config in config_strategy(), xs in integer_values(200)) {
        let mut d = AnomalyDetector::new(config).unwrap();
        let bound = config.max_attainable_z() + 1e-9;
        for x in xs {
            let c = d.observe(x);
            if c.phase == DetectorPhase::Active {
                prop_assert!(c.z_score.abs() <= bound, "z={} bound={}", c.z_score, bound);
            }
        }
    }

    // 11.
    #[test]
    fn phase_is_monotone(config in config_strategy(), xs in values(200)) {
        let mut d = AnomalyDetector::new(config).unwrap();
        let mut seen_active = false;
        for x in xs {
            d.classify(x);
            if seen_active {
                prop_assert_eq!(d.phase(), DetectorPhase::Active);
            }
            seen_active |= d.phase() == DetectorPhase::Active;
        }
    }

    // 12.
    #[test]
    fn detectors_are_deterministic(config in config_strategy(), xs in values(200)) {
        let mut a = AnomalyDetector::new(config).unwrap();
        let mut b = AnomalyDetector::new(config).unwrap();
        for x in xs {
            prop_assert_eq!(a.classify(x), b.classify(x));
        }
        prop_assert_eq!(a.ewma_mean().to_bits(), b.ewma_mean().to_bits());
        prop_assert_eq!(a.ewma_var().to_bits(), b.ewma_var().to_bits());
    }

    // 13.
    #[test]
    fn anomaly_counter_consistent(config in config_strategy(), xs in values(200)) {
        let mut d = AnomalyDetector::new(config).unwrap();
        let flagged = xs.iter().filter(|&&x| d.classify(x)).count() as u64;
        let stats = d.stats();
        prop_assert_eq!(stats.anomalies, flagged);
        prop_assert_eq!(stats.observations, xs.len() as u64);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// FIXED SCENARIOS
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn fifo_eviction_exact_contents() {
    let mut w = RollingWindow::new(capacity(4));
    for v in 1..=5 {
        w.push(f64::from(v));
    }
    assert_eq!(w.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn flat_tens_then_ten_is_normal() {
    let mut d = AnomalyDetector::new(DetectorConfig::new(5, 0.3, 3.0)).unwrap();
    for _ in 0..5 {
        assert!(!d.classify(10.0));
    }
    assert!(!d.classify(10.0));
}

#[test]
fn spike_of_fifty_scores_exactly_two() {
    let mut d = AnomalyDetector::new(DetectorConfig::new(5, 0.3, 3.0)).unwrap();
    let outs: Vec<bool> = [10.0, 10.0, 10.0, 10.0, 50.0]
        .into_iter()
        .map(|v| d.classify(v))
        .collect();
    assert_eq!(outs, vec![false; 5]);

    let mut d = AnomalyDetector::new(DetectorConfig::new(5, 0.3, 3.0)).unwrap();
    for _ in 0..4 {
        d.classify(10.0);
    }
    let c = d.observe(50.0);
    assert_eq!(c.window_mean, Some(18.0));
    // Population std; the sample std would be sqrt(320) ≈ 17.89.
    assert_eq!(c.window_std, Some(16.0));
    assert_eq!(c.z_score, 2.0);
    assert!(!c.is_anomaly);
}

#[test]
fn window_of_ten_cannot_exceed_three() {
    // A single spike in a window of 10 reaches exactly z = 3, which the
    // strict comparison does not flag.
    let mut d = AnomalyDetector::new(DetectorConfig::new(10, 0.3, 3.0)).unwrap();
    for _ in 0..9 {
        d.classify(0.0);
    }
    let c = d.observe(1_000.0);
    assert!((c.z_score - 3.0).abs() < 1e-12);
    assert!(!c.is_anomaly);
}
