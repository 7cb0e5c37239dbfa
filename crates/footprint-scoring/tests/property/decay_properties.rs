use footprint_scoring::decay::{days_between, time_factor, DecayParams};
use proptest::prelude::*;

const DAY: i64 = 86_400;

// ── Monotonically decreasing in elapsed time ─────────────────────────────

proptest! {
    #[test]
    fn factor_decreases_with_age(
        a in 0.0f64..3650.0,
        b in 0.0f64..3650.0,
        decay_days in 1.0f64..365.0,
    ) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(time_factor(far, decay_days) <= time_factor(near, decay_days));
    }

    #[test]
    fn factor_stays_in_unit_range(days in 0.0f64..10_000.0, decay_days in 1.0f64..365.0) {
        let f = time_factor(days, decay_days);
        prop_assert!(f > 0.0 || days / decay_days > 700.0);
        prop_assert!(f <= 1.0);
    }

    #[test]
    fn decayed_score_never_grows(
        score in 0.0f64..10_000.0,
        at in 0i64..2_000_000_000,
        elapsed in 0i64..(3650 * DAY),
    ) {
        let params = DecayParams::default();
        prop_assert!(params.decay(score, at, at + elapsed) <= score);
    }
}

// ── Composition: decaying in two steps equals decaying once ──────────────

proptest! {
    #[test]
    fn two_steps_equal_one(
        score in 0.0f64..10_000.0,
        t0 in 0i64..1_000_000_000,
        d1 in 0i64..(400 * DAY),
        d2 in 0i64..(400 * DAY),
    ) {
        let params = DecayParams::default();
        let t1 = t0 + d1;
        let t2 = t1 + d2;
        let stepwise = params.decay(params.decay(score, t0, t1), t1, t2);
        let direct = params.decay(score, t0, t2);
        prop_assert!((stepwise - direct).abs() <= 1e-9 * score.max(1.0));
    }

    #[test]
    fn days_are_additive(t0 in 0i64..1_000_000_000, d1 in 0i64..(400 * DAY), d2 in 0i64..(400 * DAY)) {
        let sum = days_between(t0, t0 + d1) + days_between(t0 + d1, t0 + d1 + d2);
        prop_assert!((sum - days_between(t0, t0 + d1 + d2)).abs() < 1e-9);
    }
}

// ── Interval weights ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn longer_intervals_weigh_more(
        start in 0i64..1_000_000_000,
        len in 4i64..100_000,
        extra in 1i64..100_000,
    ) {
        let params = DecayParams::default();
        let now = start + len + extra + DAY;
        // Both intervals end at the same instant so the decay factor matches.
        let end = start + len + extra;
        let short = params.interval_contribution(end - len, end, now);
        let long = params.interval_contribution(end - len - extra, end, now);
        prop_assert!(long > short);
    }

    #[test]
    fn noise_intervals_count_for_nothing(start in 0i64..1_000_000_000, len in 1i64..4) {
        let params = DecayParams::default();
        prop_assert_eq!(params.interval_contribution(start, start + len, start + len), 0.0);
    }
}
