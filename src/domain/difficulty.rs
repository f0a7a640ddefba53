/// The difficulty model: elapsed play time + score in, a scalar in
/// [0.0, 1.0] out. Queried fresh every tick; it feeds spawn intervals and is
/// frozen into each enemy's speed at spawn.

/// Time contribution: a gentle ramp capped at 0.2 for the first minute, then
/// a steeper climb worth up to 0.4 more over the next three minutes.
fn time_factor(elapsed: f64) -> f64 {
    if elapsed < 60.0 {
        (elapsed / 300.0).min(0.2)
    } else {
        0.2 + ((elapsed - 60.0) / 180.0).min(0.4)
    }
}

/// Score contribution: very gradual below 100 points, then a second ramp
/// capped at 0.4 total.
fn score_factor(score: u32) -> f64 {
    if score < 100 {
        score as f64 / 500.0
    } else {
        0.2 + ((score - 100) as f64 / 500.0).min(0.2)
    }
}

/// Combined difficulty in [0, 1].
///
/// The sum of both factors is clamped to 1.0, damped during the first 30
/// seconds, then passed through log10(1 + 9x) so growth is front-loaded and
/// the late curve flattens.
pub fn difficulty(elapsed: f64, score: u32) -> f64 {
    let mut d = (time_factor(elapsed) + score_factor(score)).min(1.0);

    if elapsed < 30.0 {
        d *= (elapsed / 30.0) * 0.7;
    }

    if d > 0.0 {
        d = (1.0 + 9.0 * d).log10();
    }

    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_inputs_zero_difficulty() {
        assert_eq!(difficulty(0.0, 0), 0.0);
    }

    #[test]
    fn always_within_unit_interval() {
        let times = [0.0, 1.0, 15.0, 29.9, 30.0, 59.0, 60.0, 120.0, 240.0, 1e6];
        let scores = [0, 1, 50, 99, 100, 150, 300, 600, 10_000];
        for &t in &times {
            for &s in &scores {
                let d = difficulty(t, s);
                assert!((0.0..=1.0).contains(&d), "difficulty({t}, {s}) = {d}");
            }
        }
    }

    #[test]
    fn saturates_at_one() {
        // log10(1 + 9*1.0) = 1.0 exactly at the clamp
        let d = difficulty(1e6, 10_000);
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn early_game_is_damped() {
        // same score, but under the 30s damping window vs past it
        let early = difficulty(10.0, 80);
        let later = difficulty(40.0, 80);
        assert!(early < later);
        // at t=10 the damping factor is (10/30)*0.7 ≈ 0.233
        assert!(early < 0.4);
    }

    #[test]
    fn time_factor_kinks_at_sixty_seconds() {
        assert!((time_factor(60.0) - 0.2).abs() < 1e-12);
        assert!(time_factor(59.0) <= 0.2);
        assert!(time_factor(61.0) > 0.2);
        assert!((time_factor(240.0) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn score_factor_kinks_at_hundred() {
        assert!((score_factor(99) - 99.0 / 500.0).abs() < 1e-12);
        assert!((score_factor(100) - 0.2).abs() < 1e-12);
        assert!((score_factor(600) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn monotone_in_time_past_damping() {
        let mut prev = difficulty(30.0, 50);
        for t in 31..300 {
            let d = difficulty(t as f64, 50);
            assert!(d >= prev, "dip at t={t}");
            prev = d;
        }
    }

    #[test]
    fn log_compression_front_loads_growth() {
        // first half of the raw range gains more than the second half
        let low = difficulty(90.0, 0); // modest raw input
        let mid = difficulty(240.0, 100); // raw 0.8
        let high = difficulty(240.0, 600); // raw 1.0
        assert!(low > 0.0);
        assert!(mid - low > high - mid);
    }
}
