//! Weighted fusion of fraud signals into one score

use claimwise_domain::Severity;

/// Contribution of each severity point of a matched pattern
pub const SEVERITY_WEIGHT: f64 = 0.1;

/// Added when any hard rule is violated
pub const HARD_RULE_WEIGHT: f64 = 0.5;

/// Added when the temporal red flag is raised
pub const TEMPORAL_WEIGHT: f64 = 0.3;

/// Added after the first clamp when the claim is an anomaly
pub const ANOMALY_WEIGHT: f64 = 0.2;

/// Fuse fraud signals into a score in [0, 1] with two decimals
///
/// The anomaly bonus is applied after the first clamp, so it cannot lift a
/// saturated score above 1.0.
///
/// # Examples
///
/// ```
/// use claimwise_domain::Severity;
/// use claimwise_scorer::fuse_score;
///
/// let severities = [Severity::new(3).unwrap()];
/// assert_eq!(fuse_score(severities, true, false, false), 0.8);
/// assert_eq!(fuse_score(Vec::<Severity>::new(), true, true, true), 1.0);
/// ```
pub fn fuse_score<I>(severities: I, hard_rule_violated: bool, temporal: bool, anomaly: bool) -> f64
where
    I: IntoIterator<Item = Severity>,
{
    let mut base: f64 = severities
        .into_iter()
        .map(|s| f64::from(s.value()) * SEVERITY_WEIGHT)
        .sum();

    if hard_rule_violated {
        base += HARD_RULE_WEIGHT;
    }
    if temporal {
        base += TEMPORAL_WEIGHT;
    }

    let mut score = base.min(1.0);
    if anomaly {
        score = (score + ANOMALY_WEIGHT).min(1.0);
    }

    round2(score)
}

/// Round to two decimals, halves away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NONE: [Severity; 0] = [];

    fn sev(values: &[i64]) -> Vec<Severity> {
        values.iter().map(|v| Severity::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_no_signals_is_zero() {
        assert_eq!(fuse_score(NONE, false, false, false), 0.0);
    }

    #[test]
    fn test_individual_weights() {
        assert_eq!(fuse_score(NONE, true, false, false), 0.5);
        assert_eq!(fuse_score(NONE, false, true, false), 0.3);
        assert_eq!(fuse_score(NONE, false, false, true), 0.2);
        assert_eq!(fuse_score(sev(&[3]), false, false, false), 0.3);
        assert_eq!(fuse_score(sev(&[1, 2]), false, false, false), 0.3);
    }

    #[test]
    fn test_clamped_before_anomaly() {
        // 0.5 + 0.3 + 0.5 saturates; the anomaly bonus cannot push past 1.0
        assert_eq!(fuse_score(sev(&[5]), true, true, true), 1.0);
        assert_eq!(fuse_score(sev(&[5, 5, 5]), false, false, true), 1.0);
    }

    #[test]
    fn test_anomaly_on_partial_score() {
        assert_eq!(fuse_score(NONE, true, false, true), 0.7);
        assert_eq!(fuse_score(sev(&[4]), false, true, true), 0.9);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        assert_eq!(round2(0.30000000000000004), 0.3);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.994), 0.99);
    }

    fn arb_severities() -> impl Strategy<Value = Vec<Severity>> {
        prop::collection::vec(1i64..=5, 0..6)
            .prop_map(|v| v.into_iter().map(|s| Severity::new(s).unwrap()).collect())
    }

    proptest! {
        #[test]
        fn prop_score_in_unit_interval(
            severities in arb_severities(),
            hard in any::<bool>(),
            temporal in any::<bool>(),
            anomaly in any::<bool>(),
        ) {
            let score = fuse_score(severities, hard, temporal, anomaly);
            prop_assert!((0.0..=1.0).contains(&score));
            prop_assert!(((score * 100.0).round() - score * 100.0).abs() < 1e-9);
        }

        #[test]
        fn prop_monotonic_in_each_signal(
            severities in arb_severities(),
            extra in 1i64..=5,
            hard in any::<bool>(),
            temporal in any::<bool>(),
            anomaly in any::<bool>(),
        ) {
            let score = fuse_score(severities.clone(), hard, temporal, anomaly);

            prop_assert!(fuse_score(severities.clone(), true, temporal, anomaly) >= score);
            prop_assert!(fuse_score(severities.clone(), hard, true, anomaly) >= score);
            prop_assert!(fuse_score(severities.clone(), hard, temporal, true) >= score);

            let mut more = severities;
            more.push(Severity::new(extra).unwrap());
            prop_assert!(fuse_score(more, hard, temporal, anomaly) >= score);
        }
    }
}
