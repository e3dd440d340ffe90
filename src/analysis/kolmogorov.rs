//! Kolmogorov-Smirnov test for uniformity.
//!
//! Measures the largest vertical gap between the empirical CDF of the
//! sample and the CDF of Uniform(0, 1), which is the identity on [0, 1].

use super::decision::{
    CriticalValueMode, Decision, SignificanceLevel, TestKind, TestOptions, TestOutcome,
};
use super::error::TestError;
use serde::Serialize;

/// Asymptotic coefficient of the KS critical value at alpha = 0.05.
pub const CLASSIC_KS_COEFFICIENT: f64 = 1.36;

/// Terms summed in the Kolmogorov distribution series.
const SERIES_TERMS: i32 = 100;

/// Kolmogorov-Smirnov test result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KsResult {
    /// Two-sided statistic D = max(D+, D-).
    pub statistic: f64,
    /// Largest amount the empirical CDF exceeds the uniform CDF.
    pub d_plus: f64,
    /// Largest amount the uniform CDF exceeds the empirical CDF.
    pub d_minus: f64,
    /// Rejection threshold for D.
    pub critical_value: f64,
    /// Number of values tested.
    pub sample_size: usize,
    /// Verdict.
    pub decision: Decision,
}

impl TestOutcome for KsResult {
    fn kind(&self) -> TestKind {
        TestKind::KolmogorovSmirnov
    }

    fn statistic(&self) -> f64 {
        self.statistic
    }

    fn critical_value(&self) -> f64 {
        self.critical_value
    }

    fn decision(&self) -> Decision {
        self.decision
    }
}

/// Runs the KS test with the classic `1.36 / sqrt(n)` critical value.
///
/// Alpha is validated but does not influence the critical value; use
/// [`ks_test_with`] and [`CriticalValueMode::FromAlpha`] for that.
pub fn ks_test(sample: &[f64], alpha: f64) -> Result<KsResult, TestError> {
    ks_test_with(sample, alpha, &TestOptions::default())
}

/// Runs the KS test with explicit options.
///
/// The caller's slice is never reordered; sorting happens on an owned copy.
pub fn ks_test_with(
    sample: &[f64],
    alpha: f64,
    options: &TestOptions,
) -> Result<KsResult, TestError> {
    let alpha = SignificanceLevel::new(alpha)?;
    if sample.is_empty() {
        return Err(TestError::EmptySample);
    }

    let mut sorted = options.range_policy.apply(sample)?.into_owned();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let (d_plus, d_minus) = sorted.iter().enumerate().fold(
        (f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(d_plus, d_minus), (i, &x)| {
            (
                d_plus.max((i + 1) as f64 / n - x),
                d_minus.max(x - i as f64 / n),
            )
        },
    );
    let statistic = d_plus.max(d_minus);

    let critical_value = match options.critical_values {
        CriticalValueMode::Classic => CLASSIC_KS_COEFFICIENT / n.sqrt(),
        CriticalValueMode::FromAlpha => {
            // Stephens' finite-sample correction to the asymptotic quantile
            let sqrt_n = n.sqrt();
            kolmogorov_quantile(alpha) / (sqrt_n + 0.12 + 0.11 / sqrt_n)
        }
    };

    let decision = Decision::accept_if(statistic < critical_value);

    tracing::debug!(
        n = sorted.len(),
        d = statistic,
        d_plus,
        d_minus,
        critical = critical_value,
        %decision,
        "Kolmogorov-Smirnov test"
    );

    Ok(KsResult {
        statistic,
        d_plus,
        d_minus,
        critical_value,
        sample_size: sorted.len(),
        decision,
    })
}

/// Survival function of the Kolmogorov distribution,
/// `Q(λ) = 2 Σ (-1)^(k-1) exp(-2 k² λ²)`.
pub fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let sum: f64 = (1..=SERIES_TERMS)
        .map(|k| {
            let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
            sign * (-2.0 * (f64::from(k) * lambda).powi(2)).exp()
        })
        .sum();
    (2.0 * sum).clamp(0.0, 1.0)
}

/// Returns λ such that `Q(λ) = alpha`, found by bisection.
///
/// For alpha = 0.05 this is approximately 1.358.
pub fn kolmogorov_quantile(alpha: SignificanceLevel) -> f64 {
    // Q is monotonically decreasing; the series has converged at both ends.
    let (mut lo, mut hi) = (0.05_f64, 10.0_f64);
    while hi - lo > 1e-12 {
        let mid = 0.5 * (lo + hi);
        if kolmogorov_survival(mid) > alpha.value() {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::RangePolicy;
    use proptest::prelude::*;

    fn grid(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 / n as f64).collect()
    }

    #[test]
    fn test_uniform_grid_accepted() {
        let result = ks_test(&grid(100), 0.05).unwrap();

        assert!((result.statistic - 0.01).abs() < 1e-12);
        assert!((result.critical_value - 0.136).abs() < 1e-12);
        assert_eq!(result.decision, Decision::Accept);
        assert_eq!(result.sample_size, 100);
    }

    #[test]
    fn test_concentrated_sample_rejected() {
        let sample = vec![0.95; 100];
        let result = ks_test(&sample, 0.05).unwrap();

        // D- = 0.95 at the first order statistic
        assert!((result.statistic - 0.95).abs() < 1e-12);
        assert_eq!(result.decision, Decision::Reject);
    }

    #[test]
    fn test_hand_computed_statistic() {
        // Sorted: 0.05, 0.3, 0.9. D+ = max(1/3-0.05, 2/3-0.3, 1-0.9) = 0.3667
        // D- = max(0.05, 0.3-1/3, 0.9-2/3) = 0.2333
        let result = ks_test(&[0.9, 0.05, 0.3], 0.05).unwrap();
        assert!((result.d_plus - (2.0 / 3.0 - 0.3)).abs() < 1e-12);
        assert!((result.d_minus - (0.9 - 2.0 / 3.0)).abs() < 1e-12);
        assert_eq!(result.statistic, result.d_plus);
    }

    #[test]
    fn test_empty_sample_fails() {
        assert_eq!(ks_test(&[], 0.05), Err(TestError::EmptySample));
    }

    #[test]
    fn test_invalid_alpha_fails() {
        assert!(matches!(
            ks_test(&grid(10), 1.0),
            Err(TestError::InvalidAlpha(_))
        ));
    }

    #[test]
    fn test_input_not_reordered() {
        let sample = vec![0.7, 0.1, 0.4];
        let before = sample.clone();
        ks_test(&sample, 0.05).unwrap();
        assert_eq!(sample, before);
    }

    #[test]
    fn test_out_of_range_accepted_by_default() {
        let result = ks_test(&[0.2, 1.8], 0.05).unwrap();
        // 1.8 - 1/2 exceeds any meaningful CDF gap
        assert!(result.statistic > 1.0);
    }

    #[test]
    fn test_out_of_range_rejected_by_policy() {
        let options = TestOptions {
            range_policy: RangePolicy::Reject,
            ..Default::default()
        };
        assert!(matches!(
            ks_test_with(&[0.2, 1.8], 0.05, &options),
            Err(TestError::OutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_kolmogorov_quantile_reference_values() {
        let q95 = kolmogorov_quantile(SignificanceLevel::new(0.05).unwrap());
        let q99 = kolmogorov_quantile(SignificanceLevel::new(0.01).unwrap());
        assert!((q95 - 1.3581).abs() < 1e-3, "q95 = {q95}");
        assert!((q99 - 1.6276).abs() < 1e-3, "q99 = {q99}");
    }

    #[test]
    fn test_from_alpha_close_to_classic_at_five_percent() {
        let sample = grid(100);
        let classic = ks_test(&sample, 0.05).unwrap();
        let derived = ks_test_with(&sample, 0.05, &TestOptions::from_alpha()).unwrap();
        assert!((classic.critical_value - derived.critical_value).abs() < 0.003);
    }

    #[test]
    fn test_from_alpha_tracks_alpha() {
        let sample = grid(100);
        let options = TestOptions::from_alpha();
        let loose = ks_test_with(&sample, 0.10, &options).unwrap();
        let strict = ks_test_with(&sample, 0.01, &options).unwrap();
        assert!(strict.critical_value > loose.critical_value);
    }

    proptest! {
        #[test]
        fn prop_statistic_non_negative(sample in prop::collection::vec(0.0f64..1.0, 1..200)) {
            let result = ks_test(&sample, 0.05).unwrap();
            prop_assert!(result.statistic >= 0.0);
            prop_assert!(result.statistic <= 1.0);
        }

        #[test]
        fn prop_deterministic(sample in prop::collection::vec(0.0f64..1.0, 1..100)) {
            prop_assert_eq!(ks_test(&sample, 0.05).unwrap(), ks_test(&sample, 0.05).unwrap());
        }
    }
}
