//! Pearson chi-square test for uniformity over equal-width bins.

use super::decision::{Decision, SignificanceLevel, TestKind, TestOptions, TestOutcome};
use super::error::TestError;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Default number of equal-width intervals.
pub const DEFAULT_INTERVALS: usize = 10;

/// Chi-square test result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareResult {
    /// Σ (observed - expected)² / expected.
    pub statistic: f64,
    /// (1 - alpha) quantile of chi-square with `degrees_of_freedom`.
    pub critical_value: f64,
    /// Number of intervals minus one.
    pub degrees_of_freedom: usize,
    /// Expected count per bin, `n / intervals`.
    pub expected_count: f64,
    /// Observed count per bin.
    pub observed: Vec<u64>,
    /// Values outside [0, 1] that were not binned.
    pub excluded: usize,
    /// Verdict.
    pub decision: Decision,
}

impl TestOutcome for ChiSquareResult {
    fn kind(&self) -> TestKind {
        TestKind::ChiSquare
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

/// Runs the chi-square test with default options.
pub fn chi_square_test(
    sample: &[f64],
    intervals: usize,
    alpha: f64,
) -> Result<ChiSquareResult, TestError> {
    chi_square_test_with(sample, intervals, alpha, &TestOptions::default())
}

/// Runs the chi-square test with explicit options.
///
/// The critical value is always derived from alpha, so
/// [`TestOptions::critical_values`] has no effect here. `intervals` may not
/// exceed the sample size.
pub fn chi_square_test_with(
    sample: &[f64],
    intervals: usize,
    alpha: f64,
    options: &TestOptions,
) -> Result<ChiSquareResult, TestError> {
    let alpha = SignificanceLevel::new(alpha)?;
    if intervals < 2 {
        return Err(TestError::TooFewIntervals(intervals));
    }
    if sample.is_empty() {
        return Err(TestError::EmptySample);
    }

    let prepared = options.range_policy.apply(sample)?;

    // Fewer values than bins leaves some bins expecting less than one value
    if intervals > prepared.len() {
        return Err(TestError::NumericDegenerate(format!(
            "{intervals} intervals exceed the sample size {}",
            prepared.len()
        )));
    }

    let expected_count = prepared.len() as f64 / intervals as f64;
    if !(expected_count.is_finite() && expected_count > 0.0) {
        return Err(TestError::NumericDegenerate(format!(
            "expected count per bin is {expected_count}"
        )));
    }

    let observed = histogram(&prepared, intervals);
    let binned: u64 = observed.iter().sum();
    let excluded = prepared.len() - binned as usize;
    if excluded > 0 {
        tracing::warn!(excluded, "Values outside [0, 1] excluded from chi-square bins");
    }
    tracing::trace!(?observed, expected_count, "Chi-square bin counts");

    let statistic: f64 = observed
        .iter()
        .map(|&count| {
            let diff = count as f64 - expected_count;
            diff * diff / expected_count
        })
        .sum();

    let degrees_of_freedom = intervals - 1;
    let dist = ChiSquared::new(degrees_of_freedom as f64)
        .map_err(|e| TestError::NumericDegenerate(e.to_string()))?;
    let critical_value = dist.inverse_cdf(alpha.confidence());

    let decision = Decision::accept_if(statistic < critical_value);

    tracing::debug!(
        n = prepared.len(),
        intervals,
        statistic,
        critical = critical_value,
        %decision,
        "Chi-square test"
    );

    Ok(ChiSquareResult {
        statistic,
        critical_value,
        degrees_of_freedom,
        expected_count,
        observed,
        excluded,
        decision,
    })
}

/// Counts values into `intervals` equal-width bins over [0, 1].
///
/// Bins are half-open `[i/k, (i+1)/k)` except the last, which also
/// includes 1.0. Values outside [0, 1] are not counted.
fn histogram(sample: &[f64], intervals: usize) -> Vec<u64> {
    let k = intervals as f64;
    let edge = |i: usize| i as f64 / k;
    let mut counts = vec![0u64; intervals];

    for &x in sample {
        if !(0.0..=1.0).contains(&x) {
            continue;
        }
        let mut bin = ((x * k) as usize).min(intervals - 1);
        // x * k can round across an edge; settle against the edges themselves
        if bin > 0 && x < edge(bin) {
            bin -= 1;
        } else if bin + 1 < intervals && x >= edge(bin + 1) {
            bin += 1;
        }
        counts[bin] += 1;
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::RangePolicy;
    use proptest::prelude::*;

    #[test]
    fn test_critical_value_matches_table() {
        let sample: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        let result = chi_square_test(&sample, 10, 0.05).unwrap();

        assert_eq!(result.degrees_of_freedom, 9);
        assert!((result.critical_value - 16.919).abs() < 1e-3);

        let result = chi_square_test(&sample, 5, 0.01).unwrap();
        assert!((result.critical_value - 13.277).abs() < 1e-3);
    }

    #[test]
    fn test_perfect_grid_has_zero_statistic() {
        let sample: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        let result = chi_square_test(&sample, 10, 0.05).unwrap();

        assert_eq!(result.observed, vec![10; 10]);
        assert!(result.statistic.abs() < 1e-12);
        assert_eq!(result.decision, Decision::Accept);
    }

    #[test]
    fn test_identical_values_rejected() {
        let sample = vec![0.5; 100];
        let result = chi_square_test(&sample, 10, 0.05).unwrap();

        // 9 empty bins contribute 10 each, the full bin (100-10)²/10
        assert!((result.statistic - 900.0).abs() < 1e-9);
        assert!(result.statistic > result.critical_value);
        assert_eq!(result.decision, Decision::Reject);
    }

    #[test]
    fn test_fractional_expected_count() {
        let sample = [0.05, 0.15, 0.25, 0.35, 0.45, 0.55, 0.65];
        let result = chi_square_test(&sample, 2, 0.05).unwrap();
        assert!((result.expected_count - 3.5).abs() < 1e-12);
        assert_eq!(result.observed, vec![5, 2]);
    }

    #[test]
    fn test_bin_edges() {
        assert_eq!(histogram(&[0.0, 0.5, 1.0], 2), vec![1, 2]);
        assert_eq!(histogram(&[0.3, 0.7, 0.1 + 0.2], 10)[3], 2);
        assert_eq!(histogram(&[-0.1, 1.1], 4), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_out_of_range_excluded() {
        let result = chi_square_test(&[0.1, 0.6, 1.5, -2.0], 2, 0.05).unwrap();
        assert_eq!(result.excluded, 2);
        assert_eq!(result.observed, vec![1, 1]);
    }

    #[test]
    fn test_clamp_policy_bins_everything() {
        let options = TestOptions {
            range_policy: RangePolicy::Clamp,
            ..Default::default()
        };
        let result = chi_square_test_with(&[0.1, 0.6, 1.5, -2.0], 2, 0.05, &options).unwrap();
        assert_eq!(result.excluded, 0);
        assert_eq!(result.observed, vec![2, 2]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(chi_square_test(&[], 10, 0.05), Err(TestError::EmptySample));
        assert_eq!(
            chi_square_test(&[0.5], 1, 0.05),
            Err(TestError::TooFewIntervals(1))
        );
        assert_eq!(
            chi_square_test(&[0.5], 0, 0.05),
            Err(TestError::TooFewIntervals(0))
        );
        assert!(matches!(
            chi_square_test(&[0.5], 10, 0.0),
            Err(TestError::InvalidAlpha(_))
        ));
    }

    #[test]
    fn test_intervals_beyond_sample_size() {
        let sample = vec![0.5; 10];
        for intervals in [11, 1_000_000_000_000, usize::MAX] {
            assert!(matches!(
                chi_square_test(&sample, intervals, 0.05),
                Err(TestError::NumericDegenerate(_))
            ));
        }
        assert!(chi_square_test(&sample, 10, 0.05).is_ok());
    }

    proptest! {
        #[test]
        fn prop_statistic_non_negative(
            sample in prop::collection::vec(0.0f64..1.0, 30..300),
            intervals in 2usize..30,
        ) {
            let result = chi_square_test(&sample, intervals, 0.05).unwrap();
            prop_assert!(result.statistic >= 0.0);
            prop_assert_eq!(result.observed.iter().sum::<u64>() as usize, sample.len());
        }
    }
}
