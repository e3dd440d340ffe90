//! Lagged autocorrelation test for independence.
//!
//! Under H0 the product of two independent Uniform(0, 1) values has
//! expectation 1/4, so the mean lagged product minus 0.25 estimates the
//! serial correlation at the given lag.

use super::decision::{
    CriticalValueMode, Decision, SignificanceLevel, TestKind, TestOptions, TestOutcome,
};
use super::error::TestError;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Default lag between paired positions.
pub const DEFAULT_LAG: usize = 1;

/// Two-tailed standard normal critical value at alpha = 0.05.
pub const CLASSIC_CRITICAL_Z: f64 = 1.96;

/// Expected product of two independent Uniform(0, 1) values.
const EXPECTED_PRODUCT: f64 = 0.25;

/// Autocorrelation test result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutocorrelationResult {
    /// Mean lagged product minus 0.25.
    pub autocorrelation: f64,
    /// Standardized estimate.
    pub z_value: f64,
    /// Two-tailed acceptance bound for `z_value`.
    pub critical_z: f64,
    /// Standard deviation of the estimate under H0.
    pub std_dev: f64,
    /// Offset between paired positions.
    pub lag: usize,
    /// Number of lagged pairs used.
    pub pairs: usize,
    /// Verdict.
    pub decision: Decision,
}

impl TestOutcome for AutocorrelationResult {
    fn kind(&self) -> TestKind {
        TestKind::Autocorrelation
    }

    fn statistic(&self) -> f64 {
        self.z_value
    }

    fn critical_value(&self) -> f64 {
        self.critical_z
    }

    fn decision(&self) -> Decision {
        self.decision
    }
}

/// Runs the autocorrelation test with the classic critical Z of 1.96.
pub fn autocorrelation_test(
    sample: &[f64],
    lag: usize,
    alpha: f64,
) -> Result<AutocorrelationResult, TestError> {
    autocorrelation_test_with(sample, lag, alpha, &TestOptions::default())
}

/// Runs the autocorrelation test with explicit options.
pub fn autocorrelation_test_with(
    sample: &[f64],
    lag: usize,
    alpha: f64,
    options: &TestOptions,
) -> Result<AutocorrelationResult, TestError> {
    let alpha = SignificanceLevel::new(alpha)?;
    if sample.is_empty() {
        return Err(TestError::EmptySample);
    }

    let pairs = lagged_pairs(sample.len(), lag)?;
    let prepared = options.range_policy.apply(sample)?;
    let values: &[f64] = &prepared;

    let product_sum: f64 = values
        .iter()
        .zip(&values[lag..])
        .take(pairs)
        .map(|(a, b)| a * b)
        .sum();
    let autocorrelation = product_sum / pairs as f64 - EXPECTED_PRODUCT;

    let m = pairs as f64;
    let std_dev = ((13.0 * m + 7.0) / (12.0 * m)).sqrt();
    let z_value = autocorrelation / std_dev;

    let critical_z = match options.critical_values {
        CriticalValueMode::Classic => CLASSIC_CRITICAL_Z,
        CriticalValueMode::FromAlpha => {
            Normal::standard().inverse_cdf(1.0 - alpha.value() / 2.0)
        }
    };

    let decision = Decision::accept_if((-critical_z..=critical_z).contains(&z_value));

    tracing::debug!(
        n = values.len(),
        lag,
        pairs,
        autocorrelation,
        z = z_value,
        critical = critical_z,
        %decision,
        "Autocorrelation test"
    );

    Ok(AutocorrelationResult {
        autocorrelation,
        z_value,
        critical_z,
        std_dev,
        lag,
        pairs,
        decision,
    })
}

/// Number of lagged pairs, `floor((n - lag - 1) / lag)`, which must be at least 1.
fn lagged_pairs(sample_size: usize, lag: usize) -> Result<usize, TestError> {
    let invalid = TestError::InvalidLag { lag, sample_size };
    if lag == 0 || lag >= sample_size {
        return Err(invalid);
    }
    match sample_size.checked_sub(lag + 1).map(|rest| rest / lag) {
        Some(pairs) if pairs >= 1 => Ok(pairs),
        _ => Err(invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_case_is_exactly_zero() {
        let sample = vec![0.5; 100];
        let result = autocorrelation_test(&sample, 1, 0.05).unwrap();

        assert_eq!(result.autocorrelation, 0.0);
        assert_eq!(result.z_value, 0.0);
        assert_eq!(result.critical_z, 1.96);
        assert_eq!(result.decision, Decision::Accept);
    }

    #[test]
    fn test_hand_computed_estimate() {
        // m = 3; products 0.02 + 0.06 + 0.12 = 0.2
        let sample = [0.1, 0.2, 0.3, 0.4, 0.5];
        let result = autocorrelation_test(&sample, 1, 0.05).unwrap();

        assert_eq!(result.pairs, 3);
        assert!((result.autocorrelation - (0.2 / 3.0 - 0.25)).abs() < 1e-12);
        assert!((result.std_dev - (46.0f64 / 36.0).sqrt()).abs() < 1e-12);
        assert!((result.z_value - result.autocorrelation / result.std_dev).abs() < 1e-12);
    }

    #[test]
    fn test_pair_count() {
        assert_eq!(lagged_pairs(100, 1), Ok(98));
        assert_eq!(lagged_pairs(100, 3), Ok(32));
        assert_eq!(lagged_pairs(10, 4), Ok(1));
        assert!(lagged_pairs(usize::MAX, usize::MAX).is_err());
    }

    #[test]
    fn test_lag_boundary() {
        let sample = vec![0.5; 10];
        for lag in [0, 5, 9, 10, 50, usize::MAX - 1, usize::MAX] {
            assert_eq!(
                autocorrelation_test(&sample, lag, 0.05),
                Err(TestError::InvalidLag {
                    lag,
                    sample_size: 10
                }),
                "lag {lag}"
            );
        }
    }

    #[test]
    fn test_empty_sample() {
        assert_eq!(
            autocorrelation_test(&[], 1, 0.05),
            Err(TestError::EmptySample)
        );
    }

    #[test]
    fn test_from_alpha_critical_z() {
        let sample = vec![0.5; 20];
        let result =
            autocorrelation_test_with(&sample, 1, 0.05, &TestOptions::from_alpha()).unwrap();
        assert!((result.critical_z - 1.959964).abs() < 1e-5);
    }

    #[test]
    fn test_strong_correlation_rejected_at_loose_alpha() {
        // Z ≈ 0.70 against a critical Z of about 0.52
        let sample = vec![0.99; 100];
        let result =
            autocorrelation_test_with(&sample, 1, 0.6, &TestOptions::from_alpha()).unwrap();
        assert!(result.z_value > result.critical_z);
        assert_eq!(result.decision, Decision::Reject);
    }

    #[test]
    fn test_out_of_range_values_can_reject_classic() {
        let sample = vec![3.0; 20];
        let result = autocorrelation_test(&sample, 2, 0.05).unwrap();
        assert_eq!(result.decision, Decision::Reject);
    }
}
