//! Error taxonomy for the statistical tests.

use thiserror::Error;

/// Errors that can occur while running a test.
///
/// Every variant except [`TestError::NumericDegenerate`] is an invalid-input
/// condition: the caller supplied a sample or parameter the test cannot
/// work with. All conditions fail fast instead of producing NaN or infinity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestError {
    #[error("sample is empty")]
    EmptySample,

    #[error("significance level {0} must lie strictly between 0 and 1")]
    InvalidAlpha(f64),

    #[error("at least 2 intervals are required, got {0}")]
    TooFewIntervals(usize),

    #[error("lag {lag} leaves no lagged pairs in a sample of {sample_size} values")]
    InvalidLag { lag: usize, sample_size: usize },

    #[error("sample value {value} at index {index} is not finite")]
    NonFinite { index: usize, value: f64 },

    #[error("sample value {value} at index {index} lies outside [0, 1)")]
    OutOfRange { index: usize, value: f64 },

    #[error("numerically degenerate computation: {0}")]
    NumericDegenerate(String),
}

impl TestError {
    /// Returns true if the error stems from an invalid sample or parameter.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, TestError::NumericDegenerate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(TestError::EmptySample.is_invalid_input());
        assert!(TestError::InvalidLag {
            lag: 5,
            sample_size: 4
        }
        .is_invalid_input());
        assert!(!TestError::NumericDegenerate("zero expected count".into()).is_invalid_input());
    }

    #[test]
    fn test_messages_are_descriptive() {
        let err = TestError::OutOfRange {
            index: 3,
            value: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "sample value 1.5 at index 3 lies outside [0, 1)"
        );
    }
}
