//! Decision records and shared test parameters.

use super::error::TestError;
use crate::sample::RangePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Outcome of a hypothesis test against H0: "the sequence is uniform and independent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// H0 is not rejected at the chosen significance level.
    #[serde(rename = "Accept H0")]
    Accept,
    /// H0 is rejected.
    #[serde(rename = "Reject H0")]
    Reject,
}

impl Decision {
    /// Accepts H0 when `within_bounds` holds, rejects otherwise.
    #[inline]
    pub fn accept_if(within_bounds: bool) -> Self {
        if within_bounds {
            Decision::Accept
        } else {
            Decision::Reject
        }
    }

    /// Returns true for [`Decision::Accept`].
    #[inline]
    pub fn is_accept(self) -> bool {
        self == Decision::Accept
    }

    /// Literal label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Accept => "Accept H0",
            Decision::Reject => "Reject H0",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Significance level alpha, guaranteed to lie in (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SignificanceLevel(f64);

impl SignificanceLevel {
    /// Validates and wraps an alpha value.
    pub fn new(alpha: f64) -> Result<Self, TestError> {
        if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
            Ok(Self(alpha))
        } else {
            Err(TestError::InvalidAlpha(alpha))
        }
    }

    /// Returns alpha.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the confidence level `1 - alpha`.
    #[inline]
    pub fn confidence(self) -> f64 {
        1.0 - self.0
    }
}

impl Default for SignificanceLevel {
    fn default() -> Self {
        Self(DEFAULT_ALPHA)
    }
}

impl TryFrom<f64> for SignificanceLevel {
    type Error = TestError;

    fn try_from(alpha: f64) -> Result<Self, Self::Error> {
        Self::new(alpha)
    }
}

impl From<SignificanceLevel> for f64 {
    fn from(level: SignificanceLevel) -> Self {
        level.0
    }
}

impl fmt::Display for SignificanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the KS and autocorrelation critical values are obtained.
///
/// The chi-square test always derives its critical value from alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CriticalValueMode {
    /// Fixed constants calibrated for alpha = 0.05: `1.36 / sqrt(n)` for KS
    /// and `1.96` for the autocorrelation Z. Alpha is informational only.
    #[default]
    Classic,
    /// Quantiles computed from alpha: Kolmogorov distribution for KS,
    /// standard normal for the autocorrelation Z.
    FromAlpha,
}

/// Options shared by all three tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOptions {
    /// Critical value derivation.
    #[serde(default)]
    pub critical_values: CriticalValueMode,
    /// Handling of values outside [0, 1).
    #[serde(default)]
    pub range_policy: RangePolicy,
}

impl TestOptions {
    /// Options with alpha-derived critical values.
    pub fn from_alpha() -> Self {
        Self {
            critical_values: CriticalValueMode::FromAlpha,
            ..Default::default()
        }
    }
}

/// Identifies one of the three tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Kolmogorov-Smirnov uniformity test.
    KolmogorovSmirnov,
    /// Chi-square uniformity test.
    ChiSquare,
    /// Lagged autocorrelation independence test.
    Autocorrelation,
}

impl TestKind {
    /// All tests in report order.
    pub const ALL: [TestKind; 3] = [
        TestKind::KolmogorovSmirnov,
        TestKind::ChiSquare,
        TestKind::Autocorrelation,
    ];

    /// Human-readable test name.
    pub fn name(self) -> &'static str {
        match self {
            TestKind::KolmogorovSmirnov => "Kolmogorov-Smirnov",
            TestKind::ChiSquare => "Chi-Square",
            TestKind::Autocorrelation => "Autocorrelation",
        }
    }

    /// Short identifier used as a metric label.
    pub fn label(self) -> &'static str {
        match self {
            TestKind::KolmogorovSmirnov => "ks",
            TestKind::ChiSquare => "chi_square",
            TestKind::Autocorrelation => "autocorrelation",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common view over the three result records.
pub trait TestOutcome {
    /// Which test produced the result.
    fn kind(&self) -> TestKind;

    /// Human-readable test name.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// The test statistic compared against the critical value.
    fn statistic(&self) -> f64;

    /// Threshold for rejecting H0.
    fn critical_value(&self) -> f64;

    /// Accept/reject verdict.
    fn decision(&self) -> Decision;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_labels() {
        assert_eq!(Decision::Accept.to_string(), "Accept H0");
        assert_eq!(Decision::Reject.to_string(), "Reject H0");
        assert_eq!(Decision::accept_if(true), Decision::Accept);
        assert_eq!(Decision::accept_if(false), Decision::Reject);
    }

    #[test]
    fn test_alpha_bounds() {
        assert!(SignificanceLevel::new(0.05).is_ok());
        assert!(SignificanceLevel::new(0.999).is_ok());
        for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                SignificanceLevel::new(bad),
                Err(TestError::InvalidAlpha(_))
            ));
        }
    }

    #[test]
    fn test_default_alpha() {
        let alpha = SignificanceLevel::default();
        assert_eq!(alpha.value(), 0.05);
        assert!((alpha.confidence() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_options_deserialize_kebab_case() {
        let options: TestOptions =
            toml::from_str("critical_values = \"from-alpha\"\nrange_policy = \"clamp\"").unwrap();
        assert_eq!(options.critical_values, CriticalValueMode::FromAlpha);
        assert_eq!(options.range_policy, RangePolicy::Clamp);
    }
}
