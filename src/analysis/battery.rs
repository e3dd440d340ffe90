//! Composite assessment over one sample.
//!
//! Runs the three tests independently on the same sequence. A failure in
//! one test does not prevent the others from producing a verdict. No
//! multiple-testing correction is applied across the three decisions.

use super::{
    autocorrelation::{autocorrelation_test_with, AutocorrelationResult, DEFAULT_LAG},
    chi_square::{chi_square_test_with, ChiSquareResult, DEFAULT_INTERVALS},
    decision::{
        CriticalValueMode, Decision, SignificanceLevel, TestKind, TestOptions, TestOutcome,
        DEFAULT_ALPHA,
    },
    error::TestError,
    kolmogorov::{ks_test_with, KsResult},
};
use crate::sample::RangePolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters for a battery run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Significance level shared by all tests.
    pub alpha: f64,
    /// Number of chi-square intervals.
    pub intervals: usize,
    /// Autocorrelation lag.
    pub lag: usize,
    /// Critical value derivation for KS and autocorrelation.
    pub critical_values: CriticalValueMode,
    /// Handling of values outside [0, 1).
    pub range_policy: RangePolicy,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            intervals: DEFAULT_INTERVALS,
            lag: DEFAULT_LAG,
            critical_values: CriticalValueMode::Classic,
            range_policy: RangePolicy::Accept,
        }
    }
}

impl BatteryConfig {
    /// Checks the parameters that do not depend on the sample.
    pub fn validate(&self) -> Result<(), TestError> {
        SignificanceLevel::new(self.alpha)?;
        if self.intervals < 2 {
            return Err(TestError::TooFewIntervals(self.intervals));
        }
        if self.lag == 0 {
            return Err(TestError::InvalidLag {
                lag: 0,
                sample_size: 0,
            });
        }
        Ok(())
    }

    /// Options passed to each test.
    pub fn options(&self) -> TestOptions {
        TestOptions {
            critical_values: self.critical_values,
            range_policy: self.range_policy,
        }
    }
}

/// Per-test results from one battery run.
#[derive(Debug, Clone)]
pub struct BatteryReport {
    /// Number of values in the sample.
    pub sample_size: usize,
    /// When the run completed.
    pub generated_at: DateTime<Utc>,
    /// Kolmogorov-Smirnov outcome.
    pub ks: Result<KsResult, TestError>,
    /// Chi-square outcome.
    pub chi_square: Result<ChiSquareResult, TestError>,
    /// Autocorrelation outcome.
    pub autocorrelation: Result<AutocorrelationResult, TestError>,
}

impl BatteryReport {
    /// Results in report order, viewed through [`TestOutcome`].
    pub fn entries(&self) -> [(TestKind, Result<&dyn TestOutcome, &TestError>); 3] {
        fn view<T: TestOutcome>(r: &Result<T, TestError>) -> Result<&dyn TestOutcome, &TestError> {
            r.as_ref().map(|outcome| outcome as &dyn TestOutcome)
        }
        [
            (TestKind::KolmogorovSmirnov, view(&self.ks)),
            (TestKind::ChiSquare, view(&self.chi_square)),
            (TestKind::Autocorrelation, view(&self.autocorrelation)),
        ]
    }

    /// True when every test ran and accepted H0.
    pub fn all_accepted(&self) -> bool {
        self.entries()
            .iter()
            .all(|(_, entry)| matches!(entry, Ok(outcome) if outcome.decision().is_accept()))
    }

    /// Tests that ran and rejected H0.
    pub fn rejections(&self) -> Vec<TestKind> {
        self.entries()
            .iter()
            .filter(|(_, entry)| matches!(entry, Ok(outcome) if !outcome.decision().is_accept()))
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Tests that could not run.
    pub fn failures(&self) -> Vec<(TestKind, &TestError)> {
        self.entries()
            .into_iter()
            .filter_map(|(kind, entry)| entry.err().map(|e| (kind, e)))
            .collect()
    }

    /// Flat, serializable view of the report.
    pub fn summary(&self) -> ReportSummary {
        let tests = self
            .entries()
            .into_iter()
            .map(|(kind, entry)| match entry {
                Ok(outcome) => TestRecord {
                    test: kind.name().to_string(),
                    statistic: Some(outcome.statistic()),
                    critical_value: Some(outcome.critical_value()),
                    decision: Some(outcome.decision()),
                    error: None,
                },
                Err(e) => TestRecord {
                    test: kind.name().to_string(),
                    statistic: None,
                    critical_value: None,
                    decision: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        ReportSummary {
            generated_at: self.generated_at,
            sample_size: self.sample_size,
            all_accepted: self.all_accepted(),
            tests,
        }
    }
}

impl fmt::Display for BatteryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sample size: {}", self.sample_size)?;

        match &self.ks {
            Ok(r) => writeln!(
                f,
                "Kolmogorov-Smirnov Test: D = {:.6}, Critical Value = {:.6}, Decision = {}",
                r.statistic, r.critical_value, r.decision
            )?,
            Err(e) => writeln!(f, "Kolmogorov-Smirnov Test: error: {e}")?,
        }

        match &self.chi_square {
            Ok(r) => writeln!(
                f,
                "Chi-Square Test: Statistic = {:.6}, Critical Value = {:.6}, Decision = {}",
                r.statistic, r.critical_value, r.decision
            )?,
            Err(e) => writeln!(f, "Chi-Square Test: error: {e}")?,
        }

        match &self.autocorrelation {
            Ok(r) => writeln!(
                f,
                "Autocorrelation Test (lag {}): Autocorrelation = {:.6}, Z-Value = {:.6}, Critical Z = {:.4}, Decision = {}",
                r.lag, r.autocorrelation, r.z_value, r.critical_z, r.decision
            )?,
            Err(e) => writeln!(f, "Autocorrelation Test: error: {e}")?,
        }

        let verdict = if self.all_accepted() {
            Decision::Accept
        } else {
            Decision::Reject
        };
        write!(f, "Composite: {verdict}")
    }
}

/// One row of a [`ReportSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRecord {
    /// Test name.
    pub test: String,
    /// Test statistic, absent if the test failed.
    pub statistic: Option<f64>,
    /// Critical value, absent if the test failed.
    pub critical_value: Option<f64>,
    /// Verdict, absent if the test failed.
    pub decision: Option<Decision>,
    /// Failure description.
    pub error: Option<String>,
}

/// Serializable battery summary.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    /// When the run completed.
    pub generated_at: DateTime<Utc>,
    /// Number of values in the sample.
    pub sample_size: usize,
    /// True when every test ran and accepted H0.
    pub all_accepted: bool,
    /// Per-test rows.
    pub tests: Vec<TestRecord>,
}

/// Runs all three tests with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct TestBattery {
    config: BatteryConfig,
}

impl TestBattery {
    /// Creates a battery with the given configuration.
    pub fn new(config: BatteryConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BatteryConfig {
        &self.config
    }

    /// Runs every test on `sample`.
    pub fn run(&self, sample: &[f64]) -> BatteryReport {
        let options = self.config.options();
        let alpha = self.config.alpha;

        let report = BatteryReport {
            sample_size: sample.len(),
            generated_at: Utc::now(),
            ks: ks_test_with(sample, alpha, &options),
            chi_square: chi_square_test_with(sample, self.config.intervals, alpha, &options),
            autocorrelation: autocorrelation_test_with(sample, self.config.lag, alpha, &options),
        };

        for (kind, error) in report.failures() {
            tracing::warn!(test = %kind, error = %error, "Test could not run");
        }

        if report.all_accepted() {
            tracing::info!(n = sample.len(), "All tests accept H0");
        } else {
            let rejected: Vec<&str> = report.rejections().iter().map(|k| k.name()).collect();
            tracing::info!(n = sample.len(), ?rejected, "Battery completed with rejections");
        }

        report
    }
}
