//! Uniformity and independence tests.
//!
//! Three independent, pure procedures over a sample drawn from [0, 1):
//!
//! - [`ks_test`]: Kolmogorov-Smirnov distance to Uniform(0, 1)
//! - [`chi_square_test`]: Pearson chi-square over equal-width bins
//! - [`autocorrelation_test`]: lagged product autocorrelation
//!
//! Each returns a fresh result record with a statistic, a critical value
//! and an accept/reject [`Decision`] for H0. No state is shared between
//! calls, and the caller's slice is never modified.

mod autocorrelation;
mod battery;
mod chi_square;
mod decision;
mod error;
mod kolmogorov;

pub use autocorrelation::{
    autocorrelation_test, autocorrelation_test_with, AutocorrelationResult, CLASSIC_CRITICAL_Z,
    DEFAULT_LAG,
};
pub use battery::{BatteryConfig, BatteryReport, ReportSummary, TestBattery, TestRecord};
pub use chi_square::{chi_square_test, chi_square_test_with, ChiSquareResult, DEFAULT_INTERVALS};
pub use decision::{
    CriticalValueMode, Decision, SignificanceLevel, TestKind, TestOptions, TestOutcome,
    DEFAULT_ALPHA,
};
pub use error::TestError;
pub use kolmogorov::{
    kolmogorov_quantile, kolmogorov_survival, ks_test, ks_test_with, KsResult,
    CLASSIC_KS_COEFFICIENT,
};
