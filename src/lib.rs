//! Random Sequence Uniformity Testing Library
//!
//! Evaluates whether a finite sequence of numbers from [0, 1) behaves like
//! the output of a uniform, independent random source. Three classical
//! hypothesis tests are provided, each reporting a statistic, a critical
//! value and an accept/reject decision for H0: "the sequence is uniform
//! and independent".
//!
//! # Architecture
//!
//! ```text
//! sample ──┬── ks_test ───────────────┐
//!          ├── chi_square_test ───────┼── BatteryReport ── metrics
//!          └── autocorrelation_test ──┘
//! ```
//!
//! # Design Principles
//!
//! - **Pure**: every test is a deterministic function of (sample, alpha, parameter)
//! - **Non-mutating**: samples are borrowed; KS sorts an owned copy
//! - **Fail-fast**: invalid input returns [`TestError`] instead of NaN
//! - **Documented limits**: classic KS and autocorrelation critical values
//!   are calibrated for alpha = 0.05 only; see [`CriticalValueMode`]
//!
//! # Example
//!
//! ```
//! use rng_uniformity::{
//!     analysis::{autocorrelation_test, chi_square_test, ks_test},
//!     sample::generate_uniform,
//! };
//!
//! let sample = generate_uniform(100, Some(15));
//!
//! let ks = ks_test(&sample, 0.05).unwrap();
//! let chi = chi_square_test(&sample, 10, 0.05).unwrap();
//! let auto = autocorrelation_test(&sample, 3, 0.05).unwrap();
//!
//! assert!(ks.statistic >= 0.0);
//! assert!((chi.critical_value - 16.92).abs() < 0.01);
//! assert_eq!(auto.lag, 3);
//! println!("KS: {}, Chi-Square: {}, Autocorrelation: {}", ks.decision, chi.decision, auto.decision);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod metrics;
pub mod sample;

// Re-export commonly used types at crate root
pub use analysis::{
    autocorrelation_test, chi_square_test, ks_test, BatteryConfig, BatteryReport,
    CriticalValueMode, Decision, TestBattery, TestError, TestOptions,
};
pub use config::FileConfig;
pub use sample::RangePolicy;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
