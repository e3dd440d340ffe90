//! Prometheus metrics for battery outcomes.
//!
//! # Metrics Exposed
//!
//! - `rng_uniformity_battery_runs_total` - Total battery runs
//! - `rng_uniformity_battery_all_accepted` - Latest composite verdict (1=all accepted)
//! - `rng_uniformity_sample_size` - Size of the latest sample
//! - `rng_uniformity_test_rejections_total{test}` - H0 rejections per test
//! - `rng_uniformity_test_errors_total{test}` - Runs where a test could not be computed
//! - `rng_uniformity_test_statistic{test}` - Latest statistic per test
//! - `rng_uniformity_test_critical_value{test}` - Latest critical value per test
//!
//! The `test` label is one of `ks`, `chi_square` or `autocorrelation`.
//!
//! # Example
//!
//! ```
//! use rng_uniformity::{metrics::MetricsRegistry, TestBattery};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! let sample: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
//!
//! registry.record(&TestBattery::default().run(&sample));
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry};
