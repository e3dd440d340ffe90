//! Metrics collection and registry.

use crate::analysis::BatteryReport;
use prometheus::{
    Encoder, GaugeVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus metrics registry for battery outcomes.
pub struct MetricsRegistry {
    registry: Registry,

    // Battery metrics
    runs_total: IntCounter,
    all_accepted: IntGauge,
    sample_size: IntGauge,

    // Per-test metrics, labelled by test
    rejections_total: IntCounterVec,
    errors_total: IntCounterVec,
    statistic: GaugeVec,
    critical_value: GaugeVec,
}

impl MetricsRegistry {
    /// Creates a new registry with all battery metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let runs_total = IntCounter::new(
            "rng_uniformity_battery_runs_total",
            "Total number of battery runs",
        )?;
        let all_accepted = IntGauge::new(
            "rng_uniformity_battery_all_accepted",
            "Whether the latest run accepted H0 in every test (1=yes, 0=no)",
        )?;
        let sample_size = IntGauge::new(
            "rng_uniformity_sample_size",
            "Number of values in the latest sample",
        )?;

        let rejections_total = IntCounterVec::new(
            Opts::new(
                "rng_uniformity_test_rejections_total",
                "Total number of H0 rejections per test",
            ),
            &["test"],
        )?;
        let errors_total = IntCounterVec::new(
            Opts::new(
                "rng_uniformity_test_errors_total",
                "Total number of runs where a test could not be computed",
            ),
            &["test"],
        )?;
        let statistic = GaugeVec::new(
            Opts::new(
                "rng_uniformity_test_statistic",
                "Test statistic from the latest run",
            ),
            &["test"],
        )?;
        let critical_value = GaugeVec::new(
            Opts::new(
                "rng_uniformity_test_critical_value",
                "Critical value from the latest run",
            ),
            &["test"],
        )?;

        registry.register(Box::new(runs_total.clone()))?;
        registry.register(Box::new(all_accepted.clone()))?;
        registry.register(Box::new(sample_size.clone()))?;
        registry.register(Box::new(rejections_total.clone()))?;
        registry.register(Box::new(errors_total.clone()))?;
        registry.register(Box::new(statistic.clone()))?;
        registry.register(Box::new(critical_value.clone()))?;

        Ok(Self {
            registry,
            runs_total,
            all_accepted,
            sample_size,
            rejections_total,
            errors_total,
            statistic,
            critical_value,
        })
    }

    /// Records the outcome of one battery run.
    pub fn record(&self, report: &BatteryReport) {
        self.runs_total.inc();
        self.all_accepted
            .set(if report.all_accepted() { 1 } else { 0 });
        self.sample_size.set(report.sample_size as i64);

        for (kind, entry) in report.entries() {
            let label = [kind.label()];
            match entry {
                Ok(outcome) => {
                    self.statistic
                        .with_label_values(&label)
                        .set(outcome.statistic());
                    self.critical_value
                        .with_label_values(&label)
                        .set(outcome.critical_value());
                    // Touch the counter so the series exists even without rejections
                    let rejections = self.rejections_total.with_label_values(&label);
                    if !outcome.decision().is_accept() {
                        rejections.inc();
                    }
                }
                Err(_) => self.errors_total.with_label_values(&label).inc(),
            }
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
