//! Random Sequence Uniformity CLI
//!
//! Runs the Kolmogorov-Smirnov, chi-square and autocorrelation tests over a
//! generated or loaded sample and prints the results.

use clap::{Parser, ValueEnum};
use rng_uniformity::{
    analysis::TestBattery,
    config::FileConfig,
    metrics::MetricsRegistry,
    sample::{generate_uniform, load_from_file},
    CriticalValueMode, RangePolicy,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Test a sequence on [0, 1) for uniformity and independence.
#[derive(Debug, Parser)]
#[command(name = "rng-uniformity", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read the sample from a file instead of generating one.
    #[arg(short, long, conflicts_with_all = ["size", "seed", "os_entropy"])]
    input: Option<PathBuf>,

    /// Number of values to generate.
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Seed for the sample generator.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Seed the sample generator from OS entropy.
    #[arg(long, conflicts_with = "seed")]
    os_entropy: bool,

    /// Significance level.
    #[arg(short, long)]
    alpha: Option<f64>,

    /// Number of chi-square intervals.
    #[arg(short = 'k', long)]
    intervals: Option<usize>,

    /// Autocorrelation lag.
    #[arg(short, long)]
    lag: Option<usize>,

    /// Critical value derivation for KS and autocorrelation.
    #[arg(long, value_enum)]
    critical_values: Option<CriticalValuesArg>,

    /// Handling of values outside [0, 1).
    #[arg(long, value_enum)]
    range_policy: Option<RangePolicyArg>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print Prometheus metrics after the report.
    #[arg(long)]
    metrics: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CriticalValuesArg {
    Classic,
    FromAlpha,
}

impl From<CriticalValuesArg> for CriticalValueMode {
    fn from(arg: CriticalValuesArg) -> Self {
        match arg {
            CriticalValuesArg::Classic => CriticalValueMode::Classic,
            CriticalValuesArg::FromAlpha => CriticalValueMode::FromAlpha,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RangePolicyArg {
    Accept,
    Reject,
    Clamp,
}

impl From<RangePolicyArg> for RangePolicy {
    fn from(arg: RangePolicyArg) -> Self {
        match arg {
            RangePolicyArg::Accept => RangePolicy::Accept,
            RangePolicyArg::Reject => RangePolicy::Reject,
            RangePolicyArg::Clamp => RangePolicy::Clamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Toml,
}

impl Cli {
    /// Merges command-line overrides into the file configuration.
    fn resolve_config(&self) -> Result<FileConfig, String> {
        let mut config = match &self.config {
            Some(path) => FileConfig::from_file(path).map_err(|e| e.to_string())?,
            None => FileConfig::default(),
        };

        let battery = &mut config.battery;
        if let Some(alpha) = self.alpha {
            battery.alpha = alpha;
        }
        if let Some(intervals) = self.intervals {
            battery.intervals = intervals;
        }
        if let Some(lag) = self.lag {
            battery.lag = lag;
        }
        if let Some(mode) = self.critical_values {
            battery.critical_values = mode.into();
        }
        if let Some(policy) = self.range_policy {
            battery.range_policy = policy.into();
        }

        if let Some(size) = self.size {
            config.sample.size = size;
        }
        if self.os_entropy {
            config.sample.seed = None;
        } else if let Some(seed) = self.seed {
            config.sample.seed = Some(seed);
        }

        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("RNG Uniformity Tester v{}", rng_uniformity::VERSION);

    let config = match cli.resolve_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let sample = match &cli.input {
        Some(path) => match load_from_file(path) {
            Ok(values) => values,
            Err(e) => {
                eprintln!("Failed to load sample: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            info!(
                size = config.sample.size,
                seed = ?config.sample.seed,
                "Generating sample"
            );
            generate_uniform(config.sample.size, config.sample.seed)
        }
    };

    let battery = TestBattery::new(config.battery);
    let report = battery.run(&sample);

    match cli.format {
        Format::Text => println!("{}", report),
        Format::Toml => match toml::to_string(&report.summary()) {
            Ok(text) => print!("{}", text),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
    }

    if cli.metrics {
        match MetricsRegistry::new() {
            Ok(registry) => {
                registry.record(&report);
                match registry.encode() {
                    Ok(text) => print!("{}", text),
                    Err(e) => warn!("Failed to encode metrics: {}", e),
                }
            }
            Err(e) => warn!("Failed to create metrics registry: {}", e),
        }
    }

    if !report.all_accepted() {
        warn!(
            rejected = ?report.rejections(),
            failed = report.failures().len(),
            "Sample did not pass every test"
        );
    }
}
