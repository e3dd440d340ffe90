//! Configuration file support.
//!
//! ```toml
//! [battery]
//! alpha = 0.05
//! intervals = 10
//! lag = 1
//! critical_values = "classic"   # or "from-alpha"
//! range_policy = "accept"       # or "reject", "clamp"
//!
//! [sample]
//! size = 100
//! seed = 15
//! ```

use crate::analysis::{BatteryConfig, TestError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    #[error("invalid battery parameters: {0}")]
    InvalidBattery(#[from] TestError),
    #[error("sample size must be positive")]
    EmptySample,
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Test parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Generated sample parameters.
    #[serde(default)]
    pub sample: SampleConfig,
}

/// Generated sample configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Number of values to generate.
    pub size: usize,
    /// Generator seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            size: 100,
            seed: Some(15),
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.battery.validate()?;
        if self.sample.size == 0 {
            return Err(ConfigError::EmptySample);
        }
        Ok(())
    }
}
