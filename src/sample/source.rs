//! Sample sequences for driving the tests.
//!
//! The tests themselves never generate randomness; these helpers exist so
//! callers can produce a reproducible sample or read one from disk.

use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng};
use std::path::Path;
use thiserror::Error;

/// Scale from a 53-bit integer to [0, 1).
const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

/// Errors that can occur while loading a sample.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to read sample file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid number {token:?} on line {line}")]
    Parse { line: usize, token: String },
}

/// Generates `size` values uniformly distributed on [0, 1).
///
/// With a seed the sequence is reproducible (ChaCha20); without one the
/// generator is seeded from the OS entropy source.
pub fn generate_uniform(size: usize, seed: Option<u64>) -> Vec<f64> {
    let mut rng = match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => {
            let mut seed = [0u8; 32];
            OsRng.fill_bytes(&mut seed);
            ChaCha20Rng::from_seed(seed)
        }
    };

    (0..size)
        .map(|_| (rng.next_u64() >> 11) as f64 * UNIT_SCALE)
        .collect()
}

/// Parses values separated by whitespace or commas. `#` starts a comment.
pub fn parse_values(content: &str) -> Result<Vec<f64>, SampleError> {
    let mut values = Vec::new();

    for (number, line) in content.lines().enumerate() {
        let data = line.split('#').next().unwrap_or_default();
        for token in data
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let value = token.parse::<f64>().map_err(|_| SampleError::Parse {
                line: number + 1,
                token: token.to_string(),
            })?;
            values.push(value);
        }
    }

    Ok(values)
}

/// Loads a sample from a text file (see [`parse_values`]).
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<f64>, SampleError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let values = parse_values(&content)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        values = values.len(),
        "Loaded sample"
    );
    Ok(values)
}
