//! Handling of sample values outside the unit interval.

use crate::analysis::TestError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Policy for sample values outside [0, 1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangePolicy {
    /// Pass values through unchanged.
    ///
    /// The KS statistic may then exceed meaningful bounds and the chi-square
    /// test excludes such values from its bins, which biases the statistic.
    #[default]
    Accept,
    /// Fail with [`TestError::OutOfRange`] on the first offending value.
    Reject,
    /// Clamp values into [0, 1]. A clamped 1.0 lands in the last chi-square bin.
    Clamp,
}

impl RangePolicy {
    /// Validates `sample` and applies the policy.
    ///
    /// Non-finite values are always rejected. The input is only copied when
    /// clamping actually changes a value.
    pub fn apply<'a>(self, sample: &'a [f64]) -> Result<Cow<'a, [f64]>, TestError> {
        if let Some((index, &value)) = sample.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(TestError::NonFinite { index, value });
        }

        let out_of_range = |v: f64| !(0.0..1.0).contains(&v);

        match self {
            RangePolicy::Accept => Ok(Cow::Borrowed(sample)),
            RangePolicy::Reject => {
                match sample.iter().enumerate().find(|&(_, &v)| out_of_range(v)) {
                    Some((index, &value)) => Err(TestError::OutOfRange { index, value }),
                    None => Ok(Cow::Borrowed(sample)),
                }
            }
            RangePolicy::Clamp => {
                let clamped = sample.iter().filter(|&&v| out_of_range(v)).count();
                if clamped == 0 {
                    return Ok(Cow::Borrowed(sample));
                }
                tracing::debug!(clamped, "Clamping out-of-range sample values");
                Ok(Cow::Owned(
                    sample.iter().map(|&v| v.clamp(0.0, 1.0)).collect(),
                ))
            }
        }
    }
}
