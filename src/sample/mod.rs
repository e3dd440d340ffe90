//! Sample preparation and sources.
//!
//! A sample is a plain `&[f64]`. This module decides what happens to values
//! outside the unit interval and offers reproducible sample generation for
//! drivers and benchmarks.

mod range;
mod source;

pub use range::RangePolicy;
pub use source::{generate_uniform, load_from_file, parse_values, SampleError};
