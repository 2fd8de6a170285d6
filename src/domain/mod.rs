//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - time keys, samples, validated series and output domains
//! - dense interpolation results
//! - calorie bands, summaries and run configuration

pub mod types;

pub use types::*;
