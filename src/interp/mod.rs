//! Gap filling for hour-indexed series.
//!
//! Known samples are anchors; every other domain key is filled by piecewise
//! linear interpolation between the nearest anchors, or clamped to the nearest
//! anchor outside the anchored range.

pub mod linear;

pub use linear::*;
