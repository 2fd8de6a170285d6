//! Piecewise-linear interpolation with flat extrapolation.
//!
//! For each domain key `x`:
//!
//! ```text
//! x == anchor key            -> anchor value (exact, no smoothing)
//! x0 < x < x1 (anchors)      -> y0 + (y1 - y0) * (x - x0) / (x1 - x0)
//! x < first anchor           -> first anchor value
//! x > last anchor            -> last anchor value
//! ```
//!
//! With a single anchor every key receives that anchor's value.

use crate::domain::{Domain, InterpolatedPoint, InterpolationResult, Series, TimeKey};
use crate::error::InterpError;

/// Fill `domain` from the known samples in `series`.
///
/// Fails with `InsufficientData` when the series has no known sample.
pub fn interpolate(series: &Series, domain: &Domain) -> Result<InterpolationResult, InterpError> {
    let anchors: Vec<(TimeKey, f64)> = series.known().collect();
    tracing::trace!(known = anchors.len(), keys = domain.len(), "interpolating series");

    if anchors.is_empty() {
        return Err(InterpError::InsufficientData {
            known: 0,
            required: 1,
        });
    }

    let points = domain
        .keys()
        .iter()
        .map(|&key| point_at(&anchors, key))
        .collect();

    Ok(InterpolationResult { points })
}

fn point_at(anchors: &[(TimeKey, f64)], key: TimeKey) -> InterpolatedPoint {
    // First anchor whose key is >= `key`.
    let idx = anchors.partition_point(|&(k, _)| k < key);

    if let Some(&(k, v)) = anchors.get(idx) {
        if k == key {
            return InterpolatedPoint {
                key,
                value: v,
                was_interpolated: false,
            };
        }
    }

    let value = match (idx.checked_sub(1).and_then(|i| anchors.get(i)), anchors.get(idx)) {
        (Some(&(x0, y0)), Some(&(x1, y1))) => lerp(x0.as_f64(), x1.as_f64(), y0, y1, key.as_f64()),
        (Some(&(_, y)), None) | (None, Some(&(_, y))) => y,
        // `anchors` is never empty here.
        (None, None) => 0.0,
    };

    InterpolatedPoint {
        key,
        value,
        was_interpolated: true,
    }
}

#[inline]
fn lerp(x0: f64, x1: f64, y0: f64, y1: f64, x: f64) -> f64 {
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
