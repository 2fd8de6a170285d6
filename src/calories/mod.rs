//! Calorie derivation and band lookup.
//!
//! Calories scale linearly with steps (`steps * kcal_per_step`). Nothing here
//! rounds; rounding happens once, when a summary or report is produced.

use crate::domain::{Band, Bands, InterpolationResult, TimeKey};
use crate::error::InterpError;

pub mod summary;

pub use summary::*;

/// `steps * factor`, both of which must be finite and `>= 0`.
pub fn derive_calories(steps: f64, factor: f64) -> Result<f64, InterpError> {
    if !steps.is_finite() || steps < 0.0 {
        return Err(InterpError::invalid(format!(
            "step count must be a finite number >= 0 (got {steps})."
        )));
    }
    if !factor.is_finite() || factor < 0.0 {
        return Err(InterpError::invalid(format!(
            "calories per step must be a finite number >= 0 (got {factor})."
        )));
    }
    Ok(steps * factor)
}

/// Per-key calories for a dense series.
pub fn hourly_calories(
    result: &InterpolationResult,
    factor: f64,
) -> Result<Vec<(TimeKey, f64)>, InterpError> {
    result
        .points
        .iter()
        .map(|p| Ok((p.key, derive_calories(p.value, factor)?)))
        .collect()
}

/// The first band whose upper bound exceeds `calories`; otherwise the last band.
pub fn classify(calories: f64, bands: &Bands) -> &Band {
    let Some((last, rest)) = bands.as_slice().split_last() else {
        unreachable!("`Bands` is never empty");
    };
    rest.iter()
        .find(|b| b.upper.is_some_and(|u| calories < u))
        .unwrap_or(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Domain, Sample, Series};
    use crate::interp::interpolate;

    #[test]
    fn derive_calories_scales_steps() {
        assert!((derive_calories(5750.0, 0.04).unwrap() - 230.0).abs() < 1e-9);
        assert_eq!(derive_calories(0.0, 0.04).unwrap(), 0.0);
    }

    #[test]
    fn derive_calories_rejects_negative_or_nan() {
        assert!(matches!(derive_calories(-1.0, 0.04), Err(InterpError::InvalidInput(_))));
        assert!(matches!(derive_calories(100.0, -0.1), Err(InterpError::InvalidInput(_))));
        assert!(matches!(derive_calories(f64::NAN, 0.04), Err(InterpError::InvalidInput(_))));
    }

    #[test]
    fn classify_walks_bands_in_order() {
        let bands = Bands::default();
        assert_eq!(classify(0.0, &bands).label, "low");
        assert_eq!(classify(99.99, &bands).label, "low");
        assert_eq!(classify(100.0, &bands).label, "moderate");
        assert_eq!(classify(230.0, &bands).label, "active");
        assert_eq!(classify(10_000.0, &bands).label, "very active");
    }

    #[test]
    fn classify_with_closed_top_band_falls_back_to_last() {
        let bands = Bands::new(vec![
            Band::new(Some(50.0), "a", ""),
            Band::new(Some(60.0), "b", ""),
        ])
        .unwrap();
        assert_eq!(classify(75.0, &bands).label, "b");
        assert_eq!(classify(55.0, &bands).label, "b");

        let single = Bands::new(vec![Band::new(None, "any", "")]).unwrap();
        assert_eq!(classify(0.0, &single).label, "any");
        assert_eq!(classify(1e9, &single).label, "any");
    }

    #[test]
    fn hourly_calories_follow_dense_series() {
        let series = Series::new(vec![Sample::known(6, 500.0), Sample::known(10, 1800.0)]).unwrap();
        let dense = interpolate(&series, &Domain::span(6, 10).unwrap()).unwrap();
        let kcal = hourly_calories(&dense, 0.04).unwrap();
        assert_eq!(kcal.len(), 5);
        assert!((kcal[1].1 - 33.0).abs() < 1e-9);
        assert_eq!(kcal[4].0, TimeKey(10));
    }
}
