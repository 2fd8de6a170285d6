//! Daily totals.
//!
//! `total_steps` is rounded once to whole steps. `total_calories` is derived
//! from the unrounded total so rounding error does not compound.

use crate::calories::{classify, derive_calories};
use crate::domain::{Bands, CalorieBasis, InterpolationResult, Summary};
use crate::error::InterpError;

/// Summarize a dense per-hour series.
pub fn summarize(
    result: &InterpolationResult,
    factor: f64,
    bands: &Bands,
) -> Result<Summary, InterpError> {
    summarize_with(result, factor, bands, CalorieBasis::PerHour)
}

/// Summarize a dense series under an explicit calorie basis.
///
/// - `PerHour`: values are hourly increments and are summed.
/// - `Cumulative`: values are a running total; the last value is the day total.
pub fn summarize_with(
    result: &InterpolationResult,
    factor: f64,
    bands: &Bands,
    basis: CalorieBasis,
) -> Result<Summary, InterpError> {
    let raw_steps = match basis {
        CalorieBasis::PerHour => result.values().sum::<f64>(),
        CalorieBasis::Cumulative => result.points.last().map(|p| p.value).unwrap_or(0.0),
    };

    let total_calories = derive_calories(raw_steps, factor)?;
    let tier = classify(total_calories, bands).clone();

    Ok(Summary {
        total_steps: raw_steps.round(),
        total_calories,
        tier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Domain, Sample, Series};
    use crate::interp::interpolate;

    #[test]
    fn morning_walk_totals() {
        let series = Series::new(vec![Sample::known(6, 500.0), Sample::known(10, 1800.0)]).unwrap();
        let dense = interpolate(&series, &Domain::span(6, 10).unwrap()).unwrap();

        let summary = summarize(&dense, 0.04, &Bands::default()).unwrap();
        assert_eq!(summary.total_steps, 5750.0);
        assert!((summary.total_calories - 230.0).abs() < 1e-9);
        assert_eq!(summary.tier.label, "active");
    }

    #[test]
    fn single_reading_spread_over_the_morning() {
        let series = Series::new(vec![Sample::known(9, 1200.0)]).unwrap();
        let dense = interpolate(&series, &Domain::span(6, 12).unwrap()).unwrap();
        assert!(dense.values().all(|v| v == 1200.0));

        let summary = summarize(&dense, 0.04, &Bands::default()).unwrap();
        assert_eq!(summary.total_steps, 8400.0);
        assert!((summary.total_calories - 336.0).abs() < 1e-9);
    }

    #[test]
    fn calories_use_unrounded_total() {
        // 3 hours of 100.4 steps: 301.2 total, shown as 301 steps.
        let series = Series::new(vec![Sample::known(1, 100.4), Sample::known(3, 100.4)]).unwrap();
        let dense = interpolate(&series, &Domain::span(1, 3).unwrap()).unwrap();
        let summary = summarize(&dense, 1.0, &Bands::default()).unwrap();
        assert_eq!(summary.total_steps, 301.0);
        assert!((summary.total_calories - 301.2).abs() < 1e-9);
    }

    #[test]
    fn cumulative_basis_uses_last_value() {
        let series = Series::new(vec![Sample::known(6, 500.0), Sample::known(10, 4000.0)]).unwrap();
        let dense = interpolate(&series, &Domain::span(6, 10).unwrap()).unwrap();
        let summary =
            summarize_with(&dense, 0.04, &Bands::default(), CalorieBasis::Cumulative).unwrap();
        assert_eq!(summary.total_steps, 4000.0);
        assert!((summary.total_calories - 160.0).abs() < 1e-9);
        assert_eq!(summary.tier.label, "moderate");
    }

    #[test]
    fn empty_result_summarizes_to_zero() {
        let summary = summarize(&InterpolationResult::default(), 0.04, &Bands::default()).unwrap();
        assert_eq!(summary.total_steps, 0.0);
        assert_eq!(summary.tier.label, "low");
    }

    #[test]
    fn negative_factor_is_rejected() {
        let err = summarize(&InterpolationResult::default(), -1.0, &Bands::default()).unwrap_err();
        assert!(matches!(err, InterpError::InvalidInput(_)));
    }
}
