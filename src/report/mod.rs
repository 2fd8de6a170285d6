//! Per-hour rows and the text blocks printed by `steps fill` / `steps import`.

pub mod format;

pub use format::*;

use crate::calories::hourly_calories;
use crate::domain::{HourRow, InterpolationResult};
use crate::error::InterpError;

/// Pair every dense hour with its calories.
pub fn hour_rows(result: &InterpolationResult, factor: f64) -> Result<Vec<HourRow>, InterpError> {
    let calories = hourly_calories(result, factor)?;
    Ok(result
        .points
        .iter()
        .zip(calories)
        .map(|(p, (_, kcal))| HourRow {
            hour: p.key,
            label: p.key.to_string(),
            steps: p.value,
            calories: kcal,
            interpolated: p.was_interpolated,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InterpolatedPoint, TimeKey};

    #[test]
    fn hour_rows_basic() {
        let result = InterpolationResult {
            points: vec![
                InterpolatedPoint { key: TimeKey(6), value: 500.0, was_interpolated: false },
                InterpolatedPoint { key: TimeKey(7), value: 825.0, was_interpolated: true },
            ],
        };

        let rows = hour_rows(&result, 0.04).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "06:00");
        assert!((rows[1].calories - 33.0).abs() < 1e-9);
        assert!(rows[1].interpolated);

        assert!(hour_rows(&result, -0.04).is_err());
    }
}
