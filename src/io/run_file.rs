//! Read/write run JSON files.
//!
//! A run file is the portable record of one computation:
//! - calorie factor and basis
//! - the dense per-hour table (with interpolation flags)
//! - the summary and its band
//!
//! The schema is defined by `domain::RunFile`. `steps plot --run` re-renders it.

use std::fs::File;
use std::path::Path;

use chrono::Local;

use crate::domain::{CalorieBasis, HourRow, RunFile, Summary};
use crate::error::AppError;

/// Assemble a run file stamped with the current local time.
pub fn build_run_file(
    rows: &[HourRow],
    summary: &Summary,
    kcal_per_step: f64,
    basis: CalorieBasis,
) -> RunFile {
    RunFile {
        tool: "steps".to_string(),
        generated_at: Local::now().to_rfc3339(),
        kcal_per_step,
        basis,
        hours: rows.to_vec(),
        summary: summary.clone(),
    }
}

/// Write a run JSON file.
pub fn write_run_json(path: &Path, run: &RunFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create run JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, run)
        .map_err(|e| AppError::new(4, format!("Failed to write run JSON: {e}")))?;

    Ok(())
}

/// Read a run JSON file.
pub fn read_run_json(path: &Path) -> Result<RunFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open run JSON '{}': {e}", path.display())))?;
    let run: RunFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid run JSON: {e}")))?;
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Band, TimeKey};

    #[test]
    fn run_file_survives_disk() {
        let rows = vec![HourRow {
            hour: TimeKey(9),
            label: "09:00".to_string(),
            steps: 1200.0,
            calories: 48.0,
            interpolated: false,
        }];
        let summary = Summary {
            total_steps: 1200.0,
            total_calories: 48.0,
            tier: Band::new(Some(100.0), "low", "Walk more."),
        };
        let run = build_run_file(&rows, &summary, 0.04, CalorieBasis::PerHour);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        write_run_json(&path, &run).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"basis\": \"per-hour\""));
        assert!(text.contains("\"hour\": 9"));

        let back = read_run_json(&path).unwrap();
        assert_eq!(back.hours, rows);
        assert_eq!(back.summary, summary);
    }

    #[test]
    fn invalid_json_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_run_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
