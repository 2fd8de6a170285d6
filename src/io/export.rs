//! Export the per-hour table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Values are rounded to two decimals here, at the output boundary.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::HourRow;
use crate::error::AppError;

/// Write per-hour results to a CSV file.
pub fn write_results_csv(path: &Path, rows: &[HourRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, rows)
}

/// Write per-hour results as CSV to any writer.
pub fn write_results<W: Write>(mut out: W, rows: &[HourRow]) -> Result<(), AppError> {
    writeln!(out, "hour,label,steps,calories,interpolated")
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for r in rows {
        writeln!(
            out,
            "{},{},{:.2},{:.2},{}",
            r.hour.0, r.label, r.steps, r.calories, r.interpolated,
        )
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeKey;

    #[test]
    fn writes_header_and_rounded_rows() {
        let rows = vec![
            HourRow {
                hour: TimeKey(6),
                label: "06:00".to_string(),
                steps: 500.0,
                calories: 20.0,
                interpolated: false,
            },
            HourRow {
                hour: TimeKey(7),
                label: "07:00".to_string(),
                steps: 833.333_333,
                calories: 33.333_333,
                interpolated: true,
            },
        ];

        let mut buf = Vec::new();
        write_results(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let expected = concat!(
            "hour,label,steps,calories,interpolated\n",
            "6,06:00,500.00,20.00,false\n",
            "7,07:00,833.33,33.33,true\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day.csv");
        write_results_csv(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
