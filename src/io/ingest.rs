//! Input parsing and normalization.
//!
//! This module is responsible for turning what the user typed or uploaded into
//! a clean `Series` the core can work with.
//!
//! Design goals:
//! - **Explicit missing markers**: `-`, empty, `nan`, `none` mean "not entered";
//!   `0` is a real reading
//! - **No silent coercion**: malformed numbers are errors, never zeros
//! - **Row-level validation** for CSV (skip bad rows, but report what happened)
//! - **Separation of concerns**: no interpolation logic here

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveTime, Timelike};
use csv::StringRecord;

use crate::domain::{Domain, RunConfig, Sample, Series, TimeKey};
use crate::error::{AppError, InterpError};

/// Header names accepted for the hour column, in priority order.
pub const HOUR_COLUMNS: [&str; 4] = ["hour", "jam", "time", "waktu"];

/// Header names accepted for the steps column, in priority order.
pub const STEP_COLUMNS: [&str; 4] = ["steps", "langkah", "step", "step_count"];

/// A row-level error encountered during CSV ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated series + bookkeeping for the report.
#[derive(Debug, Clone)]
pub struct IngestedSeries {
    pub series: Series,
    pub source: String,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestedSeries {
    pub fn from_series(series: Series, source: impl Into<String>) -> Self {
        let rows = series.len();
        Self {
            series,
            source: source.into(),
            row_errors: Vec::new(),
            rows_read: rows,
            rows_used: rows,
        }
    }
}

/// Parse an hour label: `06:00`, `6`, `06`, `6.00`.
///
/// Minutes other than `00` are rejected: the series is hourly.
pub fn parse_hour(label: &str) -> Result<TimeKey, InterpError> {
    let s = label.trim();
    if let Ok(h) = s.parse::<u32>() {
        if h <= 23 {
            return Ok(TimeKey(h as i32));
        }
        return Err(InterpError::invalid(format!("hour '{s}' is outside 0..23.")));
    }

    let normalized = s.replace('.', ":");
    let time = ["%H:%M", "%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&normalized, fmt).ok())
        .ok_or_else(|| InterpError::invalid(format!("'{s}' is not an hour (expected HH:00).")))?;

    if time.minute() != 0 || time.second() != 0 {
        return Err(InterpError::invalid(format!(
            "'{s}' is not on the hour; only whole hours are supported."
        )));
    }
    Ok(TimeKey(time.hour() as i32))
}

/// Parse a comma-separated list of hour labels. Empty labels are errors.
pub fn parse_hours(list: &str) -> Result<Vec<TimeKey>, InterpError> {
    split_list(list)
        .enumerate()
        .map(|(i, label)| {
            if label.trim().is_empty() {
                return Err(InterpError::invalid(format!("hour #{} is empty.", i + 1)));
            }
            parse_hour(label)
        })
        .collect()
}

/// Parse one step entry. Missing markers become `None`.
pub fn parse_step(token: &str) -> Result<Option<f64>, InterpError> {
    let t = token.trim();
    if is_missing_marker(t) {
        return Ok(None);
    }
    let v: f64 = t.parse().map_err(|_| {
        InterpError::invalid(format!(
            "step value '{t}' is not a number (use '-' or leave it empty for missing)."
        ))
    })?;
    if !v.is_finite() || v < 0.0 {
        return Err(InterpError::invalid(format!(
            "step value '{t}' must be a finite number >= 0."
        )));
    }
    Ok(Some(v))
}

/// Parse a comma-separated list of step entries, keeping empty slots.
pub fn parse_steps(list: &str) -> Result<Vec<Option<f64>>, InterpError> {
    split_list(list).map(parse_step).collect()
}

/// Comma-separated tokens; one trailing comma is ignored and an empty list has no tokens.
fn split_list(list: &str) -> impl Iterator<Item = &str> {
    let list = list.trim();
    let list = list.strip_suffix(',').unwrap_or(list);
    list.split(',').filter(move |_| !list.is_empty())
}

/// Build a series from the manual form: hour labels + aligned step entries.
pub fn series_from_text(hours: &str, steps: &str) -> Result<Series, InterpError> {
    let keys = parse_hours(hours)?;
    let values = parse_steps(steps)?;
    Series::from_pairs(&keys, &values)
}

fn is_missing_marker(t: &str) -> bool {
    t.is_empty() || t == "-" || t.eq_ignore_ascii_case("nan") || t.eq_ignore_ascii_case("none")
}

/// Load an hourly steps CSV from disk.
pub fn load_csv(path: &Path) -> Result<IngestedSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_csv(file, &path.display().to_string())
}

/// Read an hourly steps CSV from any reader.
pub fn read_csv<R: Read>(source: R, name: &str) -> Result<IngestedSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let hour_idx = find_column(&header_map, &HOUR_COLUMNS).ok_or_else(|| {
        AppError::new(
            2,
            format!("Missing hour column: expected one of {}", HOUR_COLUMNS.join(", ")),
        )
    })?;
    let steps_idx = find_column(&header_map, &STEP_COLUMNS).ok_or_else(|| {
        AppError::new(
            2,
            format!("Missing steps column: expected one of {}", STEP_COLUMNS.join(", ")),
        )
    })?;

    let mut samples = Vec::new();
    let mut seen = HashSet::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1 and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, hour_idx, steps_idx) {
            Ok(sample) if !seen.insert(sample.key) => row_errors.push(RowError {
                line,
                message: format!("Duplicate hour {}; keeping the first row.", sample.key),
            }),
            Ok(sample) => samples.push(sample),
            Err(e) => row_errors.push(RowError {
                line,
                message: e.to_string(),
            }),
        }
    }

    for err in &row_errors {
        tracing::warn!(line = err.line, "skipped CSV row: {}", err.message);
    }

    let rows_used = samples.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows remain after parsing the CSV."));
    }

    samples.sort_by_key(|s| s.key);
    let series = Series::new(samples)?;
    tracing::debug!(rows_read, rows_used, known = series.known_count(), "CSV ingested");

    Ok(IngestedSeries {
        series,
        source: name.to_string(),
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|c| header_map.get(*c).copied())
}

fn parse_row(record: &StringRecord, hour_idx: usize, steps_idx: usize) -> Result<Sample, InterpError> {
    let hour = record
        .get(hour_idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| InterpError::invalid("missing hour value."))?;
    let key = parse_hour(hour)?;
    let steps = record
        .get(steps_idx)
        .ok_or_else(|| InterpError::invalid("missing steps cell."))?;
    let value = parse_step(steps)?;
    Ok(Sample { key, value })
}

/// Resolve the output domain from config bounds and the input's own hours.
///
/// An unset bound falls back to the series' first/last hour.
pub fn resolve_domain(series: &Series, config: &RunConfig) -> Result<Domain, InterpError> {
    for bound in [config.hour_from, config.hour_to].into_iter().flatten() {
        if !(0..=23).contains(&bound) {
            return Err(InterpError::invalid(format!("hour {bound} is outside 0..23.")));
        }
    }
    let range = series.key_range();
    let from = config.hour_from.or(range.map(|(lo, _)| lo.0));
    let to = config.hour_to.or(range.map(|(_, hi)| hi.0));
    match (from, to) {
        (Some(from), Some(to)) => Domain::span(from, to),
        _ => Ok(Domain::covering(series)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn hour_labels_in_common_shapes() {
        assert_eq!(parse_hour("06:00").unwrap(), TimeKey(6));
        assert_eq!(parse_hour("6").unwrap(), TimeKey(6));
        assert_eq!(parse_hour(" 18.00 ").unwrap(), TimeKey(18));
        assert_eq!(parse_hour("22:00:00").unwrap(), TimeKey(22));
        assert!(parse_hour("06:30").is_err());
        assert!(parse_hour("24").is_err());
        assert!(parse_hour("morning").is_err());
    }

    #[test]
    fn step_entries_with_missing_markers() {
        let steps = parse_steps("500, 1200, 2000, -, 1800").unwrap();
        assert_eq!(steps, vec![Some(500.0), Some(1200.0), Some(2000.0), None, Some(1800.0)]);

        let steps = parse_steps("0,,NaN,None").unwrap();
        assert_eq!(steps, vec![Some(0.0), None, None, None]);
    }

    #[test]
    fn malformed_steps_are_errors_not_zeros() {
        let err = parse_step("12a").unwrap_err();
        assert!(err.to_string().contains("'12a'"));
        assert!(parse_step("-5").is_err());
        assert!(parse_step("inf").is_err());
    }

    #[test]
    fn manual_form_builds_sorted_series() {
        let series = series_from_text("12:00, 06:00, 09:00", "2000, 500, -").unwrap();
        let keys: Vec<i32> = series.samples().iter().map(|s| s.key.0).collect();
        assert_eq!(keys, vec![6, 9, 12]);
        assert_eq!(series.known_count(), 2);
    }

    #[test]
    fn trailing_comma_is_ignored_in_both_lists() {
        let series = series_from_text("06:00,09:00,", "500,1800,").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(parse_steps("").unwrap(), Vec::<Option<f64>>::new());
        // An empty slot before the end still means a missing value.
        assert_eq!(parse_steps("500,,").unwrap(), vec![Some(500.0), None]);
        assert!(parse_hours("06:00,,09:00").is_err());
    }

    #[test]
    fn manual_form_count_mismatch() {
        let err = series_from_text("06:00,09:00,12:00,15:00,18:00", "500, 1200, 2000, 1800").unwrap_err();
        assert_eq!(err, InterpError::DomainKeyMismatch { keys: 5, values: 4 });
    }

    #[test]
    fn csv_with_bom_and_alias_headers() {
        let data = "\u{feff}Jam,Langkah\n06:00,500\n07:00,-\n08:00,abc\n09:00,1200\n09:00,5\n";
        let ingested = read_csv(data.as_bytes(), "inline").unwrap();

        assert_eq!(ingested.rows_read, 5);
        assert_eq!(ingested.rows_used, 3);
        assert_eq!(ingested.row_errors.len(), 2);
        assert_eq!(ingested.row_errors[0].line, 4);
        assert!(ingested.row_errors[1].message.contains("Duplicate hour 09:00"));
        assert_eq!(ingested.series.known_count(), 2);
    }

    #[test]
    fn short_csv_row_is_a_row_error() {
        let ingested = read_csv("hour,steps\n6,100\n7\n8,300\n".as_bytes(), "inline").unwrap();
        assert_eq!(ingested.rows_used, 2);
        assert_eq!(ingested.row_errors.len(), 1);
        assert_eq!(ingested.row_errors[0].line, 3);
        assert!(ingested.row_errors[0].message.contains("missing steps cell"));
    }

    #[test]
    fn csv_without_steps_column_is_rejected() {
        let err = read_csv("hour,count\n6,1\n".as_bytes(), "inline").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("steps column"));
    }

    #[test]
    fn csv_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "time,steps").unwrap();
        writeln!(file, "6,100").unwrap();
        writeln!(file, "8,300").unwrap();

        let ingested = load_csv(file.path()).unwrap();
        assert_eq!(ingested.series.len(), 2);
        assert!(ingested.row_errors.is_empty());
    }

    #[test]
    fn domain_defaults_to_series_span() {
        let series = series_from_text("7,10", "1,2").unwrap();
        let mut config = RunConfig::default();
        assert_eq!(resolve_domain(&series, &config).unwrap().len(), 4);

        config.hour_from = Some(6);
        config.hour_to = Some(22);
        assert_eq!(resolve_domain(&series, &config).unwrap(), Domain::day());

        config.hour_from = Some(23);
        assert!(resolve_domain(&series, &config).is_err());

        config.hour_from = Some(-3_000_000);
        config.hour_to = Some(3_000_000);
        assert!(resolve_domain(&series, &config).is_err());
    }
}
