//! Formatted terminal output: run header, per-hour table, summary and tip.

use crate::domain::{CalorieBasis, HourRow, RunConfig, Summary};
use crate::io::ingest::IngestedSeries;

/// Format the run header (input stats + settings).
pub fn format_run_summary(ingest: &IngestedSeries, rows: &[HourRow], config: &RunConfig) -> String {
    let mut out = String::new();
    let series = &ingest.series;

    out.push_str("=== steps - Step & Calorie Interpolator ===\n");
    out.push_str(&format!("Source: {}\n", ingest.source));
    out.push_str(&format!(
        "Input: n={} | known={} | missing={}\n",
        series.len(),
        series.known_count(),
        series.len() - series.known_count(),
    ));
    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(
            "Skipped rows: {} of {}\n",
            ingest.row_errors.len(),
            ingest.rows_read
        ));
        for err in &ingest.row_errors {
            out.push_str(&format!("  line {}: {}\n", err.line, err.message));
        }
    }

    match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => {
            let filled = rows.iter().filter(|r| r.interpolated).count();
            out.push_str(&format!(
                "Hours: {}..{} ({} hours, {} filled)\n",
                first.label,
                last.label,
                rows.len(),
                filled
            ));
        }
        _ => out.push_str("Hours: -\n"),
    }
    out.push_str(&format!(
        "Calories per step: {} kcal | basis: {}\n",
        config.kcal_per_step,
        basis_label(config.basis)
    ));
    out.push('\n');

    out
}

/// Format the per-hour table.
pub fn format_hour_table(rows: &[HourRow]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<6} {:>10} {:>10} {:<7}\n", "hour", "steps", "kcal", "source").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<6} {:-<10} {:-<10} {:-<7}\n", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        let source = if r.interpolated { "interp" } else { "input" };
        out.push_str(
            format!(
                "{:<6} {:>10.2} {:>10.2} {:<7}\n",
                r.label, r.steps, r.calories, source
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the totals, band and its tip.
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str("Summary:\n");
    out.push_str(&format!("- total steps   : {}\n", fmt_thousands(summary.total_steps)));
    out.push_str(&format!("- total calories: {:.2} kcal\n", summary.total_calories));
    out.push_str(&format!("- band          : {}\n", summary.tier.label));
    if !summary.tier.tip.is_empty() {
        out.push_str(&format!("\nTip: {}\n", summary.tier.tip));
    }
    out
}

pub fn basis_label(basis: CalorieBasis) -> &'static str {
    match basis {
        CalorieBasis::PerHour => "per-hour",
        CalorieBasis::Cumulative => "cumulative",
    }
}

/// Whole number with `,` thousands separators.
pub fn fmt_thousands(v: f64) -> String {
    let n = v.round() as i64;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Band, TimeKey};

    fn row(hour: i32, steps: f64, interpolated: bool) -> HourRow {
        HourRow {
            hour: TimeKey(hour),
            label: TimeKey(hour).to_string(),
            steps,
            calories: steps * 0.04,
            interpolated,
        }
    }

    #[test]
    fn hour_table_golden() {
        let rows = vec![row(6, 500.0, false), row(7, 825.0, true)];
        let expected = concat!(
            "hour        steps       kcal source\n",
            "------ ---------- ---------- -------\n",
            "06:00      500.00      20.00 input\n",
            "07:00      825.00      33.00 interp\n",
        );
        assert_eq!(format_hour_table(&rows), expected);
    }

    #[test]
    fn summary_includes_tip() {
        let summary = Summary {
            total_steps: 5750.0,
            total_calories: 230.000_000_1,
            tier: Band::new(Some(350.0), "active", "Keep it up."),
        };
        let text = format_summary(&summary);
        assert!(text.contains("- total steps   : 5,750\n"));
        assert!(text.contains("- total calories: 230.00 kcal\n"));
        assert!(text.contains("- band          : active\n"));
        assert!(text.ends_with("Tip: Keep it up.\n"));
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(fmt_thousands(0.0), "0");
        assert_eq!(fmt_thousands(999.0), "999");
        assert_eq!(fmt_thousands(8400.0), "8,400");
        assert_eq!(fmt_thousands(1_234_567.4), "1,234,567");
    }
}
