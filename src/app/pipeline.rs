//! The run pipeline shared by the CLI commands and the TUI:
//! input -> series -> domain -> interpolation -> per-hour rows -> summary

use std::path::PathBuf;

use crate::calories::summarize_with;
use crate::data::generate_demo_day;
use crate::domain::{Domain, HourRow, InterpolationResult, RunConfig, Summary};
use crate::error::AppError;
use crate::interp::interpolate;
use crate::io::ingest::{IngestedSeries, load_csv, resolve_domain, series_from_text};
use crate::report::hour_rows;

/// Share of hours dropped from a generated demo day.
pub const DEMO_MISSING_PROB: f64 = 0.6;

/// Where the samples for one run come from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Hour labels and aligned step entries, as typed.
    Manual { hours: String, steps: String },
    /// An uploaded CSV file.
    Csv(PathBuf),
    /// A generated sample day.
    Demo { seed: u64 },
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedSeries,
    pub domain: Domain,
    pub result: InterpolationResult,
    pub rows: Vec<HourRow>,
    pub summary: Summary,
}

/// Turn an input source into a validated series.
pub fn load_input(source: &InputSource) -> Result<IngestedSeries, AppError> {
    match source {
        InputSource::Manual { hours, steps } => {
            let series = series_from_text(hours, steps)?;
            Ok(IngestedSeries::from_series(series, "manual entry"))
        }
        InputSource::Csv(path) => load_csv(path),
        InputSource::Demo { seed } => {
            let day = generate_demo_day(*seed, DEMO_MISSING_PROB)?;
            Ok(IngestedSeries::from_series(day.series, format!("demo day (seed {seed})")))
        }
    }
}

/// Execute the full pipeline for an input source.
pub fn run_steps(source: &InputSource, config: &RunConfig) -> Result<RunOutput, AppError> {
    let ingest = load_input(source)?;
    run_with_series(ingest, config)
}

/// Execute the pipeline with an already-validated series.
///
/// This is useful for the TUI, which builds its series from the form fields.
pub fn run_with_series(ingest: IngestedSeries, config: &RunConfig) -> Result<RunOutput, AppError> {
    let domain = resolve_domain(&ingest.series, config)?;
    tracing::debug!(
        source = %ingest.source,
        samples = ingest.series.len(),
        known = ingest.series.known_count(),
        hours = domain.len(),
        "running interpolation"
    );

    let result = interpolate(&ingest.series, &domain)?;
    let rows = hour_rows(&result, config.kcal_per_step)?;
    let summary = summarize_with(&result, config.kcal_per_step, &config.bands, config.basis)?;

    tracing::info!(
        total_steps = summary.total_steps,
        total_calories = summary.total_calories,
        band = %summary.tier.label,
        "run complete"
    );

    Ok(RunOutput {
        ingest,
        domain,
        result,
        rows,
        summary,
    })
}
