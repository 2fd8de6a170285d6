//! Command-line flags for `steps`. Dispatch lives in `crate::app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Band, CalorieBasis, DEFAULT_KCAL_PER_STEP};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "steps", version, about = "Step & calorie interpolator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill missing hours from typed hour labels and step values.
    Fill(FillArgs),
    /// Fill missing hours from an uploaded CSV (`hour,steps` columns).
    Import(ImportArgs),
    /// Plot a previously exported run JSON.
    Plot(PlotArgs),
    /// Launch the interactive per-hour form.
    Tui(CalorieArgs),
}

/// Manual entry: hours and aligned step values.
#[derive(Debug, Args, Clone)]
pub struct FillArgs {
    /// Comma-separated hours, e.g. "06:00,09:00,12:00".
    #[arg(long, default_value = "06:00,09:00,12:00,15:00,18:00")]
    pub hours: String,

    /// Comma-separated step counts aligned with --hours; '-' or empty means missing.
    #[arg(long, default_value = "500, 1200, 2000, -, 1800", allow_hyphen_values = true)]
    pub steps: String,

    #[command(flatten)]
    pub common: CalorieArgs,
}

/// CSV upload.
#[derive(Debug, Args, Clone)]
pub struct ImportArgs {
    /// CSV file with an hour column (hour/jam/time/waktu) and a steps column
    /// (steps/langkah/step/step_count). Prompts for a file when omitted.
    #[arg(long, short = 'f', value_name = "CSV")]
    pub csv: Option<PathBuf>,

    #[command(flatten)]
    pub common: CalorieArgs,
}

/// Options shared by every computing command.
#[derive(Debug, Args, Clone)]
pub struct CalorieArgs {
    /// Calories burned per step (kcal).
    #[arg(long, env = "STEPS_KCAL_PER_STEP", default_value_t = DEFAULT_KCAL_PER_STEP)]
    pub kcal_per_step: f64,

    /// Calorie band as UPPER:LABEL[:TIP]; repeat in ascending order, use '*' for the top band.
    #[arg(long = "band", value_name = "UPPER:LABEL[:TIP]")]
    pub bands: Vec<Band>,

    /// JSON file with a list of bands ({"upper": 100, "label": "low", "tip": "..."}).
    #[arg(long = "bands", value_name = "JSON", conflicts_with = "bands")]
    pub bands_file: Option<PathBuf>,

    /// Whether values are per-hour increments or a running daily total.
    #[arg(long, value_enum, default_value_t = CalorieBasis::PerHour)]
    pub basis: CalorieBasis,

    /// First hour to report (defaults to the first entered hour).
    #[arg(long = "from", value_name = "HOUR", value_parser = clap::value_parser!(i32).range(0..=23))]
    pub hour_from: Option<i32>,

    /// Last hour to report (defaults to the last entered hour).
    #[arg(long = "to", value_name = "HOUR", value_parser = clap::value_parser!(i32).range(0..=23))]
    pub hour_to: Option<i32>,

    /// Use a generated sample day instead of the entered values.
    #[arg(long)]
    pub demo: bool,

    /// Random seed for --demo.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 68)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Export the per-hour table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the whole run (table + summary) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved run.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Run JSON file produced by `--export-json`.
    #[arg(long, value_name = "JSON")]
    pub run: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 68)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}
