//! Command dispatch for the `steps` binary. `main.rs` only maps the result to
//! an exit code; everything else starts here:
//! - loads `.env` and installs logging
//! - parses CLI arguments
//! - builds the input series and runs the pipeline
//! - prints tables/summaries/plots
//! - writes optional exports

use std::fs::File;
use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::calories::derive_calories;
use crate::cli::{CalorieArgs, Command, FillArgs, ImportArgs, PlotArgs};
use crate::domain::{Band, Bands, RunConfig};
use crate::error::AppError;

use self::pipeline::InputSource;

pub mod pipeline;

/// Entry point for the `steps` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `steps` and `steps --demo` behave like `steps tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; log lines would corrupt the alternate screen.
    if !matches!(cli.command, Command::Tui(_)) {
        init_logging();
    }

    match cli.command {
        Command::Fill(args) => handle_fill(args),
        Command::Import(args) => handle_import(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("STEPS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_fill(args: FillArgs) -> Result<(), AppError> {
    let source = if args.common.demo {
        InputSource::Demo { seed: args.common.seed }
    } else {
        InputSource::Manual {
            hours: args.hours.clone(),
            steps: args.steps.clone(),
        }
    };
    handle_compute(&source, &args.common)
}

fn handle_import(args: ImportArgs) -> Result<(), AppError> {
    let path = match &args.csv {
        Some(path) => crate::cli::picker::validate_csv_path(path)?,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };
    handle_compute(&InputSource::Csv(path), &args.common)
}

fn handle_compute(source: &InputSource, args: &CalorieArgs) -> Result<(), AppError> {
    let config = run_config_from_args(args)?;
    let run = pipeline::run_steps(source, &config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.rows, &config)
    );
    println!("{}", crate::report::format_hour_table(&run.rows));
    println!("{}", crate::report::format_summary(&run.summary));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(&run.rows, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_results_csv(path, &run.rows)?;
        tracing::info!(path = %path.display(), "wrote per-hour CSV");
    }
    if let Some(path) = &config.export_json {
        let file = crate::io::run_file::build_run_file(
            &run.rows,
            &run.summary,
            config.kcal_per_step,
            config.basis,
        );
        crate::io::run_file::write_run_json(path, &file)?;
        tracing::info!(path = %path.display(), "wrote run JSON");
    }

    Ok(())
}

fn handle_tui(args: CalorieArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let seed = args.demo.then_some(args.seed);
    crate::tui::run(config, seed)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let run = crate::io::run_file::read_run_json(&args.run)?;
    let plot = crate::plot::render_ascii_plot_from_run_file(&run, args.width, args.height);

    println!("{plot}");
    println!("{}", crate::report::format_summary(&run.summary));
    Ok(())
}

pub fn run_config_from_args(args: &CalorieArgs) -> Result<RunConfig, AppError> {
    // Reject a bad factor before any input is read.
    derive_calories(0.0, args.kcal_per_step)?;

    let bands = match &args.bands_file {
        Some(path) => Bands::new(read_bands_file(path)?)?,
        None if !args.bands.is_empty() => Bands::new(args.bands.clone())?,
        None => Bands::default(),
    };

    Ok(RunConfig {
        kcal_per_step: args.kcal_per_step,
        bands,
        basis: args.basis,
        hour_from: args.hour_from,
        hour_to: args.hour_to,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    })
}

fn read_bands_file(path: &Path) -> Result<Vec<Band>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open bands JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid bands JSON: {e}")))
}

/// Rewrite argv so `steps` defaults to `steps tui`.
///
/// Rules:
/// - `steps`                      -> `steps tui`
/// - `steps --demo ...`           -> `steps tui --demo ...`
/// - `steps --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fill" | "import" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn calorie_args(extra: &[&str]) -> CalorieArgs {
        let mut all = vec!["steps", "tui"];
        all.extend_from_slice(extra);
        match crate::cli::Cli::try_parse_from(all).unwrap().command {
            Command::Tui(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["steps"])), argv(&["steps", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["steps", "--demo"])),
            argv(&["steps", "tui", "--demo"])
        );
        assert_eq!(rewrite_args(argv(&["steps", "--help"])), argv(&["steps", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["steps", "fill", "--demo"])),
            argv(&["steps", "fill", "--demo"])
        );
    }

    #[test]
    fn config_from_defaults() {
        let config = run_config_from_args(&calorie_args(&[])).unwrap();
        assert!((config.kcal_per_step - 0.04).abs() < 1e-12);
        assert_eq!(config.bands, Bands::default());
        assert!(config.plot);
    }

    #[test]
    fn config_rejects_negative_factor_and_unordered_bands() {
        let err = run_config_from_args(&calorie_args(&["--kcal-per-step=-1"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = run_config_from_args(&calorie_args(&["--band", "200:a", "--band", "100:b"])).unwrap_err();
        assert!(err.to_string().contains("ascending"));
    }

    #[test]
    fn config_reads_bands_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bands.json");
        std::fs::write(
            &path,
            r#"[{"upper": 150, "label": "easy"}, {"upper": null, "label": "hard", "tip": "Rest."}]"#,
        )
        .unwrap();

        let config =
            run_config_from_args(&calorie_args(&["--bands", path.to_str().unwrap(), "--no-plot"])).unwrap();
        let bands = config.bands.as_slice();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].label, "easy");
        assert_eq!(bands[1].tip, "Rest.");
        assert!(!config.plot);
    }
}
