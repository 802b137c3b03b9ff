//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the analysis window against the clock
//! - runs the pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, RunArgs};
use crate::domain::{AnalysisConfig, DataSource};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `mrisk` binary.
pub fn run() -> Result<(), AppError> {
    // We want `mrisk` and `mrisk --sample` to behave like `mrisk tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_run(args, OutputMode::Full),
        Command::Risk(args) => handle_run(args, OutputMode::RiskOnly),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RiskOnly,
}

fn handle_run(args: RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    match mode {
        OutputMode::Full => {
            println!("{}", crate::report::format_run_summary(&run, &config));
        }
        OutputMode::RiskOnly => {
            println!("{}", crate::report::format_risk(&run.risk));
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_table {
        crate::io::export::write_table_csv(path, &run.table)?;
    }
    if let Some(path) = &config.export_assessment {
        crate::io::assessment::write_assessment_json(path, &run, &config)?;
    }

    Ok(())
}

fn handle_tui(args: RunArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

/// Resolve CLI arguments into an absolute-dated run configuration.
///
/// This is the only place the clock is consulted: the pipeline itself never
/// looks at "today".
pub fn analysis_config_from_args(args: &RunArgs) -> AnalysisConfig {
    let today = chrono::Local::now().date_naive();
    let start_date = match args.from {
        Some(date) => date,
        None => today - chrono::Duration::days(i64::from(args.days)),
    };

    AnalysisConfig {
        start_date,
        end_date: today,
        reference: args.reference,
        source: if args.sample {
            DataSource::Sample
        } else {
            DataSource::Fred
        },
        sample_seed: args.seed,
        export_table: args.export.clone(),
        export_assessment: args.export_assessment.clone(),
    }
}

/// Rewrite argv so `mrisk` defaults to `mrisk tui`.
///
/// Rules:
/// - `mrisk`                   -> `mrisk tui`
/// - `mrisk --sample ...`      -> `mrisk tui --sample ...`
/// - `mrisk --help/--version`  -> unchanged (show top-level help/version)
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

    let is_subcommand = matches!(arg1.as_str(), "report" | "risk" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
