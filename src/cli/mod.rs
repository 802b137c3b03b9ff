//! Command-line parsing for the macro credit risk monitor.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the analysis code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::SeriesKey;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mrisk", version, about = "Macro Credit Risk Monitor (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the pipeline and print the full report (readings, risk, scenario,
    /// inversions), optionally exporting CSV/JSON.
    Report(RunArgs),
    /// Print the risk score and warnings only (useful for scripting).
    Risk(RunArgs),
    /// Launch the interactive TUI dashboard.
    ///
    /// This uses the same underlying pipeline as `mrisk report`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(RunArgs),
}

/// Common options for all run modes.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Lookback window in days (ignored when --from is given).
    #[arg(long, default_value_t = 730)]
    pub days: u32,

    /// Absolute start date (YYYY-MM-DD); overrides --days.
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Use deterministic offline sample data instead of live FRED.
    #[arg(long)]
    pub sample: bool,

    /// Random seed for --sample generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Reference series whose calendar defines the table rows.
    #[arg(long, value_enum, default_value_t = SeriesKey::TenYear)]
    pub reference: SeriesKey,

    /// Export the aligned master table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the assessment (score, scenario, inversions) to JSON.
    #[arg(long = "export-assessment", value_name = "JSON")]
    pub export_assessment: Option<PathBuf>,
}
