//! Shared analysis pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load series -> align -> derive -> detect inversions -> score -> classify
//!
//! The CLI and the TUI then focus on presentation (printing vs widgets).

use std::collections::BTreeMap;

use crate::analysis::{RuleSet, add_derived_columns, align, classify, find_inversions};
use crate::data::{FredClient, generate_sample};
use crate::domain::{
    AnalysisConfig, ColumnKey, DataSource, InversionInterval, MasterTable, RiskAssessment,
    ScenarioId, SeriesKey, TimeSeries,
};
use crate::error::{AnalysisError, AppError};

/// All computed outputs of a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub table: MasterTable,
    pub inversions: Vec<InversionInterval>,
    pub risk: RiskAssessment,
    pub scenario: ScenarioId,
}

/// Materialize the inputs per the configured source, then analyze them.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let series = load_series(config)?;
    analyze(&series, config)
}

/// Fetch or generate the input series (no analysis).
///
/// Split out so the TUI can hold the series and re-analyze without
/// re-fetching.
pub fn load_series(
    config: &AnalysisConfig,
) -> Result<BTreeMap<SeriesKey, TimeSeries>, AppError> {
    match config.source {
        DataSource::Fred => {
            let client = FredClient::from_env()?;
            Ok(client.fetch_all(config.start_date, config.end_date))
        }
        DataSource::Sample => {
            generate_sample(config.start_date, config.end_date, config.sample_seed)
        }
    }
}

/// The pure pipeline over already-materialized series.
///
/// Side-effect-free and deterministic: identical inputs produce identical
/// outputs, so callers may re-run it as often as they like (the TUI does,
/// on every refresh).
pub fn analyze(
    series: &BTreeMap<SeriesKey, TimeSeries>,
    config: &AnalysisConfig,
) -> Result<RunOutput, AppError> {
    // 1) Align every series onto the reference calendar.
    let mut table = align(series, config.reference)?;

    // 2) Derive the curve / gap / policy-spread columns in place.
    add_derived_columns(&mut table);

    // 3) Scan the full curve history for inversion intervals.
    let inversions = find_inversions(&table.column_points(ColumnKey::YieldCurve));

    // 4) Score and classify the latest row.
    let latest = table.latest().ok_or_else(|| {
        AnalysisError::InsufficientData("alignment produced no rows".to_string())
    })?;
    let rules = RuleSet::standard()?;
    let risk = rules.assess(&latest);
    let scenario = classify(
        latest.get(ColumnKey::YieldCurve),
        latest.get(ColumnKey::PolicySpread),
    );

    Ok(RunOutput {
        table,
        inversions,
        risk,
        scenario,
    })
}
