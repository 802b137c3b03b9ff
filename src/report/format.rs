//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::analysis::profile;
use crate::app::pipeline::RunOutput;
use crate::domain::{AnalysisConfig, ColumnKey, DataSource, InversionInterval, RiskAssessment, SeriesKey};

/// Latest-reading lines, in display order. `CurveDirect` is folded into the
/// derived yield-curve line, so it is not listed on its own.
const METRICS: &[ColumnKey] = &[
    ColumnKey::Series(SeriesKey::TenYear),
    ColumnKey::Series(SeriesKey::TwoYear),
    ColumnKey::YieldCurve,
    ColumnKey::Series(SeriesKey::PolicyRate),
    ColumnKey::Series(SeriesKey::EffectiveRate),
    ColumnKey::PolicySpread,
    ColumnKey::RateGap,
    ColumnKey::Series(SeriesKey::HySpread),
    ColumnKey::Series(SeriesKey::IgSpread),
    ColumnKey::Series(SeriesKey::CcDelinq),
    ColumnKey::Series(SeriesKey::ConsumerDelinq),
    ColumnKey::Series(SeriesKey::AutoDelinq),
    ColumnKey::Series(SeriesKey::CreDelinq),
    ColumnKey::Series(SeriesKey::ReDelinq),
];

/// Format the full run summary (latest readings + risk + scenario + inversions).
pub fn format_run_summary(run: &RunOutput, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    let source = match config.source {
        DataSource::Fred => "live FRED",
        DataSource::Sample => "sample data",
    };

    out.push_str("=== mrisk - Macro Credit Risk Monitor (FRED-based) ===\n");
    out.push_str(&format!(
        "Window: {} -> {} ({source})\n",
        config.start_date, config.end_date
    ));
    out.push_str(&format!(
        "Rows: {} | as-of: {}\n",
        run.table.len(),
        run.risk.latest.date
    ));

    out.push_str("\nLatest readings:\n");
    for &key in METRICS {
        out.push_str(&format!(
            "  {:<28} {:>8}\n",
            key.display_name(),
            fmt_cell(run.risk.latest.get(key), key)
        ));
    }

    out.push('\n');
    out.push_str(&format_risk(&run.risk));

    out.push('\n');
    out.push_str(&format_scenario(run));

    out.push('\n');
    out.push_str(&format_inversions(&run.inversions));

    out
}

/// Format the risk block only (used by `mrisk risk` for scripting).
pub fn format_risk(risk: &RiskAssessment) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Risk: {} (score {})\n",
        risk.level.label(),
        risk.score
    ));
    if risk.warnings.is_empty() {
        out.push_str("  no warnings\n");
    }
    for warning in &risk.warnings {
        out.push_str(&format!("  ! {warning}\n"));
    }
    out
}

/// Format the scenario block: header, reading, and the allocation table.
pub fn format_scenario(run: &RunOutput) -> String {
    let p = profile(run.scenario);
    let mut out = String::new();
    out.push_str(&format!(
        "Scenario {} - {} [{}]\n",
        p.id.number(),
        p.title,
        p.risk_label
    ));
    out.push_str(&format!("  {}\n", p.meaning));
    out.push_str("  Allocation guidance:\n");
    for (asset, guidance) in p.allocations {
        out.push_str(&format!("    {:<30} {guidance}\n", format!("{asset}:")));
    }
    out
}

/// Format the inversion interval table.
pub fn format_inversions(inversions: &[InversionInterval]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Inversions ({}):\n", inversions.len()));
    if inversions.is_empty() {
        out.push_str("  none in window\n");
        return out;
    }
    for interval in inversions {
        if interval.open_ended {
            out.push_str(&format!("  {} -> {} (ongoing)\n", interval.start, interval.end));
        } else {
            out.push_str(&format!("  {} -> {}\n", interval.start, interval.end));
        }
    }
    out
}

/// One latest-reading cell: value + unit, or "-" when missing.
fn fmt_cell(value: Option<f64>, key: ColumnKey) -> String {
    match value {
        // Spreads print signed so an inversion is visible at a glance.
        Some(v) if key.unit() == "%p" => format!("{v:+.2}{}", key.unit()),
        Some(v) => format!("{v:.2}{}", key.unit()),
        None => "-".to_string(),
    }
}
