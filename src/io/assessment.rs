//! Write assessment JSON files.
//!
//! Assessment JSON is the "portable" representation of a run's conclusions:
//! score, level, warnings, scenario and the detected inversion intervals.
//! It deliberately excludes the master table (use the CSV export for data).

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::profile;
use crate::app::pipeline::RunOutput;
use crate::domain::{AnalysisConfig, InversionInterval, RiskLevel};
use crate::error::AppError;

/// The JSON schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentFile {
    pub tool: String,
    pub start_date: NaiveDate,
    pub asof_date: NaiveDate,
    pub score: u32,
    pub level: RiskLevel,
    pub warnings: Vec<String>,
    pub scenario: u8,
    pub scenario_title: String,
    pub inversions: Vec<InversionInterval>,
}

/// Build the portable record from a run.
pub fn assessment_from_run(run: &RunOutput, config: &AnalysisConfig) -> AssessmentFile {
    AssessmentFile {
        tool: "mrisk".to_string(),
        start_date: config.start_date,
        asof_date: run.risk.latest.date,
        score: run.risk.score,
        level: run.risk.level,
        warnings: run.risk.warnings.clone(),
        scenario: run.scenario.number(),
        scenario_title: profile(run.scenario).title.to_string(),
        inversions: run.inversions.clone(),
    }
}

/// Write an assessment JSON file.
pub fn write_assessment_json(
    path: &Path,
    run: &RunOutput,
    config: &AnalysisConfig,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create assessment JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, &assessment_from_run(run, config))
        .map_err(|e| AppError::new(2, format!("Failed to write assessment JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::app::pipeline::analyze;
    use crate::domain::{DataSource, ScenarioId, SeriesKey, TimeSeries};

    fn fixture() -> (RunOutput, AnalysisConfig) {
        let d = |day: u32| NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
        let config = AnalysisConfig {
            start_date: d(1),
            end_date: d(10),
            reference: SeriesKey::TenYear,
            source: DataSource::Sample,
            sample_seed: 0,
            export_table: None,
            export_assessment: None,
        };
        let constant = |v: f64| {
            TimeSeries::from_observations((1u32..=3).map(|day| (d(day), v)).collect())
        };
        let mut series = BTreeMap::new();
        series.insert(SeriesKey::TenYear, constant(4.8));
        series.insert(SeriesKey::TwoYear, constant(4.9));
        series.insert(SeriesKey::PolicyRate, constant(5.0));
        series.insert(SeriesKey::EffectiveRate, constant(5.3));
        let run = analyze(&series, &config).unwrap();
        (run, config)
    }

    #[test]
    fn record_mirrors_the_run() {
        let (run, config) = fixture();
        let record = assessment_from_run(&run, &config);

        assert_eq!(record.tool, "mrisk");
        assert_eq!(record.scenario, ScenarioId::RecessionWarning.number());
        assert_eq!(record.score, run.risk.score);
        assert_eq!(record.inversions, run.inversions);
        assert_eq!(record.warnings, run.risk.warnings);
    }

    #[test]
    fn json_round_trips() {
        let (run, config) = fixture();
        let record = assessment_from_run(&run, &config);

        let text = serde_json::to_string_pretty(&record).unwrap();
        assert!(text.contains("\"scenario\": 2"));
        assert!(text.contains("\"level\": \"MEDIUM\""));

        let back: AssessmentFile = serde_json::from_str(&text).unwrap();
        assert_eq!(back.score, record.score);
        assert_eq!(back.inversions, record.inversions);
    }
}
