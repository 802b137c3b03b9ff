//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during analysis
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One of the macro input series the monitor knows about.
///
/// The set is closed on purpose: every downstream column, rule and report
/// line is keyed by a variant, so a typo'd series cannot appear at runtime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum SeriesKey {
    /// 10-year Treasury constant maturity yield.
    #[serde(rename = "10Y_RATE")]
    TenYear,
    /// 2-year Treasury constant maturity yield.
    #[serde(rename = "2Y_RATE")]
    TwoYear,
    /// Directly reported 10Y-2Y spread (preferred over our own arithmetic).
    #[serde(rename = "YIELD_CURVE_DIRECT")]
    CurveDirect,
    /// ICE BofA US High Yield option-adjusted spread.
    #[serde(rename = "HY_SPREAD")]
    HySpread,
    /// ICE BofA US Corporate (investment grade) option-adjusted spread.
    #[serde(rename = "IG_SPREAD")]
    IgSpread,
    /// Federal funds target rate (monthly).
    #[serde(rename = "POLICY_RATE")]
    PolicyRate,
    /// Effective federal funds rate.
    #[serde(rename = "EFFECTIVE_RATE")]
    EffectiveRate,
    /// Credit card delinquency rate (quarterly).
    #[serde(rename = "CC_DELINQ")]
    CcDelinq,
    /// Consumer loan delinquency rate (quarterly).
    #[serde(rename = "CONSUMER_DELINQ")]
    ConsumerDelinq,
    /// Auto loan delinquency rate (quarterly).
    #[serde(rename = "AUTO_DELINQ")]
    AutoDelinq,
    /// Commercial real estate delinquency rate (quarterly).
    #[serde(rename = "CRE_DELINQ")]
    CreDelinq,
    /// Residential real estate delinquency rate (quarterly).
    #[serde(rename = "RE_DELINQ")]
    ReDelinq,
}

impl SeriesKey {
    pub const ALL: [SeriesKey; 12] = [
        SeriesKey::TenYear,
        SeriesKey::TwoYear,
        SeriesKey::CurveDirect,
        SeriesKey::HySpread,
        SeriesKey::IgSpread,
        SeriesKey::PolicyRate,
        SeriesKey::EffectiveRate,
        SeriesKey::CcDelinq,
        SeriesKey::ConsumerDelinq,
        SeriesKey::AutoDelinq,
        SeriesKey::CreDelinq,
        SeriesKey::ReDelinq,
    ];

    /// Stable string identity (also the CSV column header).
    pub fn key(self) -> &'static str {
        match self {
            SeriesKey::TenYear => "10Y_RATE",
            SeriesKey::TwoYear => "2Y_RATE",
            SeriesKey::CurveDirect => "YIELD_CURVE_DIRECT",
            SeriesKey::HySpread => "HY_SPREAD",
            SeriesKey::IgSpread => "IG_SPREAD",
            SeriesKey::PolicyRate => "POLICY_RATE",
            SeriesKey::EffectiveRate => "EFFECTIVE_RATE",
            SeriesKey::CcDelinq => "CC_DELINQ",
            SeriesKey::ConsumerDelinq => "CONSUMER_DELINQ",
            SeriesKey::AutoDelinq => "AUTO_DELINQ",
            SeriesKey::CreDelinq => "CRE_DELINQ",
            SeriesKey::ReDelinq => "RE_DELINQ",
        }
    }

    /// FRED series id used by the fetch collaborator.
    pub fn fred_id(self) -> &'static str {
        match self {
            SeriesKey::TenYear => "DGS10",
            SeriesKey::TwoYear => "DGS2",
            SeriesKey::CurveDirect => "T10Y2Y",
            SeriesKey::HySpread => "BAMLH0A0HYM2",
            SeriesKey::IgSpread => "BAMLC0A0CM",
            SeriesKey::PolicyRate => "FEDFUNDS",
            SeriesKey::EffectiveRate => "EFFR",
            SeriesKey::CcDelinq => "DRCCLACBS",
            SeriesKey::ConsumerDelinq => "DRCLACBS",
            SeriesKey::AutoDelinq => "DROCLACBS",
            SeriesKey::CreDelinq => "DRCRELEXFACBS",
            SeriesKey::ReDelinq => "DRSREACBS",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            SeriesKey::TenYear => "10Y Treasury",
            SeriesKey::TwoYear => "2Y Treasury",
            SeriesKey::CurveDirect => "10Y-2Y (reported)",
            SeriesKey::HySpread => "High-yield spread",
            SeriesKey::IgSpread => "Investment-grade spread",
            SeriesKey::PolicyRate => "Fed funds target",
            SeriesKey::EffectiveRate => "Effective fed funds",
            SeriesKey::CcDelinq => "Credit card delinquency",
            SeriesKey::ConsumerDelinq => "Consumer loan delinquency",
            SeriesKey::AutoDelinq => "Auto loan delinquency",
            SeriesKey::CreDelinq => "CRE delinquency",
            SeriesKey::ReDelinq => "Residential RE delinquency",
        }
    }
}

/// A column of the master table: an input series or a derived indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnKey {
    Series(SeriesKey),
    /// 10Y-2Y spread: reported value when present, else computed.
    YieldCurve,
    /// 10Y minus the policy rate.
    RateGap,
    /// 2Y minus the effective rate (market easing/tightening expectation).
    PolicySpread,
}

impl ColumnKey {
    pub const DERIVED: [ColumnKey; 3] =
        [ColumnKey::YieldCurve, ColumnKey::RateGap, ColumnKey::PolicySpread];

    /// Every column in table order: the input series, then the derived ones.
    pub fn all() -> Vec<ColumnKey> {
        let mut out: Vec<ColumnKey> = SeriesKey::ALL.iter().map(|&k| ColumnKey::Series(k)).collect();
        out.extend(Self::DERIVED);
        out
    }

    /// Stable string identity (also the CSV column header).
    pub fn key(self) -> &'static str {
        match self {
            ColumnKey::Series(k) => k.key(),
            ColumnKey::YieldCurve => "YIELD_CURVE",
            ColumnKey::RateGap => "RATE_GAP",
            ColumnKey::PolicySpread => "POLICY_SPREAD",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ColumnKey::Series(k) => k.display_name(),
            ColumnKey::YieldCurve => "Yield curve (10Y-2Y)",
            ColumnKey::RateGap => "Rate gap (10Y-FFR)",
            ColumnKey::PolicySpread => "Policy spread (2Y-EFFR)",
        }
    }

    /// Unit suffix for display ("%" for levels, "%p" for spreads).
    pub fn unit(self) -> &'static str {
        match self {
            ColumnKey::Series(SeriesKey::CurveDirect)
            | ColumnKey::YieldCurve
            | ColumnKey::RateGap
            | ColumnKey::PolicySpread => "%p",
            ColumnKey::Series(_) => "%",
        }
    }
}

/// An irregularly-sampled observation sequence.
///
/// Invariant: dates are strictly ascending and unique, values are finite.
/// The normalizing constructor enforces this, so consumers can walk the
/// points without re-checking.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    /// Build a series from raw observations: sort by date, drop non-finite
    /// values, and keep the last value for any duplicated date.
    pub fn from_observations(mut obs: Vec<(NaiveDate, f64)>) -> Self {
        obs.retain(|(_, v)| v.is_finite());
        obs.sort_by_key(|(d, _)| *d);
        let mut points: Vec<(NaiveDate, f64)> = Vec::with_capacity(obs.len());
        for (date, value) in obs {
            match points.last_mut() {
                Some((last, slot)) if *last == date => *slot = value,
                _ => points.push((date, value)),
            }
        }
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(d, _)| *d)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(d, _)| *d)
    }

    /// Most recent observation at or before `date` (last observation
    /// carried forward), if any.
    pub fn value_on_or_before(&self, date: NaiveDate) -> Option<f64> {
        match self.points.partition_point(|(d, _)| *d <= date) {
            0 => None,
            n => Some(self.points[n - 1].1),
        }
    }
}

/// The aligned table: one reference date axis, one `Option<f64>` column per
/// [`ColumnKey`].
///
/// Invariants: every column has exactly `dates.len()` cells, and columns are
/// forward-filled (a cell never reverts to missing after the column's first
/// observation).
#[derive(Debug, Clone, PartialEq)]
pub struct MasterTable {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<ColumnKey, Vec<Option<f64>>>,
}

impl MasterTable {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: BTreeMap::new(),
        }
    }

    /// Insert (or replace) a column. `values` must match the date axis.
    pub fn insert_column(&mut self, key: ColumnKey, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.dates.len());
        self.columns.insert(key, values);
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, key: ColumnKey) -> Option<&[Option<f64>]> {
        self.columns.get(&key).map(|c| c.as_slice())
    }

    pub fn value(&self, key: ColumnKey, row: usize) -> Option<f64> {
        self.columns.get(&key).and_then(|c| c.get(row).copied().flatten())
    }

    /// A column zipped with the date axis (for scans and charts).
    pub fn column_points(&self, key: ColumnKey) -> Vec<(NaiveDate, Option<f64>)> {
        let empty: Vec<Option<f64>> = Vec::new();
        let col = self.columns.get(&key).unwrap_or(&empty);
        self.dates
            .iter()
            .enumerate()
            .map(|(i, d)| (*d, col.get(i).copied().flatten()))
            .collect()
    }

    /// Snapshot of the last row, or `None` for an empty table.
    ///
    /// All latest-row consumers (scorer, classifier, report) go through this
    /// rather than indexing the tail themselves.
    pub fn latest(&self) -> Option<RowSnapshot> {
        let last = self.dates.len().checked_sub(1)?;
        let mut values = BTreeMap::new();
        for (key, col) in &self.columns {
            if let Some(v) = col.get(last).copied().flatten() {
                values.insert(*key, v);
            }
        }
        Some(RowSnapshot {
            date: self.dates[last],
            values,
        })
    }
}

/// An explicit single-row view of the master table.
///
/// Missing cells are simply absent from the map, so `get` returns `None`
/// for them — the same shape every rule and classifier input uses.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSnapshot {
    pub date: NaiveDate,
    values: BTreeMap<ColumnKey, f64>,
}

impl RowSnapshot {
    pub fn new(date: NaiveDate, values: BTreeMap<ColumnKey, f64>) -> Self {
        Self { date, values }
    }

    pub fn get(&self, key: ColumnKey) -> Option<f64> {
        self.values.get(&key).copied()
    }
}

/// A period during which the yield curve stayed negative.
///
/// `end` is exclusive for intervals closed by a `>= 0` observation. When the
/// series ends while still inverted, `open_ended` is set and `end` is the
/// last observed date (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InversionInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub open_ended: bool,
}

/// Composite risk severity, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Map a summed score to a severity (first match from the top).
    pub fn from_score(score: u32) -> Self {
        if score >= 10 {
            RiskLevel::Critical
        } else if score >= 7 {
            RiskLevel::High
        } else if score >= 4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

/// Outcome of the latest-row risk scoring pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    /// Sum of triggered rule increments. Not clamped: extreme inputs can
    /// push it past the nominal 0..20 range.
    pub score: u32,
    pub level: RiskLevel,
    /// One entry per triggered rule, in rule-evaluation order.
    pub warnings: Vec<String>,
    pub latest: RowSnapshot,
}

/// One of the four macro scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioId {
    StagflationConcern,
    RecessionWarning,
    HealthyGrowth,
    PolicyPivot,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 4] = [
        ScenarioId::StagflationConcern,
        ScenarioId::RecessionWarning,
        ScenarioId::HealthyGrowth,
        ScenarioId::PolicyPivot,
    ];

    /// Stable 1-based number used in reports and exports.
    pub fn number(self) -> u8 {
        match self {
            ScenarioId::StagflationConcern => 1,
            ScenarioId::RecessionWarning => 2,
            ScenarioId::HealthyGrowth => 3,
            ScenarioId::PolicyPivot => 4,
        }
    }
}

/// Where the input series come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Live FRED observations (needs `FRED_API_KEY`).
    Fred,
    /// Deterministic synthetic series (offline).
    Sample,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults). The start date is already
/// absolute here: resolving "last N days" against the clock is the CLI's job.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub start_date: NaiveDate,
    /// As-of bound (today for live runs); also the sample window's end.
    pub end_date: NaiveDate,
    /// Series whose observation dates become the table's row axis.
    pub reference: SeriesKey,
    pub source: DataSource,
    pub sample_seed: u64,
    pub export_table: Option<PathBuf>,
    pub export_assessment: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn from_observations_sorts_and_dedups() {
        let ts = TimeSeries::from_observations(vec![
            (d(3), 3.0),
            (d(1), 1.0),
            (d(3), 3.5),
            (d(2), f64::NAN),
            (d(2), 2.0),
        ]);
        assert_eq!(ts.points(), &[(d(1), 1.0), (d(2), 2.0), (d(3), 3.5)]);
    }

    #[test]
    fn value_on_or_before_carries_last_observation() {
        let ts = TimeSeries::from_observations(vec![(d(2), 2.0), (d(5), 5.0)]);
        assert_eq!(ts.value_on_or_before(d(1)), None);
        assert_eq!(ts.value_on_or_before(d(2)), Some(2.0));
        assert_eq!(ts.value_on_or_before(d(4)), Some(2.0));
        assert_eq!(ts.value_on_or_before(d(9)), Some(5.0));
    }

    #[test]
    fn latest_skips_missing_cells() {
        let mut table = MasterTable::new(vec![d(1), d(2)]);
        table.insert_column(ColumnKey::Series(SeriesKey::TenYear), vec![Some(4.0), Some(4.1)]);
        table.insert_column(ColumnKey::Series(SeriesKey::CcDelinq), vec![None, None]);

        let latest = table.latest().unwrap();
        assert_eq!(latest.date, d(2));
        assert_eq!(latest.get(ColumnKey::Series(SeriesKey::TenYear)), Some(4.1));
        assert_eq!(latest.get(ColumnKey::Series(SeriesKey::CcDelinq)), None);
    }

    #[test]
    fn empty_table_has_no_latest_row() {
        let table = MasterTable::new(Vec::new());
        assert!(table.latest().is_none());
    }

    #[test]
    fn risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(3), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(4), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(6), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(7), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(9), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(10), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(25), RiskLevel::Critical);
        assert!(RiskLevel::Low < RiskLevel::Critical);
    }
}
