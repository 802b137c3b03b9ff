//! Align independently-sampled series onto one reference calendar.
//!
//! The reference series' observation dates become the row axis; every other
//! series is joined by carrying its most recent observation forward onto
//! each reference date. Dates before a series' first observation stay
//! missing, which is how the table distinguishes "not yet published" from
//! "stale but known".

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{ColumnKey, MasterTable, SeriesKey, TimeSeries};
use crate::error::AnalysisError;

/// Build the master table from raw series.
///
/// A series absent from `series` (or fetched empty) produces an all-missing
/// column rather than an error: losing one factor must not abort the rest.
/// An empty or absent *reference* series is fatal.
pub fn align(
    series: &BTreeMap<SeriesKey, TimeSeries>,
    reference: SeriesKey,
) -> Result<MasterTable, AnalysisError> {
    let reference_series = series
        .get(&reference)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AnalysisError::InsufficientData(format!(
                "reference series {} has no observations",
                reference.key()
            ))
        })?;

    let dates: Vec<NaiveDate> = reference_series.points().iter().map(|(d, _)| *d).collect();
    let mut table = MasterTable::new(dates);

    for key in SeriesKey::ALL {
        let column = match series.get(&key) {
            Some(s) if !s.is_empty() => locf_column(s, table.dates()),
            _ => vec![None; table.len()],
        };
        table.insert_column(ColumnKey::Series(key), column);
    }

    Ok(table)
}

/// Last-observation-carried-forward join of one series onto the date axis.
///
/// Both inputs are ascending, so a single forward walk suffices.
fn locf_column(series: &TimeSeries, dates: &[NaiveDate]) -> Vec<Option<f64>> {
    let points = series.points();
    let mut out = Vec::with_capacity(dates.len());
    let mut i = 0usize;
    let mut last: Option<f64> = None;

    for &date in dates {
        while i < points.len() && points[i].0 <= date {
            last = Some(points[i].1);
            i += 1;
        }
        out.push(last);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn series(obs: &[(u32, f64)]) -> TimeSeries {
        TimeSeries::from_observations(obs.iter().map(|&(day, v)| (d(day), v)).collect())
    }

    fn col(key: SeriesKey) -> ColumnKey {
        ColumnKey::Series(key)
    }

    #[test]
    fn row_axis_equals_reference_observations() {
        let mut input = BTreeMap::new();
        input.insert(SeriesKey::TenYear, series(&[(1, 4.0), (3, 4.1), (7, 4.2)]));
        input.insert(SeriesKey::TwoYear, series(&[(1, 3.5), (2, 3.6)]));

        let table = align(&input, SeriesKey::TenYear).unwrap();
        assert_eq!(table.dates(), &[d(1), d(3), d(7)]);
        assert_eq!(table.len(), input[&SeriesKey::TenYear].len());
    }

    #[test]
    fn weekly_series_is_carried_forward_onto_daily_axis() {
        let mut input = BTreeMap::new();
        input.insert(
            SeriesKey::TenYear,
            series(&[(1, 4.0), (2, 4.0), (3, 4.0), (4, 4.0), (5, 4.0)]),
        );
        input.insert(SeriesKey::HySpread, series(&[(2, 3.1), (5, 3.4)]));

        let table = align(&input, SeriesKey::TenYear).unwrap();
        let hy = table.column(col(SeriesKey::HySpread)).unwrap();
        assert_eq!(hy, &[None, Some(3.1), Some(3.1), Some(3.1), Some(3.4)]);
    }

    #[test]
    fn forward_fill_never_reverts_to_missing() {
        let mut input = BTreeMap::new();
        input.insert(
            SeriesKey::TenYear,
            series(&[(1, 4.0), (2, 4.0), (3, 4.0), (4, 4.0), (8, 4.0), (9, 4.0)]),
        );
        input.insert(SeriesKey::CcDelinq, series(&[(3, 2.9)]));

        let table = align(&input, SeriesKey::TenYear).unwrap();
        let cc = table.column(col(SeriesKey::CcDelinq)).unwrap();

        let first_observed = cc.iter().position(|v| v.is_some()).unwrap();
        assert!(cc[first_observed..].iter().all(|v| v.is_some()));
        assert!(cc[..first_observed].iter().all(|v| v.is_none()));
    }

    #[test]
    fn absent_series_leaves_column_missing() {
        let mut input = BTreeMap::new();
        input.insert(SeriesKey::TenYear, series(&[(1, 4.0), (2, 4.1)]));

        let table = align(&input, SeriesKey::TenYear).unwrap();
        let cre = table.column(col(SeriesKey::CreDelinq)).unwrap();
        assert_eq!(cre, &[None, None]);
    }

    #[test]
    fn empty_reference_is_insufficient_data() {
        let mut input = BTreeMap::new();
        input.insert(SeriesKey::TenYear, TimeSeries::default());
        input.insert(SeriesKey::TwoYear, series(&[(1, 3.5)]));

        let err = align(&input, SeriesKey::TenYear).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));

        let err = align(&BTreeMap::new(), SeriesKey::TenYear).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));
    }

    #[test]
    fn alignment_is_deterministic() {
        let mut input = BTreeMap::new();
        input.insert(SeriesKey::TenYear, series(&[(1, 4.0), (2, 4.1), (5, 4.3)]));
        input.insert(SeriesKey::TwoYear, series(&[(2, 3.6), (4, 3.8)]));
        input.insert(SeriesKey::CcDelinq, series(&[(1, 2.8)]));

        let a = align(&input, SeriesKey::TenYear).unwrap();
        let b = align(&input, SeriesKey::TenYear).unwrap();
        assert_eq!(a, b);
    }
}
