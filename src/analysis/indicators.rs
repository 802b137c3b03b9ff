//! Derived indicator columns.
//!
//! Three row-wise columns computed from the aligned inputs:
//!
//! - `YIELD_CURVE`  — the reported 10Y-2Y spread when present, else `10Y - 2Y`
//! - `RATE_GAP`     — `10Y - fed funds target`
//! - `POLICY_SPREAD`— `2Y - effective fed funds`
//!
//! No smoothing. A row missing a required input yields a missing derived
//! value for that row only; rows are never dropped here.

use crate::domain::{ColumnKey, MasterTable, SeriesKey};

/// Enrich the table with the three derived columns.
pub fn add_derived_columns(table: &mut MasterTable) {
    let n = table.len();
    let mut curve = Vec::with_capacity(n);
    let mut gap = Vec::with_capacity(n);
    let mut policy = Vec::with_capacity(n);

    for row in 0..n {
        let ten = table.value(ColumnKey::Series(SeriesKey::TenYear), row);
        let two = table.value(ColumnKey::Series(SeriesKey::TwoYear), row);
        let direct = table.value(ColumnKey::Series(SeriesKey::CurveDirect), row);
        let target = table.value(ColumnKey::Series(SeriesKey::PolicyRate), row);
        let effective = table.value(ColumnKey::Series(SeriesKey::EffectiveRate), row);

        // The reported spread always wins over our own arithmetic.
        curve.push(direct.or(sub(ten, two)));
        gap.push(sub(ten, target));
        policy.push(sub(two, effective));
    }

    table.insert_column(ColumnKey::YieldCurve, curve);
    table.insert_column(ColumnKey::RateGap, gap);
    table.insert_column(ColumnKey::PolicySpread, policy);
}

fn sub(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn table_with(
        ten: Vec<Option<f64>>,
        two: Vec<Option<f64>>,
        direct: Vec<Option<f64>>,
        target: Vec<Option<f64>>,
        effective: Vec<Option<f64>>,
    ) -> MasterTable {
        let dates = (1..=ten.len() as u32).map(d).collect();
        let mut table = MasterTable::new(dates);
        table.insert_column(ColumnKey::Series(SeriesKey::TenYear), ten);
        table.insert_column(ColumnKey::Series(SeriesKey::TwoYear), two);
        table.insert_column(ColumnKey::Series(SeriesKey::CurveDirect), direct);
        table.insert_column(ColumnKey::Series(SeriesKey::PolicyRate), target);
        table.insert_column(ColumnKey::Series(SeriesKey::EffectiveRate), effective);
        table
    }

    #[test]
    fn reported_spread_takes_precedence_over_arithmetic() {
        let mut table = table_with(
            vec![Some(4.5)],
            vec![Some(4.0)],
            vec![Some(-0.2)],
            vec![Some(5.0)],
            vec![Some(5.1)],
        );
        add_derived_columns(&mut table);

        // 10Y-2Y arithmetic would be +0.5; the reported -0.2 must win.
        assert_eq!(table.value(ColumnKey::YieldCurve, 0), Some(-0.2));
    }

    #[test]
    fn falls_back_to_rate_difference_when_no_reported_spread() {
        let mut table = table_with(
            vec![Some(4.5), Some(4.5)],
            vec![Some(4.0), Some(4.7)],
            vec![None, None],
            vec![Some(5.0), Some(5.0)],
            vec![Some(5.1), Some(5.1)],
        );
        add_derived_columns(&mut table);

        assert_eq!(table.value(ColumnKey::YieldCurve, 0), Some(0.5));
        let inverted = table.value(ColumnKey::YieldCurve, 1).unwrap();
        assert!((inverted - (-0.2)).abs() < 1e-12);
    }

    #[test]
    fn rate_gap_and_policy_spread() {
        let mut table = table_with(
            vec![Some(4.8)],
            vec![Some(4.9)],
            vec![None],
            vec![Some(5.0)],
            vec![Some(5.3)],
        );
        add_derived_columns(&mut table);

        let gap = table.value(ColumnKey::RateGap, 0).unwrap();
        let policy = table.value(ColumnKey::PolicySpread, 0).unwrap();
        assert!((gap - (-0.2)).abs() < 1e-12);
        assert!((policy - (-0.4)).abs() < 1e-12);
    }

    #[test]
    fn missing_input_blanks_only_that_row() {
        let mut table = table_with(
            vec![Some(4.5), Some(4.6)],
            vec![None, Some(4.0)],
            vec![None, None],
            vec![Some(5.0), Some(5.0)],
            vec![Some(5.1), Some(5.1)],
        );
        add_derived_columns(&mut table);

        assert_eq!(table.value(ColumnKey::YieldCurve, 0), None);
        assert!(table.value(ColumnKey::YieldCurve, 1).is_some());
        // Rate gap only needs 10Y and the target: row 0 still computes.
        assert!(table.value(ColumnKey::RateGap, 0).is_some());
    }
}
