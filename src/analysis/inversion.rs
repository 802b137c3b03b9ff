//! Yield-curve inversion interval detection.
//!
//! A two-state scan over the `YIELD_CURVE` column in date order. Missing
//! values hold the current state: a reporting gap is policy-neutral and
//! neither starts, splits, nor ends an interval. Only a real `>= 0`
//! observation closes one.

use chrono::NaiveDate;

use crate::domain::InversionInterval;

/// Extract the contiguous negative intervals from the yield-curve column.
///
/// Intervals closed mid-stream use an exclusive `end` (the first date back
/// at or above zero). If the stream ends while still inverted, the final
/// interval is `open_ended` and its `end` is the last observed date.
pub fn find_inversions(points: &[(NaiveDate, Option<f64>)]) -> Vec<InversionInterval> {
    let mut intervals = Vec::new();
    let mut start: Option<NaiveDate> = None;
    let mut last_observed: Option<NaiveDate> = None;

    for &(date, value) in points {
        let Some(v) = value else { continue };
        last_observed = Some(date);

        match start {
            None if v < 0.0 => start = Some(date),
            Some(begin) if v >= 0.0 => {
                intervals.push(InversionInterval {
                    start: begin,
                    end: date,
                    open_ended: false,
                });
                start = None;
            }
            _ => {}
        }
    }

    if let (Some(begin), Some(end)) = (start, last_observed) {
        intervals.push(InversionInterval {
            start: begin,
            end,
            open_ended: true,
        });
    }

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    fn seq(values: &[Option<f64>]) -> Vec<(NaiveDate, Option<f64>)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (d(i as u32 + 1), *v))
            .collect()
    }

    #[test]
    fn single_interval_with_exclusive_end() {
        let got = find_inversions(&seq(&[Some(1.0), Some(-1.0), Some(-1.0), Some(2.0)]));
        assert_eq!(
            got,
            vec![InversionInterval {
                start: d(2),
                end: d(4),
                open_ended: false,
            }]
        );
    }

    #[test]
    fn terminal_inversion_is_open_ended() {
        let got = find_inversions(&seq(&[Some(1.0), Some(-1.0), Some(-1.0)]));
        assert_eq!(
            got,
            vec![InversionInterval {
                start: d(2),
                end: d(3),
                open_ended: true,
            }]
        );
    }

    #[test]
    fn gap_does_not_split_an_interval() {
        let got = find_inversions(&seq(&[Some(-1.0), None, Some(-1.0), Some(2.0)]));
        assert_eq!(
            got,
            vec![InversionInterval {
                start: d(1),
                end: d(4),
                open_ended: false,
            }]
        );
    }

    #[test]
    fn gap_does_not_start_an_interval() {
        let got = find_inversions(&seq(&[None, None, Some(0.5), Some(0.1)]));
        assert!(got.is_empty());
    }

    #[test]
    fn zero_reading_is_not_inverted() {
        let got = find_inversions(&seq(&[Some(-0.1), Some(0.0), Some(-0.1)]));
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].end, d(2));
        assert!(!got[0].open_ended);
        assert!(got[1].open_ended);
    }

    #[test]
    fn multiple_intervals_stay_chronological() {
        let got = find_inversions(&seq(&[
            Some(-0.2),
            Some(0.3),
            Some(0.1),
            Some(-0.4),
            Some(-0.1),
            Some(0.2),
        ]));
        assert_eq!(got.len(), 2);
        assert_eq!((got[0].start, got[0].end), (d(1), d(2)));
        assert_eq!((got[1].start, got[1].end), (d(4), d(6)));
        assert!(got.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn empty_and_all_missing_inputs_yield_nothing() {
        assert!(find_inversions(&[]).is_empty());
        assert!(find_inversions(&seq(&[None, None])).is_empty());
    }
}
