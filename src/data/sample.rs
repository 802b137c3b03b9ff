//! Deterministic synthetic series for offline runs.
//!
//! Every series is a seeded Gaussian random walk sampled on its own cadence
//! (business-daily rates and spreads, a monthly policy rate, quarterly
//! delinquency rates), so the aligner's forward-fill and leading-missing
//! paths are exercised exactly as they are by live FRED data. The reported
//! 10Y-2Y spread is rebuilt from the generated rate walks plus basis noise,
//! so the derived-column precedence sees realistic near-agreement.
//!
//! Same seed + same window = identical series, byte for byte.

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{SeriesKey, TimeSeries};
use crate::error::AppError;

/// Observation cadence of a generated series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    BusinessDaily,
    Monthly,
    Quarterly,
}

/// Level, volatility and cadence for one series' walk.
struct SeriesShape {
    start_level: f64,
    sigma: f64,
    cadence: Cadence,
    floor: f64,
}

fn shape(key: SeriesKey) -> SeriesShape {
    use Cadence::*;
    let (start_level, sigma, cadence) = match key {
        SeriesKey::TenYear => (4.25, 0.035, BusinessDaily),
        SeriesKey::TwoYear => (4.15, 0.045, BusinessDaily),
        // Rebuilt from the rate walks; shape only carries the basis noise.
        SeriesKey::CurveDirect => (0.0, 0.02, BusinessDaily),
        SeriesKey::HySpread => (3.40, 0.060, BusinessDaily),
        SeriesKey::IgSpread => (1.20, 0.020, BusinessDaily),
        SeriesKey::PolicyRate => (4.50, 0.080, Monthly),
        SeriesKey::EffectiveRate => (4.40, 0.012, BusinessDaily),
        SeriesKey::CcDelinq => (3.10, 0.120, Quarterly),
        SeriesKey::ConsumerDelinq => (2.70, 0.090, Quarterly),
        SeriesKey::AutoDelinq => (2.90, 0.110, Quarterly),
        SeriesKey::CreDelinq => (1.90, 0.140, Quarterly),
        SeriesKey::ReDelinq => (1.80, 0.080, Quarterly),
    };
    SeriesShape {
        start_level,
        sigma,
        cadence,
        floor: 0.0,
    }
}

/// Generate the full offline input map over `[start_date, end_date]`.
pub fn generate_sample(
    start_date: NaiveDate,
    end_date: NaiveDate,
    seed: u64,
) -> Result<BTreeMap<SeriesKey, TimeSeries>, AppError> {
    if end_date < start_date {
        return Err(AppError::new(2, "Sample window end precedes its start."));
    }

    let mut out = BTreeMap::new();

    for key in SeriesKey::ALL {
        if key == SeriesKey::CurveDirect {
            continue;
        }
        out.insert(key, walk_series(key, start_date, end_date, seed)?);
    }

    let direct = reported_spread(
        &out[&SeriesKey::TenYear],
        &out[&SeriesKey::TwoYear],
        start_date,
        seed,
    )?;
    out.insert(SeriesKey::CurveDirect, direct);

    Ok(out)
}

fn walk_series(
    key: SeriesKey,
    start_date: NaiveDate,
    end_date: NaiveDate,
    seed: u64,
) -> Result<TimeSeries, AppError> {
    let shape = shape(key);
    let dates = cadence_dates(shape.cadence, start_date, end_date);

    let mut rng = StdRng::seed_from_u64(series_seed(seed, key, start_date));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut level = shape.start_level;
    let mut obs = Vec::with_capacity(dates.len());
    for date in dates {
        level = (level + shape.sigma * normal.sample(&mut rng)).max(shape.floor);
        obs.push((date, round_bp(level)));
    }

    Ok(TimeSeries::from_observations(obs))
}

/// The reported 10Y-2Y series: the walks' difference plus basis noise.
fn reported_spread(
    ten: &TimeSeries,
    two: &TimeSeries,
    start_date: NaiveDate,
    seed: u64,
) -> Result<TimeSeries, AppError> {
    let shape = shape(SeriesKey::CurveDirect);
    let mut rng = StdRng::seed_from_u64(series_seed(seed, SeriesKey::CurveDirect, start_date));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut obs = Vec::with_capacity(ten.len());
    for &(date, ten_value) in ten.points() {
        let Some(two_value) = two.value_on_or_before(date) else {
            continue;
        };
        let basis = shape.sigma * normal.sample(&mut rng);
        obs.push((date, round_bp(ten_value - two_value + basis)));
    }

    Ok(TimeSeries::from_observations(obs))
}

fn cadence_dates(cadence: Cadence, start_date: NaiveDate, end_date: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut date = start_date;
    while date <= end_date {
        let keep = match cadence {
            Cadence::BusinessDaily => {
                !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            }
            Cadence::Monthly => date.day() == 1,
            // Quarter-end publication dates, like the FRED delinquency series.
            Cadence::Quarterly => date.day() == 1 && matches!(date.month(), 1 | 4 | 7 | 10),
        };
        if keep {
            out.push(date);
        }
        date += Duration::days(1);
    }
    out
}

fn series_seed(seed: u64, key: SeriesKey, start_date: NaiveDate) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    key.key().hash(&mut hasher);
    start_date.hash(&mut hasher);
    hasher.finish()
}

/// FRED publishes to two decimals; match it so samples look native.
fn round_bp(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
