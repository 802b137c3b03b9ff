//! FRED API integration for the macro input series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::cache::SeriesCache;
use crate::domain::{SeriesKey, TimeSeries};
use crate::error::AppError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 100_000;

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::new(2, "Missing FRED_API_KEY in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Fetch every known series over `[start_date, end_date]`.
    ///
    /// A series that fails to fetch or comes back empty is reported on
    /// stderr and left out of the map — losing one factor must not abort
    /// the rest. The caller decides whether what remains is enough.
    pub fn fetch_all(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BTreeMap<SeriesKey, TimeSeries> {
        let mut out = BTreeMap::new();
        for key in SeriesKey::ALL {
            match self.fetch_series(key, start_date, end_date) {
                Ok(series) if !series.is_empty() => {
                    out.insert(key, series);
                }
                Ok(_) => {
                    eprintln!(
                        "warning: no observations for {} ({})",
                        key.display_name(),
                        key.fred_id()
                    );
                }
                Err(err) => {
                    eprintln!(
                        "warning: failed to fetch {} ({}): {err}",
                        key.display_name(),
                        key.fred_id()
                    );
                }
            }
        }
        out
    }

    /// Same as [`fetch_all`], but consults the TTL cache first.
    ///
    /// Used by the TUI so refreshes within the TTL don't re-hit the API.
    ///
    /// [`fetch_all`]: FredClient::fetch_all
    pub fn fetch_all_cached(
        &self,
        cache: &mut SeriesCache,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BTreeMap<SeriesKey, TimeSeries> {
        let mut out = BTreeMap::new();
        for key in SeriesKey::ALL {
            if let Some(series) = cache.get(key, start_date) {
                out.insert(key, series.clone());
                continue;
            }
            match self.fetch_series(key, start_date, end_date) {
                Ok(series) if !series.is_empty() => {
                    cache.put(key, start_date, series.clone());
                    out.insert(key, series);
                }
                Ok(_) => {
                    eprintln!(
                        "warning: no observations for {} ({})",
                        key.display_name(),
                        key.fred_id()
                    );
                }
                Err(err) => {
                    eprintln!(
                        "warning: failed to fetch {} ({}): {err}",
                        key.display_name(),
                        key.fred_id()
                    );
                }
            }
        }
        out
    }

    fn fetch_series(
        &self,
        key: SeriesKey,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<TimeSeries, AppError> {
        let limit = OBS_LIMIT.to_string();
        let start = start_date.to_string();
        let end = end_date.to_string();

        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", key.fred_id()),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("observation_start", start.as_str()),
                ("observation_end", end.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .map_err(|e| AppError::new(4, format!("FRED request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("FRED request failed with status {}.", resp.status()),
            ));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse FRED response: {e}")))?;

        parse_observations(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

/// Convert a FRED payload to a series.
///
/// FRED encodes missing observations as `"."`; those rows are skipped so a
/// `TimeSeries` holds only real observations (the aligner's forward-fill
/// supplies the gaps later).
fn parse_observations(body: &ObservationsResponse) -> Result<TimeSeries, AppError> {
    let mut obs = Vec::with_capacity(body.observations.len());
    for o in &body.observations {
        let value = match parse_value(&o.value) {
            Some(v) => v,
            None => continue,
        };
        let date = NaiveDate::parse_from_str(&o.date, "%Y-%m-%d")
            .map_err(|e| AppError::new(4, format!("Invalid FRED date '{}': {e}", o.date)))?;
        obs.push((date, value));
    }
    Ok(TimeSeries::from_observations(obs))
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_skips_fred_missing_markers() {
        assert_eq!(parse_value("4.25"), Some(4.25));
        assert_eq!(parse_value(" 4.25 "), Some(4.25));
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("n/a"), None);
        assert_eq!(parse_value("inf"), None);
    }

    #[test]
    fn observations_payload_becomes_an_ordered_series() {
        let json = r#"{
            "observations": [
                {"date": "2025-01-03", "value": "4.57"},
                {"date": "2025-01-06", "value": "."},
                {"date": "2025-01-07", "value": "4.61"}
            ]
        }"#;
        let body: ObservationsResponse = serde_json::from_str(json).unwrap();
        let series = parse_observations(&body).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(
            series.first_date(),
            NaiveDate::from_ymd_opt(2025, 1, 3)
        );
        assert_eq!(
            series.last_date(),
            NaiveDate::from_ymd_opt(2025, 1, 7)
        );
    }

    #[test]
    fn malformed_date_is_an_error() {
        let json = r#"{"observations": [{"date": "01/03/2025", "value": "4.5"}]}"#;
        let body: ObservationsResponse = serde_json::from_str(json).unwrap();
        assert!(parse_observations(&body).is_err());
    }
}
