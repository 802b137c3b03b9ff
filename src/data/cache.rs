//! TTL-bounded memoization for fetched series.
//!
//! Keyed by `(series, start date)`; an entry older than the TTL is treated
//! as absent and refetched on next access. The cache is owned by whoever
//! drives the fetch collaborator (the TUI keeps one per session) — the
//! analysis core never sees it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::domain::{SeriesKey, TimeSeries};

/// Matches the original dashboard's one-hour fetch cache.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
pub struct SeriesCache {
    ttl: Duration,
    entries: HashMap<(SeriesKey, NaiveDate), CacheEntry>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: Instant,
    series: TimeSeries,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// A still-fresh entry, or `None` if absent or past its TTL.
    pub fn get(&self, key: SeriesKey, start_date: NaiveDate) -> Option<&TimeSeries> {
        self.entries
            .get(&(key, start_date))
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| &e.series)
    }

    pub fn put(&mut self, key: SeriesKey, start_date: NaiveDate, series: TimeSeries) {
        self.entries.insert(
            (key, start_date),
            CacheEntry {
                fetched_at: Instant::now(),
                series,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
