//! Data sources for the pipeline's input series.
//!
//! - live FRED observations (`fred`), with TTL memoization (`cache`)
//! - deterministic synthetic series for offline runs (`sample`)
//!
//! Both produce the same shape — a map of [`TimeSeries`] — so the analysis
//! core never knows where its inputs came from.
//!
//! [`TimeSeries`]: crate::domain::TimeSeries

pub mod cache;
pub mod fred;
pub mod sample;

pub use cache::*;
pub use fred::*;
pub use sample::*;
