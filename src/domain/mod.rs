//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed set of input series (`SeriesKey`) and table columns (`ColumnKey`)
//! - raw observation sequences (`TimeSeries`) and the aligned `MasterTable`
//! - analysis outputs (`InversionInterval`, `RiskAssessment`, `ScenarioId`)

pub mod types;

pub use types::*;
