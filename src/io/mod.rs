//! Input/output helpers.
//!
//! - master table export (CSV) (`export`)
//! - assessment JSON write (`assessment`)

pub mod assessment;
pub mod export;

pub use assessment::*;
pub use export::*;
