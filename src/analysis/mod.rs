//! The analysis pipeline core.
//!
//! Responsibilities:
//!
//! - align raw series onto the reference calendar (`align`)
//! - derive curve / gap / policy-spread columns (`indicators`)
//! - scan for yield-curve inversion intervals (`inversion`)
//! - score the latest row against the threshold rules (`risk`)
//! - classify the macro scenario (`scenario`)
//!
//! Everything here is pure and synchronous: no I/O, no clocks, no shared
//! state. Re-running on identical inputs yields identical outputs.

pub mod align;
pub mod indicators;
pub mod inversion;
pub mod risk;
pub mod scenario;

pub use align::*;
pub use indicators::*;
pub use inversion::*;
pub use risk::*;
pub use scenario::*;
