//! Error types.
//!
//! Two layers, converted at the app boundary:
//!
//! - [`AnalysisError`] — the core pipeline taxonomy. Missing individual
//!   factors are *not* errors (they are `Option::None` and recovered where
//!   they occur); only conditions that abort a run live here.
//! - [`AppError`] — what the binary reports: a message plus a process exit
//!   code (2 = config/file, 3 = insufficient data, 4 = network/data).

use thiserror::Error;

/// Fatal conditions raised by the core pipeline.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// The reference series is empty/absent, or alignment produced no rows.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    /// A threshold rule table is malformed (unordered or non-monotonic
    /// bands). Raised when the rule set is constructed, never while scoring.
    #[error("invalid threshold table: {0}")]
    InvalidRange(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let exit_code = match err {
            AnalysisError::InsufficientData(_) => 3,
            AnalysisError::InvalidRange(_) => 2,
        };
        AppError::new(exit_code, err.to_string())
    }
}
