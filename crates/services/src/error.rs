//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizDefinitionError;
use quiz_core::session::{SessionError, SummaryError};

/// Errors emitted while fetching and converting a quiz definition.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("quiz source is not configured")]
    NotConfigured,
    #[error("invalid quiz source url {raw:?}")]
    InvalidUrl { raw: String },
    #[error("quiz request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed quiz payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{field} is not a number: {raw:?}")]
    InvalidMarks { field: &'static str, raw: String },
    #[error("duration of {minutes} minutes does not fit in seconds")]
    DurationOverflow { minutes: u32 },
    #[error(transparent)]
    Invalid(#[from] QuizDefinitionError),
}

/// Errors emitted by `QuizSessionRunner`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}
