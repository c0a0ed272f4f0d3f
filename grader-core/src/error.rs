//! Error taxonomy for the grader client.

use thiserror::Error;

/// Input problems caught locally before anything leaves the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported file type '{mime_type}'")]
    UnsupportedType { mime_type: String },

    #[error("file is empty")]
    EmptyFile,

    #[error("file could not be read: {reason}")]
    Unreadable { reason: String },

    #[error("file is {size_bytes} bytes, limit is {limit_bytes}")]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("student id is missing")]
    MissingStudentId,

    #[error("no file has been staged")]
    MissingFile,

    #[error("nothing to reset, no file was ever staged")]
    NothingToReset,

    #[error("a submission is already in progress")]
    SubmissionInFlight,

    #[error("no grading result is available yet")]
    ResultNotReady,
}

/// The main error type for grader operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Step one of the remote exchange failed.
    #[error("upload failed: {0}")]
    Upload(String),

    /// Step two of the remote exchange failed.
    #[error("scoring failed: {0}")]
    Scoring(String),

    #[error("no grading result found")]
    RelayNotFound,

    #[error("grading result could not be parsed: {0}")]
    RelayParse(String),

    #[error("session storage unavailable: {0}")]
    Storage(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GraderError {
    /// Relay failures end the result page in its error state.
    pub fn is_relay_failure(&self) -> bool {
        matches!(
            self,
            GraderError::RelayNotFound | GraderError::RelayParse(_) | GraderError::Storage(_)
        )
    }
}

/// Failure reported by an HTTP transport before any response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

pub type Result<T, E = GraderError> = std::result::Result<T, E>;
