use thiserror::Error;

use crate::status::SessionStatus;

/// Top-level error type for the mockmate engine.
///
/// `NotFound`, `InvalidState`, and `Validation` are usage errors and surface to
/// the caller. `Upstream` marks a failed generation-backend call; most call
/// sites absorb it into a documented fallback value instead of returning it.
#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("{operation} is not allowed while the session is {status}")]
    InvalidState {
        status: SessionStatus,
        operation: &'static str,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("generation backend unavailable: {0}")]
    Upstream(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InterviewError {
    pub fn session_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("interview session {id}"))
    }
}
