//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizStateError;

/// Errors emitted by a [`crate::QuizSource`] implementation.
///
/// Any of these is fatal for the turn that triggered the fetch; there is no
/// retry at this layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizSourceError {
    #[error("quiz set request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("no quiz set with id {0}")]
    UnknownSet(quiz_core::model::QuizId),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors that terminate a turn abnormally.
///
/// User-input problems (wrong answer, no active quiz, unknown category) are
/// never errors; they come back as speakable directives. Only upstream
/// fetch failures, invariant violations, and unroutable events land here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TurnError {
    #[error("unrecognized intent: {0}")]
    UnknownIntent(String),
    #[error("intent {intent} is missing required slot {slot}")]
    MissingSlot { intent: String, slot: String },
    #[error(transparent)]
    Source(#[from] QuizSourceError),
    #[error(transparent)]
    State(#[from] QuizStateError),
}
