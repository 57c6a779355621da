//! Shared error types for the services crate.

use thiserror::Error;

use emmet_core::model::{AttemptError, CompletionError, ParseModeError};

/// Errors emitted by `AiClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiClientError {
    #[error("AI collaborator is not configured")]
    Disabled,
    #[error("AI collaborator returned an empty response")]
    EmptyResponse,
    #[error("AI request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Failures of an expansion collaborator.
///
/// Any of these resolves the pending attempt as a service error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExpandError {
    #[error("expansion timed out")]
    Timeout,
    #[error("expansion failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Ai(#[from] AiClientError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no levels available for session")]
    Empty,
    #[error("session has not been started")]
    NotStarted,
    #[error("a submission is already in flight")]
    AttemptPending,
    #[error("current level is not solved yet")]
    NotMatched,
    #[error("session already completed")]
    Completed,
    #[error("session is not complete")]
    NotComplete,
    #[error("result belongs to a session that is no longer current")]
    Stale,
    #[error("session was abandoned")]
    Abandoned,
    #[error("hints are disabled in this mode")]
    HintsDisabled,
    #[error("hints are offered after a wrong answer")]
    NoMistake,
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid seed {raw:?}: expected an unsigned integer")]
    InvalidSeed { raw: String },
    #[error("invalid challenge sample size {raw:?}")]
    InvalidSampleSize { raw: String },
    #[error(transparent)]
    Mode(#[from] ParseModeError),
}
