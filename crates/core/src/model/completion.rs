use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::mode::GameMode;
use crate::timer::format_clock;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompletionError {
    #[error("learner name cannot be empty")]
    EmptyName,

    #[error("a timed track must record its final time")]
    MissingFinalTime,

    #[error("an untimed track cannot record a final time")]
    UnexpectedFinalTime,
}

/// The diploma for a finished session.
///
/// `final_seconds` is present exactly when the mode is timed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    learner_name: String,
    mode: GameMode,
    final_seconds: Option<u64>,
    completed_at: DateTime<Utc>,
}

impl CompletionRecord {
    /// Build a record; the learner name is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::EmptyName` for a blank name, and a final-time
    /// error when `final_seconds` does not agree with `mode`.
    pub fn new(
        learner_name: &str,
        mode: GameMode,
        final_seconds: Option<u64>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, CompletionError> {
        let learner_name = learner_name.trim();
        if learner_name.is_empty() {
            return Err(CompletionError::EmptyName);
        }
        match (mode.is_timed(), final_seconds) {
            (true, None) => return Err(CompletionError::MissingFinalTime),
            (false, Some(_)) => return Err(CompletionError::UnexpectedFinalTime),
            _ => {}
        }

        Ok(Self {
            learner_name: learner_name.to_string(),
            mode,
            final_seconds,
            completed_at,
        })
    }

    #[must_use]
    pub fn learner_name(&self) -> &str {
        &self.learner_name
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn final_seconds(&self) -> Option<u64> {
        self.final_seconds
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Final time as `mm:ss`, for timed tracks.
    #[must_use]
    pub fn final_time_display(&self) -> Option<String> {
        self.final_seconds.map(format_clock)
    }
}
