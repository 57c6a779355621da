use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::evaluator::Verdict;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Illegal attempt transitions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("an attempt is already in flight")]
    Pending,

    #[error("attempt already matched; advance to the next level")]
    AlreadyMatched,

    #[error("attempt is not waiting for a result")]
    NotPending,
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Why an attempt did not match. Every reason is recoverable by resubmitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MismatchReason {
    /// The expander rejected the abbreviation outright.
    InvalidSyntax,
    /// The abbreviation expanded, but not to the target markup.
    ContentMismatch,
    /// The expander was unreachable or failed.
    ServiceError,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MismatchReason::InvalidSyntax => "Invalid Emmet syntax.",
            MismatchReason::ContentMismatch => "Output does not match target.",
            MismatchReason::ServiceError => "Connection error.",
        };
        f.write_str(label)
    }
}

/// Lifecycle of a single attempt.
///
/// `Mismatched` always carries its reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "status", content = "reason")]
pub enum AttemptStatus {
    #[default]
    Idle,
    Pending,
    Matched,
    Mismatched(MismatchReason),
}

impl AttemptStatus {
    #[must_use]
    pub fn error_reason(self) -> Option<MismatchReason> {
        match self {
            AttemptStatus::Mismatched(reason) => Some(reason),
            _ => None,
        }
    }
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// The learner's current try at a level.
///
/// Transitions:
/// - `Idle | Mismatched` → `Pending` via [`Attempt::begin`]
/// - `Pending` → `Matched | Mismatched` via the `resolve_*` methods
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attempt {
    raw_input: String,
    status: AttemptStatus,
    produced_markup: String,
}

impl Attempt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    #[must_use]
    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    /// Markup produced by the last successful expansion; empty otherwise.
    #[must_use]
    pub fn produced_markup(&self) -> &str {
        &self.produced_markup
    }

    #[must_use]
    pub fn error_reason(&self) -> Option<MismatchReason> {
        self.status.error_reason()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == AttemptStatus::Pending
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.status == AttemptStatus::Matched
    }

    /// Mark the attempt as in flight for `raw_input`, clearing earlier output.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Pending` if a submission is already in flight and
    /// `AttemptError::AlreadyMatched` once the level is solved.
    pub fn begin(&mut self, raw_input: &str) -> Result<(), AttemptError> {
        match self.status {
            AttemptStatus::Pending => return Err(AttemptError::Pending),
            AttemptStatus::Matched => return Err(AttemptError::AlreadyMatched),
            AttemptStatus::Idle | AttemptStatus::Mismatched(_) => {}
        }

        raw_input.clone_into(&mut self.raw_input);
        self.produced_markup.clear();
        self.status = AttemptStatus::Pending;
        Ok(())
    }

    /// The expander returned markup, judged by the evaluator.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotPending` if no submission is in flight.
    pub fn resolve_markup(&mut self, markup: String, verdict: Verdict) -> Result<(), AttemptError> {
        self.ensure_pending()?;
        self.produced_markup = markup;
        self.status = match verdict {
            Verdict::Matched => AttemptStatus::Matched,
            Verdict::Mismatched => AttemptStatus::Mismatched(MismatchReason::ContentMismatch),
        };
        Ok(())
    }

    /// The expander reported that the input is not a valid abbreviation.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotPending` if no submission is in flight.
    pub fn resolve_invalid(&mut self) -> Result<(), AttemptError> {
        self.fail(MismatchReason::InvalidSyntax)
    }

    /// The expander could not be reached or failed.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotPending` if no submission is in flight.
    pub fn resolve_service_error(&mut self) -> Result<(), AttemptError> {
        self.fail(MismatchReason::ServiceError)
    }

    fn fail(&mut self, reason: MismatchReason) -> Result<(), AttemptError> {
        self.ensure_pending()?;
        self.status = AttemptStatus::Mismatched(reason);
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), AttemptError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(AttemptError::NotPending)
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_attempt_is_idle_and_empty() {
        let attempt = Attempt::new();
        assert_eq!(attempt.status(), AttemptStatus::Idle);
        assert!(attempt.produced_markup().is_empty());
        assert_eq!(attempt.error_reason(), None);
    }

    #[test]
    fn match_requires_pending_first() {
        let mut attempt = Attempt::new();
        let err = attempt
            .resolve_markup("<div></div>".into(), Verdict::Matched)
            .unwrap_err();
        assert_eq!(err, AttemptError::NotPending);
        assert_eq!(attempt.status(), AttemptStatus::Idle);

        attempt.begin("div").unwrap();
        attempt
            .resolve_markup("<div></div>".into(), Verdict::Matched)
            .unwrap();
        assert!(attempt.is_matched());
        assert_eq!(attempt.produced_markup(), "<div></div>");
    }

    #[test]
    fn mismatch_carries_reason_and_allows_retry() {
        let mut attempt = Attempt::new();
        attempt.begin("span").unwrap();
        attempt
            .resolve_markup("<span></span>".into(), Verdict::Mismatched)
            .unwrap();
        assert_eq!(
            attempt.status(),
            AttemptStatus::Mismatched(MismatchReason::ContentMismatch)
        );

        attempt.begin("div").unwrap();
        assert!(attempt.is_pending());
        assert!(attempt.produced_markup().is_empty());
        assert_eq!(attempt.raw_input(), "div");
    }

    #[test]
    fn second_begin_while_pending_is_rejected() {
        let mut attempt = Attempt::new();
        attempt.begin("div").unwrap();
        assert_eq!(attempt.begin("p").unwrap_err(), AttemptError::Pending);
        assert_eq!(attempt.raw_input(), "div");
    }

    #[test]
    fn matched_attempt_cannot_be_resubmitted() {
        let mut attempt = Attempt::new();
        attempt.begin("div").unwrap();
        attempt
            .resolve_markup("<div></div>".into(), Verdict::Matched)
            .unwrap();
        assert_eq!(attempt.begin("div").unwrap_err(), AttemptError::AlreadyMatched);
    }

    #[test]
    fn service_error_keeps_markup_empty() {
        let mut attempt = Attempt::new();
        attempt.begin("div").unwrap();
        attempt.resolve_service_error().unwrap();
        assert_eq!(attempt.error_reason(), Some(MismatchReason::ServiceError));
        assert!(attempt.produced_markup().is_empty());
    }
}
