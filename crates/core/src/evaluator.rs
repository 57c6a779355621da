//! Structural comparison of two markup fragments.
//!
//! Both sides are normalized by deleting every whitespace character and
//! lower-casing the rest; the fragments match iff the normalized strings are
//! identical. Indentation, line breaks and letter case are ignored. Tag and
//! attribute spelling, nesting and ordering are not.

use serde::{Deserialize, Serialize};

/// Outcome of comparing a candidate against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Matched,
    Mismatched,
}

impl Verdict {
    #[must_use]
    pub fn is_match(self) -> bool {
        matches!(self, Verdict::Matched)
    }
}

/// Strip all whitespace and case-fold.
#[must_use]
pub fn normalize(markup: &str) -> String {
    markup
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[must_use]
pub fn evaluate(candidate: &str, target: &str) -> Verdict {
    if normalize(candidate) == normalize(target) {
        Verdict::Matched
    } else {
        Verdict::Mismatched
    }
}
