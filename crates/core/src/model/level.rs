use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::LevelId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level id must be > 0")]
    InvalidId,

    #[error("level title cannot be empty")]
    EmptyTitle,

    #[error("level concept cannot be empty")]
    EmptyConcept,

    #[error("level target markup cannot be empty")]
    EmptyTargetMarkup,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier of a level.
///
/// Tiers are ordered: `Junior < Pleno < Senior`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Junior,
    Pleno,
    Senior,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Junior, Difficulty::Pleno, Difficulty::Senior];

    /// Rank awarded to a learner working at this tier.
    #[must_use]
    pub fn rank_title(self) -> &'static str {
        match self {
            Difficulty::Junior => "Junior Developer",
            Difficulty::Pleno => "Mid-Level Developer",
            Difficulty::Senior => "Senior Architect",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Junior => "JUNIOR",
            Difficulty::Pleno => "PLENO",
            Difficulty::Senior => "SENIOR",
        };
        f.write_str(label)
    }
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated level fields, as written in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDraft {
    pub id: u64,
    pub difficulty: Difficulty,
    pub title: String,
    pub concept: String,
    pub examples: Vec<String>,
    pub target_markup: String,
    pub hint: String,
}

/// One taught concept: what to reproduce, with examples and a fallback hint.
///
/// Levels are immutable once validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    id: LevelId,
    difficulty: Difficulty,
    title: String,
    concept: String,
    examples: Vec<String>,
    target_markup: String,
    hint: String,
}

impl LevelDraft {
    /// Validate the draft into a `Level`.
    ///
    /// # Errors
    ///
    /// Returns `LevelError` if the id is zero or a required text field is blank.
    pub fn validate(self) -> Result<Level, LevelError> {
        if self.id == 0 {
            return Err(LevelError::InvalidId);
        }
        if self.title.trim().is_empty() {
            return Err(LevelError::EmptyTitle);
        }
        if self.concept.trim().is_empty() {
            return Err(LevelError::EmptyConcept);
        }
        if self.target_markup.trim().is_empty() {
            return Err(LevelError::EmptyTargetMarkup);
        }

        Ok(self.into_level())
    }

    /// Build without validation; only for the built-in catalog, whose entries
    /// are checked by tests.
    pub(crate) fn into_level(self) -> Level {
        Level {
            id: LevelId::new(self.id),
            difficulty: self.difficulty,
            title: self.title,
            concept: self.concept,
            examples: self.examples,
            target_markup: self.target_markup,
            hint: self.hint,
        }
    }
}

impl Level {
    #[must_use]
    pub fn id(&self) -> LevelId {
        self.id
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn concept(&self) -> &str {
        &self.concept
    }

    #[must_use]
    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    #[must_use]
    pub fn target_markup(&self) -> &str {
        &self.target_markup
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
