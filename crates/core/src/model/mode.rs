use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown game mode: {raw}")]
pub struct ParseModeError {
    pub raw: String,
}

/// The track a learner picked on the selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    /// Every level, in catalog order, untimed.
    Learning,
    /// A random sample of levels against the clock.
    Challenge,
}

impl GameMode {
    #[must_use]
    pub fn is_timed(self) -> bool {
        matches!(self, GameMode::Challenge)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Learning => f.write_str("LEARNING"),
            GameMode::Challenge => f.write_str("CHALLENGE"),
        }
    }
}

impl FromStr for GameMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learning" | "learn" => Ok(GameMode::Learning),
            "challenge" => Ok(GameMode::Challenge),
            _ => Err(ParseModeError { raw: s.to_string() }),
        }
    }
}
