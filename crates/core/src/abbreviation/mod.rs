//! Abbreviation-to-markup compiler.
//!
//! `expand` runs three stages: the lexer splits the abbreviation into
//! operator, name, attribute and text tokens; the parser builds an element
//! tree from `>` (child), `+` (sibling), `^` (climb), `*N` (repeat) and
//! `( )` (group); the renderer prints the tree as indented markup, filling in
//! implicit tag names and `$` numbering.

mod lexer;
mod parser;
mod render;

use thiserror::Error;

pub use parser::{MAX_DEPTH, MAX_REPEAT};
pub use render::MAX_ELEMENTS;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AbbreviationError {
    #[error("abbreviation is empty")]
    Empty,

    #[error("unexpected character {ch:?} at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected {found:?} at {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("abbreviation ends unexpectedly")]
    UnexpectedEnd,

    #[error("{open:?} opened at {pos} is never closed")]
    Unterminated { open: char, pos: usize },

    #[error("group is not closed (at {pos})")]
    UnbalancedGroup { pos: usize },

    #[error("a group cannot take children with '>' (at {pos})")]
    ChildOfGroup { pos: usize },

    #[error("invalid attribute list at {pos}")]
    InvalidAttribute { pos: usize },

    #[error("invalid multiplier {raw:?}; expected 1..={max}", max = MAX_REPEAT)]
    InvalidMultiplier { raw: String },

    #[error("abbreviation expands to more than {limit} elements")]
    TooLarge { limit: usize },

    #[error("abbreviation nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("invalid numbering {raw:?}")]
    InvalidNumbering { raw: String },
}

/// Expand an abbreviation into markup indented with two spaces.
///
/// # Errors
///
/// Returns `AbbreviationError` when the input is not a valid abbreviation.
pub fn expand(abbreviation: &str) -> Result<String, AbbreviationError> {
    let abbreviation = abbreviation.trim();
    if abbreviation.is_empty() {
        return Err(AbbreviationError::Empty);
    }

    let tokens = lexer::tokenize(abbreviation)?;
    let tree = parser::parse(&tokens)?;
    render::render(&tree)
}
