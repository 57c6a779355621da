//! Expansion collaborators: turn an abbreviation into markup.

use async_trait::async_trait;
use emmet_core::abbreviation::{self, AbbreviationError};

use crate::ai_client::AiClient;
use crate::error::ExpandError;

/// Reply the AI expander is instructed to give for unusable input.
pub const INVALID_SENTINEL: &str = "INVALID_EMMET";

const SYSTEM_PROMPT: &str = "You are a strict Emmet abbreviation engine. \
Convert the Emmet abbreviation you receive into standard HTML.\n\
Rules:\n\
1. Output ONLY the HTML. No markdown, no explanation.\n\
2. Do not add <!DOCTYPE html>, <html> or <body> wrappers unless the abbreviation asks for them.\n\
3. Indent the HTML with 2 spaces.\n\
4. If the abbreviation is invalid or nonsense, reply with exactly INVALID_EMMET.\n\
5. Support > (child), + (sibling), ^ (climb up), * (multiply), . (class), # (id), [] (attributes), {} (text), $ (numbering) and () (grouping).";

/// What an expander produced for one abbreviation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    Markup(String),
    /// The input is not a valid abbreviation.
    Invalid,
}

#[async_trait]
pub trait Expander: Send + Sync {
    /// Expand `abbreviation` into markup.
    ///
    /// # Errors
    ///
    /// Returns `ExpandError` when the collaborator is unreachable or fails.
    async fn expand(&self, abbreviation: &str) -> Result<Expansion, ExpandError>;
}

/// Deterministic in-process expander backed by the core abbreviation compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExpander;

#[async_trait]
impl Expander for LocalExpander {
    async fn expand(&self, input: &str) -> Result<Expansion, ExpandError> {
        match abbreviation::expand(input) {
            Ok(markup) => Ok(Expansion::Markup(markup)),
            Err(err @ (AbbreviationError::TooLarge { .. } | AbbreviationError::TooDeep { .. })) => {
                Err(ExpandError::Failed(err.to_string()))
            }
            Err(err) => {
                tracing::debug!(error = %err, "abbreviation rejected");
                Ok(Expansion::Invalid)
            }
        }
    }
}

/// Expander that asks a chat-completion model at temperature 0.
#[derive(Debug, Clone)]
pub struct AiExpander {
    client: AiClient,
}

impl AiExpander {
    #[must_use]
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Expander for AiExpander {
    async fn expand(&self, input: &str) -> Result<Expansion, ExpandError> {
        let reply = self.client.complete(SYSTEM_PROMPT, input, 0.0).await?;
        Ok(interpret_reply(&reply))
    }
}

/// Map a raw model reply onto an `Expansion`, dropping markdown fences.
fn interpret_reply(reply: &str) -> Expansion {
    let body = strip_code_fence(reply.trim());
    if body == INVALID_SENTINEL {
        Expansion::Invalid
    } else {
        Expansion::Markup(body.to_string())
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag on the opening fence.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
