//! Hint collaborators. Hints are advisory and never fail.

use async_trait::async_trait;

use crate::ai_client::AiClient;
use crate::error::AiClientError;

pub const MISSING_KEY_HINT: &str = "Please provide an API Key to get AI hints.";
pub const UNAVAILABLE_HINT: &str = "Could not retrieve hint at this time.";
pub const EMPTY_HINT: &str = "Try checking the syntax again.";

const SYSTEM_PROMPT: &str = "You coach learners in an Emmet abbreviation game. \
Give one short, encouraging sentence explaining what is wrong with their input or how to get \
closer to the target. Do not give the exact answer.";

/// Everything a provider may use to phrase a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    pub current_input: String,
    pub target_markup: String,
    pub concept: String,
    /// The level's built-in hint.
    pub static_hint: String,
}

#[async_trait]
pub trait HintProvider: Send + Sync {
    /// Produce hint text. Failures come back as a fallback sentence.
    async fn hint(&self, request: &HintRequest) -> String;
}

/// Returns the level's own hint.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticHints;

#[async_trait]
impl HintProvider for StaticHints {
    async fn hint(&self, request: &HintRequest) -> String {
        request.static_hint.clone()
    }
}

#[derive(Debug, Clone)]
pub struct AiHints {
    client: AiClient,
}

impl AiHints {
    #[must_use]
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HintProvider for AiHints {
    async fn hint(&self, request: &HintRequest) -> String {
        if !self.client.enabled() {
            return MISSING_KEY_HINT.to_string();
        }
        let prompt = format!(
            "Target HTML:\n```html\n{}\n```\nConcept being taught: {}\nLearner's current input: \"{}\"",
            request.target_markup, request.concept, request.current_input
        );
        hint_or_fallback(self.client.complete(SYSTEM_PROMPT, &prompt, 0.7).await)
    }
}

/// Collapse a completion result into hint text.
fn hint_or_fallback(reply: Result<String, AiClientError>) -> String {
    match reply {
        Ok(text) => text,
        Err(AiClientError::Disabled) => MISSING_KEY_HINT.to_string(),
        Err(AiClientError::EmptyResponse) => EMPTY_HINT.to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "hint request failed");
            UNAVAILABLE_HINT.to_string()
        }
    }
}
