use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::AiClientError;

/// Per-request bound for the whole HTTP exchange.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimal chat-completions client shared by the AI expander and hint provider.
#[derive(Clone, Debug)]
pub struct AiClient {
    client: Client,
    config: Option<AiConfig>,
}

impl AiClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<AiConfig>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default http client");
                Client::new()
            });
        Self { client, config }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Run one completion and return the trimmed reply.
    ///
    /// # Errors
    ///
    /// Returns `AiClientError` when the client is disabled, the request fails,
    /// or the reply is empty.
    pub async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, AiClientError> {
        let config = self.config.as_ref().ok_or(AiClientError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: &config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
        };

        tracing::debug!(model = %config.model, "sending chat completion");
        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AiClientError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(AiClientError::EmptyResponse)?;

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
