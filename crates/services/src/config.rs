use std::env;
use std::time::Duration;

use emmet_core::model::GameMode;

use crate::error::ConfigError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Number of levels drawn for a challenge run.
pub const DEFAULT_CHALLENGE_SAMPLE_SIZE: usize = 10;

/// Connection settings for the AI collaborators.
///
/// `api_key` is the credential passed to the expansion and hint services.
#[derive(Clone, Debug)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiConfig {
    /// Read `EMMET_AI_API_KEY`, `EMMET_AI_BASE_URL` and `EMMET_AI_MODEL`.
    ///
    /// Returns `None` when no usable API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = lookup("EMMET_AI_API_KEY")?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = lookup("EMMET_AI_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let model = lookup("EMMET_AI_MODEL")
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key: api_key.trim().to_string(),
            model,
        })
    }
}

/// Tunables for the session engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub challenge_sample_size: usize,
    pub tick_interval: Duration,
    /// Upper bound on a single expansion call.
    pub expand_timeout: Duration,
    /// Upper bound on a single hint call; a late hint falls back to the
    /// unavailable sentence.
    pub hint_timeout: Duration,
    /// Fixed seed for level sampling; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            challenge_sample_size: DEFAULT_CHALLENGE_SAMPLE_SIZE,
            tick_interval: Duration::from_secs(1),
            expand_timeout: Duration::from_secs(15),
            hint_timeout: Duration::from_secs(15),
            seed: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    #[must_use]
    pub fn with_expand_timeout(mut self, timeout: Duration) -> Self {
        self.expand_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_hint_timeout(mut self, timeout: Duration) -> Self {
        self.hint_timeout = timeout;
        self
    }

    /// Defaults overridden by `EMMET_SEED` and `EMMET_CHALLENGE_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup("EMMET_SEED") {
            config.seed = Some(parse_seed(&raw)?);
        }
        if let Some(raw) = lookup("EMMET_CHALLENGE_SIZE") {
            config.challenge_sample_size = raw
                .trim()
                .parse()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidSampleSize { raw })?;
        }
        Ok(config)
    }
}

/// Parse a sampling seed.
///
/// # Errors
///
/// Returns `ConfigError::InvalidSeed` for anything but an unsigned integer.
pub fn parse_seed(raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidSeed {
        raw: raw.to_string(),
    })
}

/// Mode from `EMMET_MODE`, if set.
///
/// # Errors
///
/// Returns `ConfigError::Mode` when the value is not a known mode.
pub fn mode_from_env() -> Result<Option<GameMode>, ConfigError> {
    env::var("EMMET_MODE")
        .ok()
        .map(|raw| raw.parse::<GameMode>())
        .transpose()
        .map_err(ConfigError::from)
}
