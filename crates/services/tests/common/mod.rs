#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use emmet_core::time::fixed_clock;
use services::{
    EngineConfig, ExpandError, Expander, Expansion, HintProvider, HintRequest,
    SessionLoopService, StaticHints,
};

/// Treats the input as already-expanded markup.
pub struct EchoExpander;

#[async_trait]
impl Expander for EchoExpander {
    async fn expand(&self, abbreviation: &str) -> Result<Expansion, ExpandError> {
        Ok(Expansion::Markup(abbreviation.to_string()))
    }
}

/// Always fails like an unreachable service.
pub struct FailingExpander;

#[async_trait]
impl Expander for FailingExpander {
    async fn expand(&self, _abbreviation: &str) -> Result<Expansion, ExpandError> {
        Err(ExpandError::Failed("connection refused".into()))
    }
}

/// Signals when a call starts, then waits `delay` before echoing.
pub struct SlowExpander {
    pub entered: Arc<Notify>,
    pub delay: Duration,
}

impl SlowExpander {
    pub fn new(delay: Duration) -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            delay,
        }
    }
}

#[async_trait]
impl Expander for SlowExpander {
    async fn expand(&self, abbreviation: &str) -> Result<Expansion, ExpandError> {
        self.entered.notify_one();
        tokio::time::sleep(self.delay).await;
        Ok(Expansion::Markup(abbreviation.to_string()))
    }
}

/// Hint provider that never answers.
pub struct HangingHints {
    pub entered: Arc<Notify>,
}

impl HangingHints {
    pub fn new() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl HintProvider for HangingHints {
    async fn hint(&self, _request: &HintRequest) -> String {
        self.entered.notify_one();
        std::future::pending().await
    }
}

pub fn service_with_hints(hints: Arc<dyn HintProvider>) -> SessionLoopService {
    SessionLoopService::new(
        Arc::new(EchoExpander),
        hints,
        EngineConfig::default().with_seed(Some(2024)),
        fixed_clock(),
    )
}

pub fn service_with(expander: Arc<dyn Expander>) -> SessionLoopService {
    SessionLoopService::new(
        expander,
        Arc::new(StaticHints),
        EngineConfig::default().with_seed(Some(2024)),
        fixed_clock(),
    )
}
