#![forbid(unsafe_code)]

pub mod ai_client;
pub mod config;
pub mod error;
pub mod expansion;
pub mod hints;
pub mod sessions;

pub use emmet_core::Clock;
pub use sessions as session;

pub use ai_client::AiClient;
pub use config::{AiConfig, EngineConfig};
pub use error::{AiClientError, ConfigError, ExpandError, SessionError};
pub use expansion::{AiExpander, Expander, Expansion, LocalExpander};
pub use hints::{AiHints, HintProvider, HintRequest, StaticHints};

pub use sessions::{
    Advance, GameSession, HintOutcome, LevelView, SessionHandle, SessionLoopService,
    SessionPhase, SessionSnapshot, SubmitOutcome,
};
