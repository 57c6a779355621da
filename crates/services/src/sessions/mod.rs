mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{ChallengeTrack, LearningTrack, TrackStrategy, strategy_for};
pub use progress::SessionProgress;
pub use service::{Advance, GameSession, HintState, HintTicket, SessionPhase, SubmitTicket};
pub use view::{LevelView, SessionSnapshot};
pub use workflow::{HintOutcome, SessionHandle, SessionLoopService, SubmitOutcome};
