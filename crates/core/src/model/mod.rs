mod attempt;
mod completion;
mod ids;
mod level;
mod mode;

pub use ids::{LevelId, ParseIdError, SessionId};

pub use attempt::{Attempt, AttemptError, AttemptStatus, MismatchReason};
pub use completion::{CompletionError, CompletionRecord};
pub use level::{Difficulty, Level, LevelDraft, LevelError};
pub use mode::{GameMode, ParseModeError};
