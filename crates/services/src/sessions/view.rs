use serde::Serialize;

use emmet_core::model::{
    AttemptStatus, CompletionRecord, Difficulty, GameMode, Level, LevelId, SessionId,
};
use emmet_core::timer::format_clock;

use super::progress::SessionProgress;
use super::service::{GameSession, HintState, SessionPhase};

/// What the renderer shows for the level on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelView {
    pub id: LevelId,
    /// 1-based position in the run.
    pub number: usize,
    pub total: usize,
    pub title: String,
    pub difficulty: Difficulty,
    pub rank: &'static str,
    pub concept: String,
    /// Hidden on tracks that do not show examples.
    pub examples: Option<Vec<String>>,
    pub hint: String,
    pub target_markup: String,
}

impl LevelView {
    #[must_use]
    pub fn new(level: &Level, number: usize, total: usize, show_examples: bool) -> Self {
        Self {
            id: level.id(),
            number,
            total,
            title: level.title().to_string(),
            difficulty: level.difficulty(),
            rank: level.difficulty().rank_title(),
            concept: level.concept().to_string(),
            examples: show_examples.then(|| level.examples().to_vec()),
            hint: level.hint().to_string(),
            target_markup: level.target_markup().to_string(),
        }
    }
}

/// Everything a renderer needs to draw the session in one read.
///
/// Plain data: taking a snapshot never changes the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub mode: GameMode,
    pub phase: SessionPhase,
    pub level: LevelView,
    pub status: AttemptStatus,
    pub raw_input: String,
    pub produced_markup: String,
    /// User-facing message for a mismatch.
    pub error_message: Option<String>,
    pub hint: HintState,
    /// `mm:ss` readout, timed tracks only.
    pub timer: Option<String>,
    pub final_time: Option<String>,
    pub progress: SessionProgress,
    pub completion: Option<CompletionRecord>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn capture(session: &GameSession) -> Self {
        let strategy = session.strategy();
        let attempt = session.attempt();
        let total = session.levels().len();
        Self {
            session_id: session.id(),
            mode: session.mode(),
            phase: session.phase(),
            level: LevelView::new(
                session.current_level(),
                session.current_index() + 1,
                total,
                strategy.shows_examples(),
            ),
            status: attempt.status(),
            raw_input: attempt.raw_input().to_string(),
            produced_markup: attempt.produced_markup().to_string(),
            error_message: attempt.error_reason().map(|reason| reason.to_string()),
            hint: session.hint().clone(),
            timer: strategy
                .is_timed()
                .then(|| format_clock(session.elapsed_seconds())),
            final_time: session.final_seconds().map(format_clock),
            progress: session.progress(),
            completion: session.completion().cloned(),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == AttemptStatus::Pending
    }
}

impl GameSession {
    #[must_use]
    pub fn level_view(&self) -> LevelView {
        LevelView::new(
            self.current_level(),
            self.current_index() + 1,
            self.levels().len(),
            self.strategy().shows_examples(),
        )
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::expansion::Expansion;
    use emmet_core::model::MismatchReason;
    use emmet_core::time::fixed_clock;

    fn started(mode: GameMode) -> GameSession {
        let config = EngineConfig::default().with_seed(Some(11));
        let mut session = GameSession::for_mode(mode, &config, fixed_clock()).unwrap();
        session.start().unwrap();
        session
    }

    #[test]
    fn learning_view_shows_examples_and_rank() {
        let view = started(GameMode::Learning).level_view();
        assert_eq!(view.number, 1);
        assert_eq!(view.total, 12);
        assert_eq!(view.title, "Basic Tag");
        assert_eq!(view.rank, "Junior Developer");
        assert_eq!(
            view.examples.as_deref(),
            Some(&["div".to_string(), "h1".into(), "p".into(), "section".into()][..])
        );
    }

    #[test]
    fn challenge_view_hides_examples() {
        let view = started(GameMode::Challenge).level_view();
        assert!(view.examples.is_none());
        assert_eq!(view.total, 10);
    }

    #[test]
    fn snapshot_reports_timer_and_errors() {
        let mut session = started(GameMode::Challenge);
        for _ in 0..65 {
            session.tick();
        }
        let ticket = session.begin_submission("x").unwrap().unwrap();
        assert!(session.snapshot().is_pending());
        session
            .apply_expansion(&ticket, Ok(Expansion::Invalid))
            .unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.timer.as_deref(), Some("01:05"));
        assert_eq!(
            snapshot.status,
            AttemptStatus::Mismatched(MismatchReason::InvalidSyntax)
        );
        assert_eq!(snapshot.error_message.as_deref(), Some("Invalid Emmet syntax."));
        assert_eq!(snapshot.progress.label(), "1 / 10");
    }

    #[test]
    fn learning_snapshot_has_no_timer() {
        let snapshot = started(GameMode::Learning).snapshot();
        assert!(snapshot.timer.is_none());
        assert_eq!(snapshot.phase, SessionPhase::Playing);
    }

    #[test]
    fn snapshot_serializes_for_renderers() {
        let json = serde_json::to_value(started(GameMode::Learning).snapshot()).unwrap();
        assert_eq!(json["mode"], "LEARNING");
        assert_eq!(json["phase"], "PLAYING");
        assert_eq!(json["status"]["status"], "IDLE");
        assert_eq!(json["hint"]["state"], "HIDDEN");
    }
}
