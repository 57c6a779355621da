use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use emmet_core::Clock;
use emmet_core::catalog;
use emmet_core::evaluator::evaluate;
use emmet_core::model::{
    Attempt, AttemptError, AttemptStatus, CompletionRecord, GameMode, Level, SessionId,
};
use emmet_core::timer::Timer;

use super::plan::{TrackStrategy, strategy_for};
use super::progress::SessionProgress;
use crate::config::EngineConfig;
use crate::error::{ExpandError, SessionError};
use crate::expansion::Expansion;
use crate::hints::HintRequest;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where a play-through stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    /// Built, levels chosen, clock not running yet.
    Ready,
    Playing,
    /// Advanced past the last level. Terminal until restart.
    Complete,
    /// The learner left; nothing applies any more.
    Abandoned,
}

/// Hint panel contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HintState {
    Hidden,
    Loading,
    Shown(String),
}

/// Outcome of a successful advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on; carries the 1-based number of the new level.
    NextLevel { number: usize },
    /// Left the last level. `final_seconds` is set for timed tracks.
    Completed { final_seconds: Option<u64> },
}

/// Proof that a submission was accepted, handed back with its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    session_id: SessionId,
    level_index: usize,
    raw_input: String,
}

impl SubmitTicket {
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintTicket {
    session_id: SessionId,
    level_index: usize,
    generation: u64,
    request: HintRequest,
}

impl HintTicket {
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn request(&self) -> &HintRequest {
        &self.request
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through: the chosen levels, the cursor, the attempt and the timer.
///
/// All methods are synchronous and take `&mut self`, so a single owner
/// serialises every transition. Collaborator calls happen outside, bracketed
/// by `begin_*` and `apply_*`.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    strategy: Box<dyn TrackStrategy>,
    catalog: Vec<Level>,
    levels: Vec<Level>,
    current: usize,
    attempt: Attempt,
    hint: HintState,
    hint_generation: u64,
    timer: Timer,
    phase: SessionPhase,
    final_seconds: Option<u64>,
    completion: Option<CompletionRecord>,
    rng: StdRng,
    clock: Clock,
}

impl GameSession {
    /// Build a session for `mode` over the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the configured sample is empty.
    pub fn for_mode(mode: GameMode, config: &EngineConfig, clock: Clock) -> Result<Self, SessionError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::new(
            strategy_for(mode, config.challenge_sample_size),
            catalog::all_levels(),
            rng,
            clock,
        )
    }

    /// Build a session with an explicit strategy and catalog.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the strategy selects no levels.
    pub fn new(
        strategy: Box<dyn TrackStrategy>,
        catalog: Vec<Level>,
        rng: StdRng,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        let mut session = Self {
            id: SessionId::random(),
            strategy,
            catalog,
            levels: Vec::new(),
            current: 0,
            attempt: Attempt::new(),
            hint: HintState::Hidden,
            hint_generation: 0,
            timer: Timer::new(),
            phase: SessionPhase::Ready,
            final_seconds: None,
            completion: None,
            rng,
            clock,
        };
        session.rebuild()?;
        Ok(session)
    }

    /// Draw levels and reset every piece of run state.
    fn rebuild(&mut self) -> Result<(), SessionError> {
        let levels = self.strategy.select(&self.catalog, &mut self.rng);
        if levels.is_empty() {
            return Err(SessionError::Empty);
        }
        self.id = SessionId::random();
        self.levels = levels;
        self.current = 0;
        self.attempt = Attempt::new();
        self.clear_hint();
        self.timer.reset();
        self.phase = SessionPhase::Ready;
        self.final_seconds = None;
        self.completion = None;
        tracing::info!(
            session = %self.id,
            mode = %self.mode(),
            levels = self.levels.len(),
            "session built"
        );
        Ok(())
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.strategy.mode()
    }

    #[must_use]
    pub fn strategy(&self) -> &dyn TrackStrategy {
        self.strategy.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// 0-based cursor into `levels`.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_level(&self) -> &Level {
        // `levels` is never empty and `current` never passes the last index.
        &self.levels[self.current]
    }

    #[must_use]
    pub fn is_last_level(&self) -> bool {
        self.current + 1 == self.levels.len()
    }

    #[must_use]
    pub fn attempt(&self) -> &Attempt {
        &self.attempt
    }

    #[must_use]
    pub fn hint(&self) -> &HintState {
        &self.hint
    }

    #[must_use]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.timer.elapsed_seconds()
    }

    #[must_use]
    pub fn final_seconds(&self) -> Option<u64> {
        self.final_seconds
    }

    #[must_use]
    pub fn completion(&self) -> Option<&CompletionRecord> {
        self.completion.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.phase == SessionPhase::Abandoned
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.levels.len();
        let solved = if self.attempt.is_matched() || self.is_complete() {
            self.current + 1
        } else {
            self.current
        };
        SessionProgress {
            total,
            current: self.current + 1,
            solved,
            remaining: total - solved,
            is_complete: self.is_complete(),
        }
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Begin play; starts the timer on timed tracks. Idempotent while playing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` or `SessionError::Abandoned` for
    /// finished sessions.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Ready => {
                self.phase = SessionPhase::Playing;
                if self.strategy.is_timed() {
                    self.timer.start();
                }
                Ok(())
            }
            SessionPhase::Playing => Ok(()),
            SessionPhase::Complete => Err(SessionError::Completed),
            SessionPhase::Abandoned => Err(SessionError::Abandoned),
        }
    }

    /// Advance the timer by one second. Returns whether it counted.
    pub fn tick(&mut self) -> bool {
        self.phase == SessionPhase::Playing && self.timer.tick()
    }

    /// Accept `raw_input` for expansion.
    ///
    /// Blank input is ignored: `Ok(None)` with no state change.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AttemptPending` while a submission is in flight,
    /// `SessionError::Attempt` once the level is solved, and a phase error
    /// outside of play.
    pub fn begin_submission(&mut self, raw_input: &str) -> Result<Option<SubmitTicket>, SessionError> {
        self.ensure_playing()?;
        if raw_input.trim().is_empty() {
            return Ok(None);
        }

        self.attempt.begin(raw_input).map_err(|err| match err {
            AttemptError::Pending => SessionError::AttemptPending,
            other => SessionError::Attempt(other),
        })?;
        self.clear_hint();

        Ok(Some(SubmitTicket {
            session_id: self.id,
            level_index: self.current,
            raw_input: raw_input.to_string(),
        }))
    }

    /// Resolve the pending attempt with the expander's result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Stale` if the ticket belongs to an abandoned or
    /// restarted run; the result is then dropped.
    pub fn apply_expansion(
        &mut self,
        ticket: &SubmitTicket,
        result: Result<Expansion, ExpandError>,
    ) -> Result<AttemptStatus, SessionError> {
        self.ensure_current(ticket.session_id, ticket.level_index)?;

        match result {
            Ok(Expansion::Markup(markup)) => {
                let verdict = evaluate(&markup, self.current_level().target_markup());
                self.attempt.resolve_markup(markup, verdict)?;
            }
            Ok(Expansion::Invalid) => self.attempt.resolve_invalid()?,
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "expansion failed");
                self.attempt.resolve_service_error()?;
            }
        }

        let status = self.attempt.status();
        tracing::debug!(session = %self.id, level = self.current + 1, ?status, "attempt resolved");
        Ok(status)
    }

    /// Ask for a hint on the current level.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::HintsDisabled` on tracks without hints,
    /// `SessionError::AttemptPending` while a submission is in flight and
    /// `SessionError::NoMistake` unless the last attempt was wrong.
    pub fn begin_hint(&mut self) -> Result<HintTicket, SessionError> {
        self.ensure_playing()?;
        if !self.strategy.allows_hints() {
            return Err(SessionError::HintsDisabled);
        }
        if self.attempt.is_pending() {
            return Err(SessionError::AttemptPending);
        }
        if !matches!(self.attempt.status(), AttemptStatus::Mismatched(_)) {
            return Err(SessionError::NoMistake);
        }

        self.hint_generation += 1;
        self.hint = HintState::Loading;
        let level = self.current_level();
        Ok(HintTicket {
            session_id: self.id,
            level_index: self.current,
            generation: self.hint_generation,
            request: HintRequest {
                current_input: self.attempt.raw_input().to_string(),
                target_markup: level.target_markup().to_string(),
                concept: level.concept().to_string(),
                static_hint: level.hint().to_string(),
            },
        })
    }

    /// Show hint text fetched for `ticket`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Stale` if the hint was cleared or the run moved on.
    pub fn apply_hint(&mut self, ticket: &HintTicket, text: String) -> Result<(), SessionError> {
        self.ensure_current(ticket.session_id, ticket.level_index)?;
        if ticket.generation != self.hint_generation || self.hint != HintState::Loading {
            return Err(SessionError::Stale);
        }
        self.hint = HintState::Shown(text);
        Ok(())
    }

    /// Move past a solved level.
    ///
    /// Leaving the last level stops the timer and freezes the final time in
    /// the same step, so no tick can land in between.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotMatched` unless the current attempt matched.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        self.ensure_playing()?;
        if !self.attempt.is_matched() {
            return Err(SessionError::NotMatched);
        }

        if self.is_last_level() {
            self.timer.stop();
            self.final_seconds = self
                .strategy
                .is_timed()
                .then(|| self.timer.elapsed_seconds());
            self.phase = SessionPhase::Complete;
            self.clear_hint();
            tracing::info!(
                session = %self.id,
                final_seconds = ?self.final_seconds,
                "session complete"
            );
            return Ok(Advance::Completed {
                final_seconds: self.final_seconds,
            });
        }

        self.current += 1;
        self.attempt = Attempt::new();
        self.clear_hint();
        Ok(Advance::NextLevel {
            number: self.current + 1,
        })
    }

    /// Issue the diploma. Calling again with another name replaces the record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` before completion and
    /// `SessionError::Completion` for a blank name; the stored record is left
    /// untouched on error.
    pub fn record_completion(&mut self, learner_name: &str) -> Result<&CompletionRecord, SessionError> {
        match self.phase {
            SessionPhase::Complete => {}
            SessionPhase::Abandoned => return Err(SessionError::Abandoned),
            SessionPhase::Ready | SessionPhase::Playing => return Err(SessionError::NotComplete),
        }

        let record = CompletionRecord::new(
            learner_name,
            self.mode(),
            self.final_seconds,
            self.clock.now(),
        )?;
        tracing::info!(session = %self.id, learner = record.learner_name(), "completion recorded");
        Ok(self.completion.insert(record))
    }

    /// Start over with the same mode. Timed tracks draw a fresh sample.
    ///
    /// The session gets a new id, so in-flight results for the old run are
    /// rejected as stale. The rebuilt session is `Ready`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Abandoned` after abandon.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.is_abandoned() {
            return Err(SessionError::Abandoned);
        }
        self.rebuild()
    }

    /// Like [`GameSession::restart`], re-seeding level selection first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Abandoned` after abandon.
    pub fn restart_with_seed(&mut self, seed: u64) -> Result<(), SessionError> {
        if self.is_abandoned() {
            return Err(SessionError::Abandoned);
        }
        self.rng = StdRng::seed_from_u64(seed);
        self.rebuild()
    }

    /// Leave the session. Stops the timer; every later trigger is rejected and
    /// outstanding results are dropped.
    pub fn abandon(&mut self) {
        if self.is_abandoned() {
            return;
        }
        self.timer.stop();
        self.clear_hint();
        self.phase = SessionPhase::Abandoned;
        tracing::info!(session = %self.id, "session abandoned");
    }

    //
    // ─── HELPERS ───────────────────────────────────────────────────────────────
    //

    fn clear_hint(&mut self) {
        self.hint_generation += 1;
        self.hint = HintState::Hidden;
    }

    fn ensure_playing(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Playing => Ok(()),
            SessionPhase::Ready => Err(SessionError::NotStarted),
            SessionPhase::Complete => Err(SessionError::Completed),
            SessionPhase::Abandoned => Err(SessionError::Abandoned),
        }
    }

    fn ensure_current(&self, session_id: SessionId, level_index: usize) -> Result<(), SessionError> {
        if self.is_abandoned() || session_id != self.id || level_index != self.current {
            tracing::debug!(session = %self.id, stale = %session_id, "discarding stale result");
            return Err(SessionError::Stale);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emmet_core::model::MismatchReason;
    use emmet_core::time::fixed_clock;

    fn seeded(mode: GameMode, seed: u64) -> GameSession {
        let config = EngineConfig::default().with_seed(Some(seed));
        let mut session = GameSession::for_mode(mode, &config, fixed_clock()).unwrap();
        session.start().unwrap();
        session
    }

    fn solve_current(session: &mut GameSession) {
        let target = session.current_level().target_markup().to_string();
        let ticket = session.begin_submission("answer").unwrap().unwrap();
        let status = session
            .apply_expansion(&ticket, Ok(Expansion::Markup(target)))
            .unwrap();
        assert_eq!(status, AttemptStatus::Matched);
    }

    fn miss_current(session: &mut GameSession) {
        let ticket = session.begin_submission("span").unwrap().unwrap();
        session
            .apply_expansion(&ticket, Ok(Expansion::Markup("<span></span>".into())))
            .unwrap();
    }

    #[test]
    fn construction_resets_run_state() {
        let config = EngineConfig::default().with_seed(Some(3));
        let session = GameSession::for_mode(GameMode::Challenge, &config, fixed_clock()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.attempt().status(), AttemptStatus::Idle);
        assert_eq!(session.elapsed_seconds(), 0);
        assert!(!session.timer().is_running());
        assert!(session.completion().is_none());
    }

    #[test]
    fn timer_runs_only_for_challenge() {
        let learning = seeded(GameMode::Learning, 1);
        assert!(!learning.timer().is_running());
        let challenge = seeded(GameMode::Challenge, 1);
        assert!(challenge.timer().is_running());
    }

    #[test]
    fn submit_before_start_is_rejected() {
        let config = EngineConfig::default();
        let mut session = GameSession::for_mode(GameMode::Learning, &config, fixed_clock()).unwrap();
        assert!(matches!(
            session.begin_submission("div"),
            Err(SessionError::NotStarted)
        ));
    }

    #[test]
    fn matched_and_mismatched_scenario() {
        let mut session = seeded(GameMode::Learning, 1);
        assert_eq!(session.current_level().title(), "Basic Tag");

        let ticket = session.begin_submission("span").unwrap().unwrap();
        assert!(session.attempt().is_pending());
        let status = session
            .apply_expansion(&ticket, Ok(Expansion::Markup("<span></span>".into())))
            .unwrap();
        assert_eq!(
            status,
            AttemptStatus::Mismatched(MismatchReason::ContentMismatch)
        );
        assert_eq!(session.attempt().produced_markup(), "<span></span>");

        let ticket = session.begin_submission("div").unwrap().unwrap();
        assert_eq!(session.attempt().produced_markup(), "");
        let status = session
            .apply_expansion(&ticket, Ok(Expansion::Markup("<div></div>".into())))
            .unwrap();
        assert_eq!(status, AttemptStatus::Matched);
    }

    #[test]
    fn blank_submission_changes_nothing() {
        let mut session = seeded(GameMode::Learning, 1);
        let ticket = session.begin_submission("div").unwrap().unwrap();
        session
            .apply_expansion(&ticket, Ok(Expansion::Markup("<p></p>".into())))
            .unwrap();
        let before = session.attempt().clone();

        assert!(session.begin_submission("   \n\t").unwrap().is_none());
        assert_eq!(session.attempt(), &before);
    }

    #[test]
    fn second_submission_while_pending_is_rejected() {
        let mut session = seeded(GameMode::Learning, 1);
        let _ticket = session.begin_submission("div").unwrap().unwrap();
        assert!(matches!(
            session.begin_submission("span"),
            Err(SessionError::AttemptPending)
        ));
    }

    #[test]
    fn invalid_and_failed_expansions_are_resubmittable() {
        let mut session = seeded(GameMode::Learning, 1);

        let ticket = session.begin_submission("??").unwrap().unwrap();
        let status = session.apply_expansion(&ticket, Ok(Expansion::Invalid)).unwrap();
        assert_eq!(status, AttemptStatus::Mismatched(MismatchReason::InvalidSyntax));

        let ticket = session.begin_submission("div").unwrap().unwrap();
        let status = session
            .apply_expansion(&ticket, Err(ExpandError::Timeout))
            .unwrap();
        assert_eq!(status, AttemptStatus::Mismatched(MismatchReason::ServiceError));

        assert!(session.begin_submission("div").unwrap().is_some());
    }

    #[test]
    fn advance_requires_a_match() {
        let mut session = seeded(GameMode::Learning, 1);
        assert!(matches!(session.advance(), Err(SessionError::NotMatched)));

        let ticket = session.begin_submission("div").unwrap().unwrap();
        assert!(matches!(session.advance(), Err(SessionError::NotMatched)));
        session.apply_expansion(&ticket, Ok(Expansion::Invalid)).unwrap();
        assert!(matches!(session.advance(), Err(SessionError::NotMatched)));
    }

    #[test]
    fn advance_resets_attempt_and_hint() {
        let mut session = seeded(GameMode::Learning, 1);
        miss_current(&mut session);
        let hint = session.begin_hint().unwrap();
        session.apply_hint(&hint, "Try div".into()).unwrap();
        solve_current(&mut session);
        assert_eq!(session.advance().unwrap(), Advance::NextLevel { number: 2 });
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.attempt().status(), AttemptStatus::Idle);
        assert_eq!(session.hint(), &HintState::Hidden);
    }

    #[test]
    fn learning_run_completes_without_final_time() {
        let mut session = seeded(GameMode::Learning, 1);
        let total = session.levels().len();
        for _ in 0..total - 1 {
            solve_current(&mut session);
            session.advance().unwrap();
        }
        solve_current(&mut session);
        assert_eq!(
            session.advance().unwrap(),
            Advance::Completed {
                final_seconds: None
            }
        );
        assert!(session.is_complete());
        assert_eq!(session.current_index(), total - 1);
        assert!(session.progress().is_complete);
        assert_eq!(session.progress().remaining, 0);
    }

    #[test]
    fn final_time_is_frozen_at_completion() {
        let mut session = seeded(GameMode::Challenge, 5);
        let total = session.levels().len();
        for _ in 0..total {
            for _ in 0..12 {
                assert!(session.tick());
            }
            solve_current(&mut session);
            session.advance().unwrap();
        }
        let frozen = 12 * total as u64;
        assert_eq!(session.final_seconds(), Some(frozen));
        assert!(!session.tick());
        assert_eq!(session.elapsed_seconds(), frozen);
        assert_eq!(session.final_seconds(), Some(frozen));
    }

    #[test]
    fn play_is_rejected_after_completion() {
        let mut session = seeded(GameMode::Learning, 1);
        while !session.is_complete() {
            solve_current(&mut session);
            session.advance().unwrap();
        }
        assert!(matches!(session.begin_submission("div"), Err(SessionError::Completed)));
        assert!(matches!(session.advance(), Err(SessionError::Completed)));
    }

    #[test]
    fn completion_requires_a_finished_run_and_a_name() {
        let mut session = seeded(GameMode::Learning, 1);
        assert!(matches!(
            session.record_completion("Ada"),
            Err(SessionError::NotComplete)
        ));
        while !session.is_complete() {
            solve_current(&mut session);
            session.advance().unwrap();
        }

        assert!(matches!(
            session.record_completion("   "),
            Err(SessionError::Completion(_))
        ));
        assert!(session.completion().is_none());

        let record = session.record_completion(" Ada ").unwrap();
        assert_eq!(record.learner_name(), "Ada");
        assert_eq!(record.mode(), GameMode::Learning);
        assert_eq!(record.final_seconds(), None);

        session.record_completion("Grace").unwrap();
        assert_eq!(session.completion().unwrap().learner_name(), "Grace");
    }

    #[test]
    fn hints_are_learning_only_and_not_while_pending() {
        let mut challenge = seeded(GameMode::Challenge, 1);
        assert!(matches!(challenge.begin_hint(), Err(SessionError::HintsDisabled)));

        let mut learning = seeded(GameMode::Learning, 1);
        let _ticket = learning.begin_submission("div").unwrap().unwrap();
        assert!(matches!(learning.begin_hint(), Err(SessionError::AttemptPending)));
    }

    #[test]
    fn hint_requires_a_wrong_answer() {
        let mut session = seeded(GameMode::Learning, 1);
        assert!(matches!(session.begin_hint(), Err(SessionError::NoMistake)));
        assert_eq!(session.hint(), &HintState::Hidden);

        let ticket = session.begin_submission("??").unwrap().unwrap();
        session.apply_expansion(&ticket, Ok(Expansion::Invalid)).unwrap();
        assert!(session.begin_hint().is_ok());

        solve_current(&mut session);
        assert!(matches!(session.begin_hint(), Err(SessionError::NoMistake)));
    }

    #[test]
    fn hint_cleared_by_submission_is_not_shown() {
        let mut session = seeded(GameMode::Learning, 1);
        miss_current(&mut session);
        let hint = session.begin_hint().unwrap();
        assert_eq!(hint.request().static_hint, "Just type 'div'.");
        assert_eq!(session.hint(), &HintState::Loading);

        let _submit = session.begin_submission("div").unwrap().unwrap();
        assert!(matches!(
            session.apply_hint(&hint, "late".into()),
            Err(SessionError::Stale)
        ));
        assert_eq!(session.hint(), &HintState::Hidden);
    }

    #[test]
    fn hint_is_shown_when_current() {
        let mut session = seeded(GameMode::Learning, 1);
        miss_current(&mut session);
        let hint = session.begin_hint().unwrap();
        session.apply_hint(&hint, "Try div".into()).unwrap();
        assert_eq!(session.hint(), &HintState::Shown("Try div".into()));
    }

    #[test]
    fn restart_discards_in_flight_results() {
        let mut session = seeded(GameMode::Challenge, 9);
        let old_id = session.id();
        let ticket = session.begin_submission("div").unwrap().unwrap();

        session.restart().unwrap();
        assert_ne!(session.id(), old_id);
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.elapsed_seconds(), 0);

        session.start().unwrap();
        assert!(matches!(
            session.apply_expansion(&ticket, Ok(Expansion::Markup("<div></div>".into()))),
            Err(SessionError::Stale)
        ));
        assert_eq!(session.attempt().status(), AttemptStatus::Idle);
    }

    #[test]
    fn restart_with_seed_is_deterministic() {
        let mut a = seeded(GameMode::Challenge, 1);
        let mut b = seeded(GameMode::Challenge, 2);
        a.restart_with_seed(77).unwrap();
        b.restart_with_seed(77).unwrap();
        assert_eq!(a.levels(), b.levels());
    }

    #[test]
    fn learning_restart_keeps_catalog_order() {
        let mut session = seeded(GameMode::Learning, 1);
        solve_current(&mut session);
        session.advance().unwrap();
        session.restart().unwrap();
        assert_eq!(session.levels(), catalog::all_levels().as_slice());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn abandon_stops_everything() {
        let mut session = seeded(GameMode::Challenge, 1);
        session.tick();
        let ticket = session.begin_submission("div").unwrap().unwrap();
        session.abandon();

        assert!(!session.timer().is_running());
        assert!(!session.tick());
        assert_eq!(session.elapsed_seconds(), 1);
        assert!(matches!(
            session.apply_expansion(&ticket, Ok(Expansion::Invalid)),
            Err(SessionError::Stale)
        ));
        assert!(matches!(session.begin_submission("div"), Err(SessionError::Abandoned)));
        assert!(matches!(session.restart(), Err(SessionError::Abandoned)));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let rng = StdRng::seed_from_u64(0);
        let err = GameSession::new(
            strategy_for(GameMode::Learning, 10),
            Vec::new(),
            rng,
            fixed_clock(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }
}
