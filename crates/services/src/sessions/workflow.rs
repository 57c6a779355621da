use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, Notify, watch};
use tokio::task::AbortHandle;
use tokio::time::{self, Instant};

use emmet_core::Clock;
use emmet_core::model::{AttemptStatus, CompletionRecord, GameMode, SessionId};

use super::service::{Advance, GameSession};
use super::view::SessionSnapshot;
use crate::config::EngineConfig;
use crate::error::{ExpandError, SessionError};
use crate::expansion::Expander;
use crate::hints::{HintProvider, UNAVAILABLE_HINT};

/// Result of a submission as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened.
    Ignored,
    Resolved(AttemptStatus),
    /// The session was restarted or abandoned while the expander ran.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintOutcome {
    Shown(String),
    Discarded,
}

/// Starts sessions wired to the expansion and hint collaborators.
#[derive(Clone)]
pub struct SessionLoopService {
    expander: Arc<dyn Expander>,
    hints: Arc<dyn HintProvider>,
    config: EngineConfig,
    clock: Clock,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        expander: Arc<dyn Expander>,
        hints: Arc<dyn HintProvider>,
        config: EngineConfig,
        clock: Clock,
    ) -> Self {
        Self {
            expander,
            hints,
            config,
            clock,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build and start a session for `mode`. Timed tracks get a tick driver.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no levels could be selected.
    pub async fn start_session(&self, mode: GameMode) -> Result<SessionHandle, SessionError> {
        let mut session = GameSession::for_mode(mode, &self.config, self.clock)?;
        session.start()?;
        let timed = session.strategy().is_timed();

        let run = session.id();
        let state = Arc::new(Mutex::new(session));
        let ticker =
            timed.then(|| spawn_ticker(Arc::downgrade(&state), run, self.config.tick_interval));

        Ok(SessionHandle {
            state,
            expander: Arc::clone(&self.expander),
            hints: Arc::clone(&self.hints),
            expand_timeout: self.config.expand_timeout,
            hint_timeout: self.config.hint_timeout,
            cancel: Arc::new(Notify::new()),
            ticker,
        })
    }
}

/// Background tick driver for a timed session.
#[derive(Clone)]
struct Ticker {
    task: AbortHandle,
    /// Id of the run being timed; a new id restarts the tick phase.
    run: Arc<watch::Sender<SessionId>>,
}

impl Ticker {
    fn restarted(&self, run: SessionId) {
        self.run.send_replace(run);
    }

    fn stop(&self) {
        self.task.abort();
    }
}

/// Drive `Timer` ticks until the session is dropped or abandoned.
///
/// Each run gets a full `period` before its first tick.
fn spawn_ticker(state: Weak<Mutex<GameSession>>, run: SessionId, period: Duration) -> Ticker {
    let (sender, mut runs) = watch::channel(run);
    let task = tokio::spawn(async move {
        let mut current = run;
        let mut interval = time::interval_at(Instant::now() + period, period);
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                changed = runs.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    current = *runs.borrow_and_update();
                    interval.reset();
                    continue;
                }
            }

            let Some(state) = state.upgrade() else {
                break;
            };
            let mut session = state.lock().await;
            if session.is_abandoned() {
                break;
            }
            // Restarted while this tick waited for the lock.
            if session.id() != current {
                current = session.id();
                interval.reset();
                continue;
            }
            session.tick();
        }
    });
    Ticker {
        task: task.abort_handle(),
        run: Arc::new(sender),
    }
}

/// Shared handle to a running session.
///
/// Every transition takes the session lock briefly; collaborator calls run
/// with the lock released. Clones share the same session.
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<Mutex<GameSession>>,
    expander: Arc<dyn Expander>,
    hints: Arc<dyn HintProvider>,
    expand_timeout: Duration,
    hint_timeout: Duration,
    cancel: Arc<Notify>,
    ticker: Option<Ticker>,
}

impl SessionHandle {
    pub async fn session_id(&self) -> SessionId {
        self.state.lock().await.id()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Expand `raw_input` and judge it against the current level.
    ///
    /// Expander failures and timeouts resolve the attempt as a service error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for illegal transitions, e.g. a second
    /// submission while one is in flight.
    pub async fn submit(&self, raw_input: &str) -> Result<SubmitOutcome, SessionError> {
        let ticket = {
            let mut session = self.state.lock().await;
            match session.begin_submission(raw_input)? {
                Some(ticket) => ticket,
                None => return Ok(SubmitOutcome::Ignored),
            }
        };

        let cancelled = self.cancel.notified();
        let expansion = time::timeout(self.expand_timeout, self.expander.expand(ticket.raw_input()));
        let result = tokio::select! {
            result = expansion => result.unwrap_or_else(|_| Err(ExpandError::Timeout)),
            () = cancelled => {
                tracing::debug!(session = %ticket.session_id(), "submission cancelled");
                return Ok(SubmitOutcome::Discarded);
            }
        };

        let mut session = self.state.lock().await;
        match session.apply_expansion(&ticket, result) {
            Ok(status) => Ok(SubmitOutcome::Resolved(status)),
            Err(SessionError::Stale) => Ok(SubmitOutcome::Discarded),
            Err(err) => Err(err),
        }
    }

    /// Fetch a hint for the current level after a wrong answer.
    ///
    /// A provider that outlives the hint timeout yields the unavailable
    /// fallback sentence.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::HintsDisabled` on tracks without hints,
    /// `SessionError::AttemptPending` while a submission is in flight and
    /// `SessionError::NoMistake` before a wrong answer.
    pub async fn request_hint(&self) -> Result<HintOutcome, SessionError> {
        let ticket = self.state.lock().await.begin_hint()?;

        let cancelled = self.cancel.notified();
        let hint = time::timeout(self.hint_timeout, self.hints.hint(ticket.request()));
        let text = tokio::select! {
            text = hint => text.unwrap_or_else(|_| {
                tracing::warn!(session = %ticket.session_id(), "hint request timed out");
                UNAVAILABLE_HINT.to_string()
            }),
            () = cancelled => return Ok(HintOutcome::Discarded),
        };

        let mut session = self.state.lock().await;
        match session.apply_hint(&ticket, text.clone()) {
            Ok(()) => Ok(HintOutcome::Shown(text)),
            Err(SessionError::Stale) => Ok(HintOutcome::Discarded),
            Err(err) => Err(err),
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotMatched` unless the current level is solved.
    pub async fn advance(&self) -> Result<Advance, SessionError> {
        self.state.lock().await.advance()
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` before the run is finished and
    /// `SessionError::Completion` for a blank name.
    pub async fn record_completion(&self, learner_name: &str) -> Result<CompletionRecord, SessionError> {
        let mut session = self.state.lock().await;
        session.record_completion(learner_name).cloned()
    }

    /// Start the same mode over and cancel anything in flight.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Abandoned` after abandon.
    pub async fn restart(&self) -> Result<(), SessionError> {
        let mut session = self.state.lock().await;
        session.restart()?;
        session.start()?;
        self.restarted(&session);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Abandoned` after abandon.
    pub async fn restart_with_seed(&self, seed: u64) -> Result<(), SessionError> {
        let mut session = self.state.lock().await;
        session.restart_with_seed(seed)?;
        session.start()?;
        self.restarted(&session);
        Ok(())
    }

    fn restarted(&self, session: &GameSession) {
        self.cancel.notify_waiters();
        if let Some(ticker) = &self.ticker {
            ticker.restarted(session.id());
        }
    }

    /// Leave the session: stop the timer, cancel in-flight calls and reject
    /// every later trigger.
    pub async fn abandon(&self) {
        self.state.lock().await.abandon();
        self.cancel.notify_waiters();
        if let Some(ticker) = &self.ticker {
            ticker.stop();
        }
    }
}
