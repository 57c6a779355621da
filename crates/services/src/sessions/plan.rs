use std::fmt;

use rand::RngCore;
use rand::seq::SliceRandom;

use emmet_core::model::{GameMode, Level};

/// How a session picks its levels and which mode rules apply while playing.
///
/// The progression state machine never branches on the mode directly; it asks
/// the strategy.
pub trait TrackStrategy: Send + Sync + fmt::Debug {
    fn mode(&self) -> GameMode;

    /// Choose the ordered level sequence for one run.
    fn select(&self, catalog: &[Level], rng: &mut dyn RngCore) -> Vec<Level>;

    /// Whether the timer runs while playing.
    fn is_timed(&self) -> bool;

    /// Whether per-level examples are shown.
    fn shows_examples(&self) -> bool;

    /// Whether the learner may ask for hints.
    fn allows_hints(&self) -> bool;
}

/// Every level in catalog order, untimed, with examples and hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct LearningTrack;

impl TrackStrategy for LearningTrack {
    fn mode(&self) -> GameMode {
        GameMode::Learning
    }

    fn select(&self, catalog: &[Level], _rng: &mut dyn RngCore) -> Vec<Level> {
        catalog.to_vec()
    }

    fn is_timed(&self) -> bool {
        false
    }

    fn shows_examples(&self) -> bool {
        true
    }

    fn allows_hints(&self) -> bool {
        true
    }
}

/// A uniformly shuffled sample of the catalog, played against the clock.
#[derive(Debug, Clone, Copy)]
pub struct ChallengeTrack {
    sample_size: usize,
}

impl ChallengeTrack {
    #[must_use]
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl TrackStrategy for ChallengeTrack {
    fn mode(&self) -> GameMode {
        GameMode::Challenge
    }

    fn select(&self, catalog: &[Level], rng: &mut dyn RngCore) -> Vec<Level> {
        let mut levels = catalog.to_vec();
        levels.shuffle(rng);
        levels.truncate(self.sample_size);
        levels
    }

    fn is_timed(&self) -> bool {
        true
    }

    fn shows_examples(&self) -> bool {
        false
    }

    fn allows_hints(&self) -> bool {
        false
    }
}

/// Strategy for `mode`.
#[must_use]
pub fn strategy_for(mode: GameMode, challenge_sample_size: usize) -> Box<dyn TrackStrategy> {
    match mode {
        GameMode::Learning => Box::new(LearningTrack),
        GameMode::Challenge => Box::new(ChallengeTrack::new(challenge_sample_size)),
    }
}
