mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use emmet_core::Clock;
use emmet_core::catalog::{CATALOG_SIZE, all_levels};
use emmet_core::model::{AttemptStatus, GameMode, LevelId};
use services::{Advance, EngineConfig, GameSession, SessionPhase, SubmitOutcome};

use common::{EchoExpander, service_with};

#[tokio::test(start_paused = true)]
async fn challenge_run_freezes_final_time() {
    let handle = service_with(Arc::new(EchoExpander))
        .start_session(GameMode::Challenge)
        .await
        .unwrap();

    let total = handle.snapshot().await.level.total;
    assert_eq!(total, 10);

    for number in 1..=total {
        let target = handle.snapshot().await.level.target_markup;
        assert_eq!(
            handle.submit(&target).await.unwrap(),
            SubmitOutcome::Resolved(AttemptStatus::Matched)
        );
        if number == total {
            tokio::time::sleep(Duration::from_millis(125_500)).await;
        }
        let advance = handle.advance().await.unwrap();
        if number < total {
            assert_eq!(advance, Advance::NextLevel { number: number + 1 });
        } else {
            assert_eq!(
                advance,
                Advance::Completed {
                    final_seconds: Some(125)
                }
            );
        }
    }

    let snapshot = handle.snapshot().await;
    assert_eq!(snapshot.phase, SessionPhase::Complete);
    assert_eq!(snapshot.final_time.as_deref(), Some("02:05"));

    // The driver keeps running but the stopped timer ignores it.
    tokio::time::sleep(Duration::from_secs(30)).await;
    let snapshot = handle.snapshot().await;
    assert_eq!(snapshot.timer.as_deref(), Some("02:05"));
    assert_eq!(snapshot.final_time.as_deref(), Some("02:05"));

    let record = handle.record_completion("Grace").await.unwrap();
    assert_eq!(record.final_seconds(), Some(125));
    assert_eq!(record.final_time_display().as_deref(), Some("02:05"));
}

#[tokio::test(start_paused = true)]
async fn learning_runs_untimed() {
    let handle = service_with(Arc::new(EchoExpander))
        .start_session(GameMode::Learning)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(handle.snapshot().await.timer.is_none());
}

#[tokio::test(start_paused = true)]
async fn restart_resets_the_clock() {
    let handle = service_with(Arc::new(EchoExpander))
        .start_session(GameMode::Challenge)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5_500)).await;
    assert_eq!(handle.snapshot().await.timer.as_deref(), Some("00:05"));

    let old_id = handle.session_id().await;
    handle.restart().await.unwrap();
    assert_ne!(handle.session_id().await, old_id);
    assert_eq!(handle.snapshot().await.timer.as_deref(), Some("00:00"));

    // The first tick of the new run comes a full second after the restart.
    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(handle.snapshot().await.timer.as_deref(), Some("00:00"));

    tokio::time::sleep(Duration::from_millis(1_300)).await;
    assert_eq!(handle.snapshot().await.timer.as_deref(), Some("00:02"));
}

#[tokio::test(start_paused = true)]
async fn reseeded_restart_resets_the_tick_phase() {
    let handle = service_with(Arc::new(EchoExpander))
        .start_session(GameMode::Challenge)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(2_700)).await;

    handle.restart_with_seed(11).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(handle.snapshot().await.timer.as_deref(), Some("00:00"));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(handle.snapshot().await.timer.as_deref(), Some("00:01"));
}

#[tokio::test(start_paused = true)]
async fn abandon_stops_the_clock() {
    let handle = service_with(Arc::new(EchoExpander))
        .start_session(GameMode::Challenge)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(3_500)).await;
    handle.abandon().await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    let snapshot = handle.snapshot().await;
    assert_eq!(snapshot.phase, SessionPhase::Abandoned);
    assert_eq!(snapshot.timer.as_deref(), Some("00:03"));
}

#[test]
fn challenge_sample_is_roughly_uniform() {
    const RUNS: u64 = 1_200;
    let mut appearances: HashMap<LevelId, u64> = HashMap::new();
    let mut first: HashMap<LevelId, u64> = HashMap::new();

    for seed in 0..RUNS {
        let config = EngineConfig::default().with_seed(Some(seed));
        let session = GameSession::for_mode(GameMode::Challenge, &config, Clock::default()).unwrap();
        let levels = session.levels();
        assert_eq!(levels.len(), 10);
        for level in levels {
            *appearances.entry(level.id()).or_default() += 1;
        }
        *first.entry(levels[0].id()).or_default() += 1;
    }

    let catalog = all_levels();
    let size = CATALOG_SIZE as u64;
    let expected_appearances = RUNS * 10 / size;
    let expected_first = RUNS / size;
    for level in &catalog {
        let seen = appearances.get(&level.id()).copied().unwrap_or(0);
        assert!(
            seen.abs_diff(expected_appearances) < expected_appearances / 7,
            "level {} sampled {seen} times, expected about {expected_appearances}",
            level.id()
        );
        let led = first.get(&level.id()).copied().unwrap_or(0);
        assert!(
            led.abs_diff(expected_first) < expected_first / 2,
            "level {} led {led} runs, expected about {expected_first}",
            level.id()
        );
    }
}

#[test]
fn learning_order_matches_catalog_every_time() {
    for seed in 0..20 {
        let config = EngineConfig::default().with_seed(Some(seed));
        let session = GameSession::for_mode(GameMode::Learning, &config, Clock::default()).unwrap();
        assert_eq!(session.levels(), all_levels().as_slice());
        for pair in session.levels().windows(2) {
            assert!(pair[0].id() < pair[1].id());
        }
    }
}
