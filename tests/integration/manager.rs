//! Playback manager control operations and lifecycle

use std::time::Duration;

use jukebox::commands::music::utils::music_manager::{MusicError, PlayerSettings, PlayerState};
use jukebox::commands::music::utils::voice::VoiceConnection;

use crate::common::fixtures::{other_voice_channel, track, voice_channel};
use crate::common::mocks::Notice;
use crate::common::{Harness, wait_until};
use crate::{assert_eq, assert_matches, fixture, rstest};

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

/// Tests that joining connects once and a second join moves the connection.
#[rstest]
#[tokio::test]
async fn test_join_and_move(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    assert_eq!(manager.voice_channel(), None);

    manager.join(voice_channel()).await.unwrap();
    manager.join(voice_channel()).await.unwrap();
    assert_eq!(harness.transport.connect_count(), 1);

    manager.join(other_voice_channel()).await.unwrap();
    assert_eq!(harness.transport.connect_count(), 1);
    assert_eq!(manager.voice_channel(), Some(other_voice_channel()));
}

/// Tests that a failed connection leaves the manager unconnected.
#[rstest]
#[tokio::test]
async fn test_join_failure(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    harness
        .transport
        .fail_next_connect(MusicError::JoinError("missing permissions".to_string()));

    let result = manager.join(voice_channel()).await;

    assert_matches!(result, Err(MusicError::JoinError(_)));
    assert_eq!(manager.voice_channel(), None);
    assert!(manager.is_alive());
}

/// Tests that control commands without a voice connection change nothing.
#[rstest]
#[tokio::test]
async fn test_controls_without_connection(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());

    assert_matches!(manager.pause().await, Err(MusicError::NotConnected));
    assert_matches!(manager.resume().await, Err(MusicError::NotConnected));
    assert_matches!(manager.skip().await, Err(MusicError::NotConnected));
    assert_matches!(manager.stop().await, Err(MusicError::NotConnected));
    assert_eq!(manager.state().await, PlayerState::Idle);
}

/// Tests that a track is started with the manager's volume and announced.
#[rstest]
#[tokio::test]
async fn test_enqueue_starts_playback(harness: Harness) {
    let manager = harness.start(PlayerSettings {
        volume: 30,
        ..Default::default()
    });
    manager.join(voice_channel()).await.unwrap();

    assert_eq!(manager.enqueue(track("a")).unwrap(), 1);
    wait_until(|| manager.current().is_some()).await;

    let connection = harness.transport.connection();
    assert_eq!(connection.played(), vec!["a"]);
    assert_eq!(connection.volume(), 0.3);
    assert_eq!(manager.state().await, PlayerState::Playing);
    assert!(manager.queue().is_empty());
    wait_until(|| !harness.notifier.notices().is_empty()).await;
    assert_eq!(
        harness.notifier.notices(),
        vec![Notice::NowPlaying("a".to_string())]
    );
}

/// Tests that skip stops the current track and the next one starts.
#[rstest]
#[tokio::test]
async fn test_skip(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    manager.join(voice_channel()).await.unwrap();
    manager.enqueue(track("a")).unwrap();
    manager.enqueue(track("b")).unwrap();
    wait_until(|| manager.current().is_some()).await;

    let skipped = manager.skip().await.unwrap();

    assert_eq!(skipped.title(), "a");
    wait_until(|| manager.current().is_some_and(|t| t.title() == "b")).await;
    assert_eq!(harness.transport.connection().played(), vec!["a", "b"]);
}

/// Tests that a skip issued while the output is still starting stops that track.
#[rstest]
#[tokio::test]
async fn test_skip_while_track_starts(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    manager.join(voice_channel()).await.unwrap();
    let gate = harness.transport.connection().hold_next_play();
    manager.enqueue(track("a")).unwrap();
    manager.enqueue(track("b")).unwrap();
    wait_until(|| manager.current().is_some()).await;

    let skipped = manager.skip().await.unwrap();
    gate.notify_one();

    assert_eq!(skipped.title(), "a");
    wait_until(|| manager.current().is_some_and(|t| t.title() == "b")).await;
    assert_eq!(harness.transport.connection().played(), vec!["a", "b"]);
    wait_until(|| !harness.notifier.notices().is_empty()).await;
    assert_eq!(
        harness.notifier.notices(),
        vec![Notice::NowPlaying("b".to_string())]
    );
}

/// Tests that a stop issued while the output is still starting ends that track.
#[rstest]
#[tokio::test]
async fn test_stop_while_track_starts(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    manager.join(voice_channel()).await.unwrap();
    let gate = harness.transport.connection().hold_next_play();
    manager.enqueue(track("a")).unwrap();
    manager.enqueue(track("b")).unwrap();
    wait_until(|| manager.current().is_some()).await;

    let cleared = manager.stop().await.unwrap();
    gate.notify_one();

    assert_eq!(cleared, 1);
    wait_until(|| manager.current().is_none()).await;
    let connection = harness.transport.connection();
    assert_eq!(connection.played(), vec!["a"]);
    assert!(!connection.is_playing().await);
    assert!(manager.is_alive());
}

/// Tests that skip with nothing playing reports it.
#[rstest]
#[tokio::test]
async fn test_skip_nothing_playing(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    manager.join(voice_channel()).await.unwrap();

    assert_matches!(manager.skip().await, Err(MusicError::NothingPlaying));
}

/// Tests that stop clears the queue, ends the track and keeps the manager.
#[rstest]
#[tokio::test]
async fn test_stop(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    manager.join(voice_channel()).await.unwrap();
    for title in ["a", "b", "c"] {
        manager.enqueue(track(title)).unwrap();
    }
    wait_until(|| manager.current().is_some()).await;

    let cleared = manager.stop().await.unwrap();

    assert_eq!(cleared, 2);
    wait_until(|| manager.current().is_none()).await;
    assert!(manager.is_alive());
    assert_eq!(manager.state().await, PlayerState::Idle);
    assert_eq!(harness.transport.connection().played(), vec!["a"]);

    // Still usable afterwards
    manager.enqueue(track("d")).unwrap();
    wait_until(|| manager.current().is_some()).await;
    assert_eq!(harness.transport.connection().played(), vec!["a", "d"]);
}

/// Tests that a fault on the current track is reported and the loop moves on.
#[rstest]
#[tokio::test]
async fn test_playback_error_continues(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    manager.join(voice_channel()).await.unwrap();
    manager.enqueue(track("a")).unwrap();
    manager.enqueue(track("b")).unwrap();
    wait_until(|| manager.current().is_some()).await;

    harness
        .transport
        .connection()
        .finish_current(Err("decoder error".to_string()));

    wait_until(|| manager.current().is_some_and(|t| t.title() == "b")).await;
    assert!(harness.notifier.notices().contains(&Notice::Failed(
        "a".to_string(),
        MusicError::Playback("decoder error".to_string())
    )));
}

/// Tests that a track whose output cannot start is skipped.
#[rstest]
#[tokio::test]
async fn test_play_failure_continues(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    manager.join(voice_channel()).await.unwrap();
    harness.transport.connection().fail_next_play();

    manager.enqueue(track("broken")).unwrap();
    manager.enqueue(track("fine")).unwrap();

    wait_until(|| manager.current().is_some_and(|t| t.title() == "fine")).await;
    assert_matches!(
        harness.notifier.notices().first(),
        Some(Notice::Failed(title, MusicError::Playback(_))) if title == "broken"
    );
}

/// Tests that a track queued before joining is dropped with a notice.
#[rstest]
#[tokio::test]
async fn test_track_without_connection_is_dropped(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());

    manager.enqueue(track("lost")).unwrap();

    wait_until(|| !harness.notifier.notices().is_empty()).await;
    assert_eq!(
        harness.notifier.notices(),
        vec![Notice::Failed("lost".to_string(), MusicError::NotConnected)]
    );
    assert_eq!(manager.current(), None);
}

/// Tests that loop replays a finished track until skipped.
#[rstest]
#[tokio::test]
async fn test_loop(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    manager.join(voice_channel()).await.unwrap();
    assert!(manager.toggle_loop());
    manager.enqueue(track("a")).unwrap();
    manager.enqueue(track("b")).unwrap();
    wait_until(|| manager.current().is_some()).await;

    let connection = harness.transport.connection();
    connection.finish_current(Ok(()));
    wait_until(|| connection.played().len() == 2).await;
    assert_eq!(connection.played(), vec!["a", "a"]);

    manager.skip().await.unwrap();
    wait_until(|| connection.played().len() == 3).await;
    assert_eq!(connection.played(), vec!["a", "a", "b"]);

    assert!(!manager.toggle_loop());
}

/// Tests volume changes and their bounds.
#[rstest]
#[tokio::test]
async fn test_volume(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    manager.join(voice_channel()).await.unwrap();
    manager.enqueue(track("a")).unwrap();
    wait_until(|| manager.current().is_some()).await;
    let connection = harness.transport.connection();
    assert_eq!(connection.volume(), 0.5);

    manager.set_volume(80).await.unwrap();
    assert_eq!(manager.volume(), 80);
    assert_eq!(connection.volume(), 0.8);

    assert_matches!(
        manager.set_volume(101).await,
        Err(MusicError::InvalidVolume(101))
    );
    assert_eq!(manager.volume(), 80);

    manager.enqueue(track("b")).unwrap();
    manager.skip().await.unwrap();
    wait_until(|| connection.played().len() == 2).await;
    assert_eq!(connection.volume(), 0.8);
}

/// Tests that shutdown releases voice and the manager refuses further work.
#[rstest]
#[tokio::test]
async fn test_shutdown(harness: Harness) {
    let manager = harness.start(PlayerSettings::default());
    manager.join(voice_channel()).await.unwrap();
    manager.enqueue(track("a")).unwrap();
    manager.enqueue(track("b")).unwrap();
    wait_until(|| manager.current().is_some()).await;

    manager.shutdown().await;

    assert!(!manager.is_alive());
    assert_eq!(manager.state().await, PlayerState::Expired);
    assert_eq!(manager.current(), None);
    assert!(manager.queue().is_empty());
    assert!(harness.transport.connection().is_disconnected());
    assert_matches!(manager.enqueue(track("c")), Err(MusicError::Expired));
    assert_matches!(manager.join(voice_channel()).await, Err(MusicError::Expired));

    // A second shutdown is harmless
    manager.shutdown().await;
}

/// Tests that the idle window applies to a custom timeout too.
#[rstest]
#[tokio::test(start_paused = true)]
async fn test_custom_idle_timeout(harness: Harness) {
    let manager = harness.start(PlayerSettings {
        idle_timeout: Duration::from_secs(5),
        ..Default::default()
    });
    manager.join(voice_channel()).await.unwrap();

    tokio::time::sleep(Duration::from_secs(6)).await;

    wait_until(|| !manager.is_alive()).await;
    assert!(harness.transport.connection().is_disconnected());
}
