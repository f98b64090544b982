//! Common test utilities, fixtures, and mocks
//! This module contains shared functionality used across different test categories

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use jukebox::commands::music::utils::music_manager::{PlaybackManager, PlayerSettings};

use mocks::{FakeTransport, RecordingNotifier};

/// Fakes wired into a manager under test.
pub struct Harness {
    pub transport: Arc<FakeTransport>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new() -> Self {
        crate::test_utils::init();
        Self {
            transport: FakeTransport::new(),
            notifier: RecordingNotifier::new(),
        }
    }

    /// Start a manager for the sample guild. Needs a running tokio runtime.
    pub fn start(&self, settings: PlayerSettings) -> PlaybackManager {
        PlaybackManager::new(
            fixtures::guild(),
            self.transport.clone(),
            self.notifier.clone(),
            settings,
        )
    }
}

/// Poll `condition` until it holds, letting background tasks run in between.
/// Works with paused time: every poll advances the clock by a millisecond.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not met in time");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_wait_until() {
        let mut polls = 0;
        wait_until(|| {
            polls += 1;
            polls == 3
        })
        .await;
        assert_eq!(polls, 3);
    }
}
