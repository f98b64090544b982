use serenity::async_trait;
use songbird::tracks::PlayMode;
use tracing::{info, warn};

use super::voice::{TrackEndSignal, TrackOutcome};

/// Event handler for when a track's output ends or fails
pub struct TrackEndNotifier {
    signal: TrackEndSignal,
}

impl TrackEndNotifier {
    pub fn new(signal: TrackEndSignal) -> Self {
        Self { signal }
    }
}

#[async_trait]
impl songbird::EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &songbird::EventContext<'_>) -> Option<songbird::Event> {
        if let songbird::EventContext::Track(tracks) = ctx {
            let outcome = tracks
                .first()
                .map(|(state, _)| outcome_of(&state.playing))
                .unwrap_or(Ok(()));

            match &outcome {
                Ok(()) => info!("Track {} ended", self.signal.generation()),
                Err(e) => warn!("Track {} failed: {}", self.signal.generation(), e),
            }

            self.signal.finished(outcome);
        }
        None
    }
}

fn outcome_of(mode: &PlayMode) -> TrackOutcome {
    match mode {
        PlayMode::Errored(e) => Err(format!("{:?}", e)),
        _ => Ok(()),
    }
}
