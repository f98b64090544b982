use serenity::all::{CreateEmbed, CreateMessage, Http};
use serenity::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::embedded_messages;
use super::music_manager::MusicError;
use crate::commands::music::audio_sources::Track;

/// Where a playback loop reports what it is doing.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A track just started.
    async fn now_playing(&self, track: &Track);

    /// A track could not be started, or failed while playing.
    async fn playback_failed(&self, track: &Track, error: &MusicError);
}

/// Posts announcements to the text channel each track was requested from.
pub struct ChannelNotifier {
    http: Arc<Http>,
}

impl ChannelNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    async fn send(&self, track: &Track, embed: CreateEmbed) {
        let channel_id = track.source.channel_id;
        let message = CreateMessage::new().embed(embed);

        if let Err(e) = channel_id.send_message(&self.http, message).await {
            warn!("Failed to send announcement to channel {}: {}", channel_id, e);
        }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn now_playing(&self, track: &Track) {
        self.send(track, embedded_messages::now_playing(track)).await;
    }

    async fn playback_failed(&self, track: &Track, error: &MusicError) {
        self.send(track, embedded_messages::playback_failed(track, error))
            .await;
    }
}
