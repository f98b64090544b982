//! The voice transport seen by a `PlaybackManager`, and its songbird implementation.
//!
//! The manager never touches songbird directly. It connects through a
//! [`VoiceTransport`] and drives the resulting [`VoiceConnection`]; the end of
//! every track comes back to the manager's own task as a [`PlayerEvent`].

use parking_lot::Mutex;
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use songbird::input::{HttpRequest, Input};
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::{Event, Songbird, TrackEvent};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::event_handlers::TrackEndNotifier;
use super::music_manager::{MusicError, MusicResult};
use crate::commands::music::audio_sources::TrackSource;

/// How a track's output ended: `Ok` when it finished or was stopped, `Err` with
/// the fault reported by the audio driver otherwise.
pub type TrackOutcome = Result<(), String>;

/// Events delivered from the voice output back into the playback loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    TrackEnded {
        generation: u64,
        outcome: TrackOutcome,
    },
}

/// Completion handle passed to [`VoiceConnection::play`]. Fired exactly when the
/// output of that one track ends; extra or late firings are ignored by the loop.
#[derive(Debug, Clone)]
pub struct TrackEndSignal {
    generation: u64,
    tx: UnboundedSender<PlayerEvent>,
}

impl TrackEndSignal {
    pub fn new(generation: u64, tx: UnboundedSender<PlayerEvent>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn finished(&self, outcome: TrackOutcome) {
        let event = PlayerEvent::TrackEnded {
            generation: self.generation,
            outcome,
        };
        // The receiver is gone once the manager shut down, nothing left to notify.
        if self.tx.send(event).is_err() {
            debug!("Track {} ended after its player shut down", self.generation);
        }
    }
}

/// Opens voice connections.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> MusicResult<Arc<dyn VoiceConnection>>;
}

/// An open connection to one voice channel.
#[async_trait]
pub trait VoiceConnection: Send + Sync {
    /// The channel this connection currently outputs to.
    fn channel_id(&self) -> ChannelId;

    /// Start streaming `source`, replacing whatever was playing. `signal` fires
    /// when the output ends, whether naturally, by `stop`, or by a fault.
    async fn play(
        &self,
        source: &TrackSource,
        volume: f32,
        signal: TrackEndSignal,
    ) -> MusicResult<()>;

    async fn pause(&self) -> MusicResult<()>;
    async fn resume(&self) -> MusicResult<()>;
    async fn stop(&self) -> MusicResult<()>;
    async fn is_playing(&self) -> bool;
    async fn is_paused(&self) -> bool;
    async fn set_volume(&self, volume: f32) -> MusicResult<()>;
    async fn move_to(&self, channel_id: ChannelId) -> MusicResult<()>;
    async fn disconnect(&self) -> MusicResult<()>;
}

/// Voice transport backed by songbird. Streams are fetched over HTTP with one
/// shared `reqwest` client.
pub struct SongbirdTransport {
    songbird: Arc<Songbird>,
    http_client: reqwest::Client,
}

impl SongbirdTransport {
    pub fn new(songbird: Arc<Songbird>, http_client: reqwest::Client) -> Self {
        Self {
            songbird,
            http_client,
        }
    }
}

#[async_trait]
impl VoiceTransport for SongbirdTransport {
    async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> MusicResult<Arc<dyn VoiceConnection>> {
        self.songbird
            .join(guild_id, channel_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;

        info!("Joined voice channel {} in guild {}", channel_id, guild_id);

        Ok(Arc::new(SongbirdConnection {
            songbird: Arc::clone(&self.songbird),
            http_client: self.http_client.clone(),
            guild_id,
            channel_id: Mutex::new(channel_id),
            handle: Mutex::new(None),
        }))
    }
}

/// A songbird call plus the handle of the track it is currently playing.
pub struct SongbirdConnection {
    songbird: Arc<Songbird>,
    http_client: reqwest::Client,
    guild_id: GuildId,
    channel_id: Mutex<ChannelId>,
    handle: Mutex<Option<TrackHandle>>,
}

impl SongbirdConnection {
    fn current_handle(&self) -> MusicResult<TrackHandle> {
        self.handle.lock().clone().ok_or(MusicError::NothingPlaying)
    }

    async fn play_mode(&self) -> Option<PlayMode> {
        let handle = self.handle.lock().clone()?;
        handle.get_info().await.ok().map(|state| state.playing)
    }
}

fn playback_error(e: impl ToString) -> MusicError {
    MusicError::Playback(e.to_string())
}

#[async_trait]
impl VoiceConnection for SongbirdConnection {
    fn channel_id(&self) -> ChannelId {
        *self.channel_id.lock()
    }

    async fn play(
        &self,
        source: &TrackSource,
        volume: f32,
        signal: TrackEndSignal,
    ) -> MusicResult<()> {
        let call = self.songbird.get(self.guild_id).ok_or(MusicError::NotConnected)?;

        let input: Input = HttpRequest::new(self.http_client.clone(), source.stream_url.clone()).into();
        let handle = call.lock().await.play_only_input(input);

        handle.set_volume(volume).map_err(playback_error)?;
        handle
            .add_event(
                Event::Track(TrackEvent::End),
                TrackEndNotifier::new(signal.clone()),
            )
            .map_err(playback_error)?;
        handle
            .add_event(Event::Track(TrackEvent::Error), TrackEndNotifier::new(signal))
            .map_err(playback_error)?;

        debug!("Started stream for {} in guild {}", source.title, self.guild_id);
        *self.handle.lock() = Some(handle);
        Ok(())
    }

    async fn pause(&self) -> MusicResult<()> {
        self.current_handle()?.pause().map_err(playback_error)
    }

    async fn resume(&self) -> MusicResult<()> {
        self.current_handle()?.play().map_err(playback_error)
    }

    async fn stop(&self) -> MusicResult<()> {
        let Some(handle) = self.handle.lock().take() else {
            return Ok(());
        };
        // A track that already ended rejects the command; that is fine here.
        if let Err(e) = handle.stop() {
            debug!("Stop on finished track in guild {}: {}", self.guild_id, e);
        }
        Ok(())
    }

    async fn is_playing(&self) -> bool {
        matches!(self.play_mode().await, Some(PlayMode::Play))
    }

    async fn is_paused(&self) -> bool {
        matches!(self.play_mode().await, Some(PlayMode::Pause))
    }

    async fn set_volume(&self, volume: f32) -> MusicResult<()> {
        match self.handle.lock().as_ref() {
            Some(handle) => handle.set_volume(volume).map_err(playback_error),
            None => Ok(()),
        }
    }

    async fn move_to(&self, channel_id: ChannelId) -> MusicResult<()> {
        self.songbird
            .join(self.guild_id, channel_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))?;

        info!("Moved to voice channel {} in guild {}", channel_id, self.guild_id);
        *self.channel_id.lock() = channel_id;
        Ok(())
    }

    async fn disconnect(&self) -> MusicResult<()> {
        self.handle.lock().take();

        if self.songbird.get(self.guild_id).is_none() {
            return Ok(());
        }

        if let Err(e) = self.songbird.remove(self.guild_id).await {
            warn!("Failed to leave voice in guild {}: {}", self.guild_id, e);
            return Err(MusicError::JoinError(e.to_string()));
        }

        info!("Left voice in guild {}", self.guild_id);
        Ok(())
    }
}
