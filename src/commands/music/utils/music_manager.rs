use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::notifier::Notifier;
use super::queue_manager::TrackQueue;
use super::voice::{PlayerEvent, TrackEndSignal, TrackOutcome, VoiceConnection, VoiceTransport};
use crate::commands::music::audio_sources::Track;

/// Errors that can occur during music operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("You need to be in the same voice channel as the bot")]
    VoiceChannelConflict,

    #[error("Couldn't find anything that matches `{query}`: {reason}")]
    Resolution { query: String, reason: String },

    #[error("Extraction service error: {0}")]
    Extraction(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("There is no track at position {position} (queue has {len})")]
    InvalidIndex { position: usize, len: usize },

    #[error("Nothing is playing")]
    NothingPlaying,

    #[error("Already paused")]
    AlreadyPaused,

    #[error("Not paused")]
    NotPaused,

    #[error("Volume must be between 0 and 100, got {0}")]
    InvalidVolume(u32),

    #[error("The player for this server has shut down, try again")]
    Expired,
}

impl MusicError {
    /// A resolution failure for the given search text.
    pub fn resolution(query: &str, reason: impl ToString) -> Self {
        Self::Resolution {
            query: query.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// How long a manager waits on an empty queue before it expires.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Nothing playing, waiting on the queue.
    Idle,
    Playing,
    Paused,
    /// Terminal. The loop exited and voice was released.
    Expired,
}

/// Settings every new manager starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSettings {
    pub idle_timeout: Duration,
    /// Percent, 0..=100.
    pub volume: u8,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            idle_timeout: IDLE_TIMEOUT,
            volume: 50,
        }
    }
}

const RUNNING: u8 = 0;
const CLOSING: u8 = 1;
const EXPIRED: u8 = 2;

/// State shared between the manager handle and its playback loop.
struct Shared {
    guild_id: GuildId,
    queue: TrackQueue,
    // Written only by the playback loop and teardown.
    current: parking_lot::RwLock<Option<Track>>,
    connection: parking_lot::RwLock<Option<Arc<dyn VoiceConnection>>>,
    lifecycle: AtomicU8,
    volume: AtomicU8,
    looping: AtomicBool,
    skip_requested: AtomicBool,
    transport: Arc<dyn VoiceTransport>,
    notifier: Arc<dyn Notifier>,
    idle_timeout: Duration,
    // Serializes joins against each other and against teardown.
    voice_lock: Mutex<()>,
}

impl Shared {
    fn connection(&self) -> Option<Arc<dyn VoiceConnection>> {
        self.connection.read().clone()
    }

    fn volume(&self) -> f32 {
        f32::from(self.volume.load(Ordering::SeqCst)) / 100.0
    }

    fn is_running(&self) -> bool {
        self.lifecycle.load(Ordering::SeqCst) == RUNNING
    }

    /// Move from running to closing. Returns false if someone else already did.
    fn begin_closing(&self) -> bool {
        self.lifecycle
            .compare_exchange(RUNNING, CLOSING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Release voice and drop everything pending. Safe to call more than once.
    async fn teardown(&self) {
        let _voice = self.voice_lock.lock().await;

        self.current.write().take();
        self.queue.clear();

        let connection = self.connection.write().take();
        if let Some(connection) = connection {
            if let Err(e) = connection.disconnect().await {
                warn!("Failed to disconnect voice in guild {}: {}", self.guild_id, e);
            }
        }
    }
}

/// Playback for one guild: the voice connection, the queue, and the background
/// loop that plays the queue in order.
///
/// Command handlers call the control methods concurrently; only the loop takes
/// tracks from the queue and only the loop changes the current track. The end of
/// a track arrives at the loop as a [`PlayerEvent`] over a channel.
pub struct PlaybackManager {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackManager {
    /// Create a manager and start its playback loop. Must be called inside a
    /// tokio runtime.
    pub fn new(
        guild_id: GuildId,
        transport: Arc<dyn VoiceTransport>,
        notifier: Arc<dyn Notifier>,
        settings: PlayerSettings,
    ) -> Self {
        let shared = Arc::new(Shared {
            guild_id,
            queue: TrackQueue::new(),
            current: parking_lot::RwLock::new(None),
            connection: parking_lot::RwLock::new(None),
            lifecycle: AtomicU8::new(RUNNING),
            volume: AtomicU8::new(settings.volume.min(100)),
            looping: AtomicBool::new(false),
            skip_requested: AtomicBool::new(false),
            transport,
            notifier,
            idle_timeout: settings.idle_timeout,
            voice_lock: Mutex::new(()),
        });

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_player(Arc::clone(&shared), rx, tx));
        info!("Started player for guild {}", guild_id);

        Self {
            shared,
            task: Mutex::new(Some(task)),
        }
    }

    pub fn guild_id(&self) -> GuildId {
        self.shared.guild_id
    }

    pub fn queue(&self) -> &TrackQueue {
        &self.shared.queue
    }

    pub fn current(&self) -> Option<Track> {
        self.shared.current.read().clone()
    }

    /// False once the manager started shutting down. A dead manager must be
    /// replaced, never reused.
    pub fn is_alive(&self) -> bool {
        self.shared.is_running()
    }

    pub fn voice_channel(&self) -> Option<ChannelId> {
        self.shared.connection().map(|connection| connection.channel_id())
    }

    pub fn volume(&self) -> u8 {
        self.shared.volume.load(Ordering::SeqCst)
    }

    pub fn is_looping(&self) -> bool {
        self.shared.looping.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> PlayerState {
        if !self.is_alive() {
            return PlayerState::Expired;
        }
        let Some(connection) = self.shared.connection() else {
            return PlayerState::Idle;
        };
        if self.current().is_none() {
            return PlayerState::Idle;
        }
        if connection.is_paused().await {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        }
    }

    /// Connect to `channel_id`, or move there if already connected elsewhere.
    pub async fn join(&self, channel_id: ChannelId) -> MusicResult<()> {
        let _voice = self.shared.voice_lock.lock().await;
        if !self.is_alive() {
            return Err(MusicError::Expired);
        }

        if let Some(connection) = self.shared.connection() {
            if connection.channel_id() != channel_id {
                connection.move_to(channel_id).await?;
            }
            return Ok(());
        }

        let connection = self
            .shared
            .transport
            .connect(self.shared.guild_id, channel_id)
            .await?;
        *self.shared.connection.write() = Some(connection);
        Ok(())
    }

    /// Add a track to the queue. Returns its 1-based position among pending tracks.
    pub fn enqueue(&self, track: Track) -> MusicResult<usize> {
        if !self.is_alive() {
            return Err(MusicError::Expired);
        }
        debug!("Queueing {} in guild {}", track.title(), self.shared.guild_id);
        Ok(self.shared.queue.append(track))
    }

    pub async fn pause(&self) -> MusicResult<()> {
        let connection = self.shared.connection().ok_or(MusicError::NotConnected)?;
        if self.current().is_none() {
            return Err(MusicError::NothingPlaying);
        }
        if connection.is_paused().await {
            return Err(MusicError::AlreadyPaused);
        }
        connection.pause().await?;
        info!("Paused playback in guild {}", self.shared.guild_id);
        Ok(())
    }

    pub async fn resume(&self) -> MusicResult<()> {
        let connection = self.shared.connection().ok_or(MusicError::NotConnected)?;
        if self.current().is_none() {
            return Err(MusicError::NothingPlaying);
        }
        if !connection.is_paused().await {
            return Err(MusicError::NotPaused);
        }
        connection.resume().await?;
        info!("Resumed playback in guild {}", self.shared.guild_id);
        Ok(())
    }

    /// Stop the current track; the loop moves on to the next one. Returns the
    /// skipped track.
    pub async fn skip(&self) -> MusicResult<Track> {
        let connection = self.shared.connection().ok_or(MusicError::NotConnected)?;
        let current = self.current().ok_or(MusicError::NothingPlaying)?;

        self.shared.skip_requested.store(true, Ordering::SeqCst);
        connection.stop().await?;
        info!("Skipped {} in guild {}", current.title(), self.shared.guild_id);
        Ok(current)
    }

    /// Clear the queue and stop the current track. The manager stays alive.
    /// Returns how many pending tracks were dropped.
    pub async fn stop(&self) -> MusicResult<usize> {
        let connection = self.shared.connection().ok_or(MusicError::NotConnected)?;

        let cleared = self.shared.queue.clear();
        self.shared.skip_requested.store(true, Ordering::SeqCst);
        if connection.is_playing().await || connection.is_paused().await {
            connection.stop().await?;
        }
        info!("Stopped playback in guild {}", self.shared.guild_id);
        Ok(cleared)
    }

    /// Set the output volume in percent, for the current and all later tracks.
    pub async fn set_volume(&self, percent: u32) -> MusicResult<()> {
        let volume = u8::try_from(percent)
            .ok()
            .filter(|volume| *volume <= 100)
            .ok_or(MusicError::InvalidVolume(percent))?;

        self.shared.volume.store(volume, Ordering::SeqCst);
        if let Some(connection) = self.shared.connection() {
            connection.set_volume(self.shared.volume()).await?;
        }
        info!("Volume set to {}% in guild {}", volume, self.shared.guild_id);
        Ok(())
    }

    /// Flip repeat of the current track. Returns whether it is now enabled.
    pub fn toggle_loop(&self) -> bool {
        let enabled = !self.shared.looping.fetch_xor(true, Ordering::SeqCst);
        info!(
            "Loop {} in guild {}",
            if enabled { "enabled" } else { "disabled" },
            self.shared.guild_id
        );
        enabled
    }

    /// Cancel the loop, wait for it to exit, then release voice and the queue.
    /// The manager is expired afterwards. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        let mut task = self.task.lock().await;
        let was_running = self.shared.begin_closing();

        if let Some(handle) = task.take() {
            // A loop that is already closing finishes its own teardown.
            if was_running {
                handle.abort();
            }
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    error!("Player for guild {} panicked: {}", self.shared.guild_id, e);
                }
            }
        }

        self.shared.teardown().await;
        self.shared.lifecycle.store(EXPIRED, Ordering::SeqCst);
        info!("Player for guild {} shut down", self.shared.guild_id);
    }
}

impl Drop for PlaybackManager {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().take() {
            handle.abort();
        }
    }
}

async fn run_player(
    shared: Arc<Shared>,
    mut events: UnboundedReceiver<PlayerEvent>,
    tx: UnboundedSender<PlayerEvent>,
) {
    let mut generation: u64 = 0;
    let mut replay: Option<Track> = None;

    loop {
        let track = match replay.take() {
            Some(track) => track,
            None => match tokio::time::timeout(shared.idle_timeout, shared.queue.take_next()).await {
                Ok(track) => track,
                Err(_) => {
                    info!(
                        "No tracks for {:?} in guild {}, leaving",
                        shared.idle_timeout, shared.guild_id
                    );
                    if shared.begin_closing() {
                        shared.teardown().await;
                        shared.lifecycle.store(EXPIRED, Ordering::SeqCst);
                    }
                    return;
                }
            },
        };

        let Some(connection) = shared.connection() else {
            warn!(
                "Dropping {} in guild {}: not connected to voice",
                track.title(),
                shared.guild_id
            );
            shared
                .notifier
                .playback_failed(&track, &MusicError::NotConnected)
                .await;
            continue;
        };

        generation += 1;
        shared.skip_requested.store(false, Ordering::SeqCst);
        *shared.current.write() = Some(track.clone());

        let signal = TrackEndSignal::new(generation, tx.clone());
        if let Err(e) = connection.play(&track.source, shared.volume(), signal).await {
            error!("Failed to start {} in guild {}: {}", track.title(), shared.guild_id, e);
            shared.current.write().take();
            shared.notifier.playback_failed(&track, &e).await;
            continue;
        }

        // A skip or stop that landed while the output was starting found nothing
        // to stop yet.
        if shared.skip_requested.load(Ordering::SeqCst) {
            debug!("{} skipped while starting in guild {}", track.title(), shared.guild_id);
            if let Err(e) = connection.stop().await {
                warn!("Failed to stop {} in guild {}: {}", track.title(), shared.guild_id, e);
            }
        } else {
            info!("Now playing {} in guild {}", track.title(), shared.guild_id);
            shared.notifier.now_playing(&track).await;
        }

        let outcome = wait_for_end(&mut events, generation).await;
        shared.current.write().take();

        match outcome {
            Ok(()) => {
                let skipped = shared.skip_requested.load(Ordering::SeqCst);
                if shared.looping.load(Ordering::SeqCst) && !skipped {
                    debug!("Looping {} in guild {}", track.title(), shared.guild_id);
                    replay = Some(track);
                }
            }
            Err(reason) => {
                let error = MusicError::Playback(reason);
                error!("{} in guild {}: {}", track.title(), shared.guild_id, error);
                shared.notifier.playback_failed(&track, &error).await;
            }
        }
    }
}

/// Wait for the end of track `generation`, skipping events left over from
/// earlier tracks.
async fn wait_for_end(events: &mut UnboundedReceiver<PlayerEvent>, generation: u64) -> TrackOutcome {
    while let Some(PlayerEvent::TrackEnded {
        generation: ended,
        outcome,
    }) = events.recv().await
    {
        if ended == generation {
            return outcome;
        }
        debug!("Ignoring end of track {} while playing {}", ended, generation);
    }
    // The loop keeps a sender alive, so the channel never closes.
    Ok(())
}
