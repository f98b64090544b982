//! Core of the jukebox bot: per-guild playback managers, their track queues,
//! track resolution through `yt-dlp`, and the poise commands that drive them.

pub mod commands;
pub mod config;
pub mod events;

use std::sync::Arc;

use commands::music::audio_sources::Extractor;
use commands::music::utils::guild_registry::GuildRegistry;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// User data, stored and accessible in all command invocations
pub struct Data {
    /// Playback managers for every guild the bot is active in
    pub registry: GuildRegistry,
    /// Service used to turn search terms and URLs into playable tracks
    pub extractor: Arc<dyn Extractor>,
}
