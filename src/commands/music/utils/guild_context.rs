//! Helpers that read guild and voice state out of a command context.

use serenity::model::id::{ChannelId, GuildId, UserId};
use std::sync::Arc;

use super::music_manager::{MusicError, MusicResult, PlaybackManager};
use crate::Context;

pub fn guild_id(ctx: Context<'_>) -> MusicResult<GuildId> {
    ctx.guild_id().ok_or(MusicError::NotInGuild)
}

/// Get the voice channel the user is currently in
pub fn user_voice_channel(
    ctx: Context<'_>,
    guild_id: GuildId,
    user_id: UserId,
) -> MusicResult<ChannelId> {
    let guild = ctx
        .serenity_context()
        .cache
        .guild(guild_id)
        .ok_or(MusicError::NotInGuild)?;

    guild
        .voice_states
        .get(&user_id)
        .and_then(|state| state.channel_id)
        .ok_or(MusicError::UserNotInVoiceChannel)
}

/// Check that a user in `user_channel` may control a bot in `bot_channel`.
pub fn ensure_same_channel(
    user_channel: ChannelId,
    bot_channel: Option<ChannelId>,
) -> MusicResult<()> {
    match bot_channel {
        Some(channel) if channel != user_channel => Err(MusicError::VoiceChannelConflict),
        _ => Ok(()),
    }
}

/// The live manager of the invoking guild, for commands that need one to exist.
pub fn existing_manager(ctx: Context<'_>) -> MusicResult<Arc<PlaybackManager>> {
    let guild_id = guild_id(ctx)?;
    ctx.data()
        .registry
        .get(guild_id)
        .ok_or(MusicError::NotConnected)
}

/// The live manager of the invoking guild, after checking that the invoking
/// user listens in the bot's voice channel.
pub fn controlled_manager(ctx: Context<'_>) -> MusicResult<Arc<PlaybackManager>> {
    let guild_id = guild_id(ctx)?;
    let manager = existing_manager(ctx)?;
    let bot_channel = manager.voice_channel().ok_or(MusicError::NotConnected)?;
    let user_channel = user_voice_channel(ctx, guild_id, ctx.author().id)?;
    ensure_same_channel(user_channel, Some(bot_channel))?;
    Ok(manager)
}
