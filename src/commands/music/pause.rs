use super::*;
use crate::commands::music::audio_sources::Track;
use crate::commands::music::utils::{
    embedded_messages, guild_context,
    music_manager::{MusicError, MusicResult},
};

/// Pause the current track
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let reply = match pause_current(ctx).await {
        Ok(track) => embedded_messages::paused(&track),
        Err(err) => embedded_messages::error(&err),
    };

    ctx.send(reply).await?;
    Ok(())
}

async fn pause_current(ctx: Context<'_>) -> MusicResult<Track> {
    let manager = guild_context::controlled_manager(ctx)?;
    manager.pause().await?;
    manager.current().ok_or(MusicError::NothingPlaying)
}
