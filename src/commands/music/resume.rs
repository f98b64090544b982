use super::*;
use crate::commands::music::audio_sources::Track;
use crate::commands::music::utils::{
    embedded_messages, guild_context,
    music_manager::{MusicError, MusicResult},
};

/// Resume the paused track
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let reply = match resume_current(ctx).await {
        Ok(track) => embedded_messages::resumed(&track),
        Err(err) => embedded_messages::error(&err),
    };

    ctx.send(reply).await?;
    Ok(())
}

async fn resume_current(ctx: Context<'_>) -> MusicResult<Track> {
    let manager = guild_context::controlled_manager(ctx)?;
    manager.resume().await?;
    manager.current().ok_or(MusicError::NothingPlaying)
}
