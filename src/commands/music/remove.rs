use super::*;
use crate::commands::music::audio_sources::Track;
use crate::commands::music::utils::{
    embedded_messages, guild_context,
    music_manager::{MusicError, MusicResult},
};

/// Remove a track from the queue by its position
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Position of the track to remove (1-based)"]
    #[min = 1]
    position: usize,
) -> CommandResult {
    let reply = match remove_position(ctx, position) {
        Ok(track) => embedded_messages::track_removed(&track, position),
        Err(err) => embedded_messages::error(&err),
    };

    ctx.send(reply).await?;
    Ok(())
}

fn remove_position(ctx: Context<'_>, position: usize) -> MusicResult<Track> {
    let manager = guild_context::controlled_manager(ctx)?;
    let queue = manager.queue();

    // Convert to 0-based index
    let index = position.checked_sub(1).ok_or(MusicError::InvalidIndex {
        position,
        len: queue.len(),
    })?;

    queue.remove_at(index)
}
