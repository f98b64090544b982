use super::*;
use crate::commands::music::utils::{embedded_messages, guild_context, music_manager::MusicResult};

/// Set the playback volume
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume in percent (0-100)"]
    #[max = 100]
    percent: u32,
) -> CommandResult {
    let reply = match set_volume(ctx, percent).await {
        Ok(volume) => embedded_messages::volume_set(volume),
        Err(err) => embedded_messages::error(&err),
    };

    ctx.send(reply).await?;
    Ok(())
}

async fn set_volume(ctx: Context<'_>, percent: u32) -> MusicResult<u8> {
    let manager = guild_context::controlled_manager(ctx)?;
    manager.set_volume(percent).await?;
    Ok(manager.volume())
}
