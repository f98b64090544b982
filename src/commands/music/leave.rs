use super::*;
use crate::commands::music::utils::{embedded_messages, guild_context, music_manager::MusicError};
use tracing::info;

/// Leave the voice channel and clear the queue
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let guild_id = match guild_context::guild_id(ctx) {
        Ok(guild_id) => guild_id,
        Err(err) => {
            ctx.send(embedded_messages::error(&err)).await?;
            return Ok(());
        }
    };

    if ctx.data().registry.remove(guild_id).await {
        info!("Left voice in guild {} on request", guild_id);
        ctx.send(embedded_messages::left_voice_channel()).await?;
    } else {
        ctx.send(embedded_messages::error(&MusicError::NotConnected))
            .await?;
    }

    Ok(())
}
