use super::*;
use crate::commands::music::utils::{embedded_messages, guild_context};

/// Stop playback and clear the queue
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let result = match guild_context::controlled_manager(ctx) {
        Ok(manager) => manager.stop().await,
        Err(err) => Err(err),
    };

    let reply = match result {
        Ok(cleared) => embedded_messages::stopped(cleared),
        Err(err) => embedded_messages::error(&err),
    };

    ctx.send(reply).await?;
    Ok(())
}
