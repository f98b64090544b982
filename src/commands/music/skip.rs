use super::*;
use crate::commands::music::utils::{embedded_messages, guild_context};

/// Skip the current track
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let result = match guild_context::controlled_manager(ctx) {
        Ok(manager) => manager.skip().await,
        Err(err) => Err(err),
    };

    let reply = match result {
        Ok(track) => embedded_messages::skipped(&track),
        Err(err) => embedded_messages::error(&err),
    };

    ctx.send(reply).await?;
    Ok(())
}
