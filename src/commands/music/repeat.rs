use super::*;
use crate::commands::music::utils::{embedded_messages, guild_context};

/// Toggle repeating the current track
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Music",
    rename = "loop"
)]
pub async fn repeat(ctx: Context<'_>) -> CommandResult {
    let reply = match guild_context::controlled_manager(ctx) {
        Ok(manager) => embedded_messages::loop_status(manager.toggle_loop()),
        Err(err) => embedded_messages::error(&err),
    };

    ctx.send(reply).await?;
    Ok(())
}
