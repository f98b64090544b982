use super::*;
use crate::commands::music::utils::{embedded_messages, guild_context};

/// Show the track that is playing right now
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn now(ctx: Context<'_>) -> CommandResult {
    let reply = match guild_context::existing_manager(ctx) {
        Ok(manager) => embedded_messages::current_track(
            manager.current().as_ref(),
            manager.state().await,
            manager.is_looping(),
        ),
        Err(err) => embedded_messages::error(&err),
    };

    ctx.send(reply).await?;
    Ok(())
}
