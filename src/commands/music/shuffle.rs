use super::*;
use crate::commands::music::utils::{embedded_messages, guild_context};

/// Shuffle the queued tracks
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn shuffle(ctx: Context<'_>) -> CommandResult {
    let manager = match guild_context::controlled_manager(ctx) {
        Ok(manager) => manager,
        Err(err) => {
            ctx.send(embedded_messages::error(&err)).await?;
            return Ok(());
        }
    };

    let queue = manager.queue();
    if queue.is_empty() {
        ctx.send(embedded_messages::queue_is_empty()).await?;
        return Ok(());
    }

    queue.shuffle();
    ctx.send(embedded_messages::shuffled(queue.len())).await?;

    Ok(())
}
