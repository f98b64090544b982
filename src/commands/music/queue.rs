use super::*;
use crate::commands::music::utils::{embedded_messages, guild_context};

/// Show the queued tracks, 10 per page
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn queue(
    ctx: Context<'_>,
    #[description = "Page to show (1-based)"] page: Option<usize>,
) -> CommandResult {
    let manager = match guild_context::existing_manager(ctx) {
        Ok(manager) => manager,
        Err(_) => {
            ctx.send(embedded_messages::queue_is_empty()).await?;
            return Ok(());
        }
    };

    let current = manager.current();
    let (page, tracks) = manager.queue().page(page.unwrap_or(1));

    if current.is_none() && tracks.is_empty() {
        ctx.send(embedded_messages::queue_is_empty()).await?;
        return Ok(());
    }

    ctx.send(embedded_messages::music_queue(current.as_ref(), page, &tracks))
        .await?;

    Ok(())
}
