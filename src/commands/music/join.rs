use super::*;
use crate::commands::music::utils::{
    embedded_messages, guild_context,
    music_manager::MusicResult,
};
use poise::serenity_prelude::ChannelId;

/// Join your voice channel, or move the bot there
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn join(ctx: Context<'_>) -> CommandResult {
    let reply = match join_author_channel(ctx).await {
        Ok(channel_id) => embedded_messages::joined_voice_channel(channel_id),
        Err(err) => embedded_messages::error(&err),
    };

    ctx.send(reply).await?;
    Ok(())
}

async fn join_author_channel(ctx: Context<'_>) -> MusicResult<ChannelId> {
    let guild_id = guild_context::guild_id(ctx)?;
    let channel_id = guild_context::user_voice_channel(ctx, guild_id, ctx.author().id)?;

    let manager = ctx.data().registry.get_or_create(guild_id).await;
    manager.join(channel_id).await?;

    Ok(channel_id)
}
