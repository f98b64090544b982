use super::*;
use crate::commands::music::audio_sources::{Requester, Track, TrackSource};
use crate::commands::music::utils::{
    embedded_messages, guild_context,
    music_manager::{MusicResult, PlaybackManager},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Play a song from YouTube or a direct URL
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"]
    #[rest]
    query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);

    let manager = match connect_author(ctx).await {
        Ok(manager) => manager,
        Err(err) => {
            ctx.send(embedded_messages::error(&err)).await?;
            return Ok(());
        }
    };

    // Defer the response since resolving the track might take time
    ctx.defer().await?;

    let reply = match queue_track(ctx, &manager, &query).await {
        Ok((track, position)) => {
            info!("Queued {} at position {}", track.title(), position);
            embedded_messages::added_to_queue(&track, position)
        }
        Err(err) => {
            warn!("Failed to queue {:?}: {}", query, err);
            embedded_messages::error(&err)
        }
    };

    ctx.send(reply).await?;
    Ok(())
}

/// Make sure the bot is in the author's voice channel, joining it if the bot is
/// not connected yet.
async fn connect_author(ctx: Context<'_>) -> MusicResult<Arc<PlaybackManager>> {
    let guild_id = guild_context::guild_id(ctx)?;
    let user_channel = guild_context::user_voice_channel(ctx, guild_id, ctx.author().id)?;

    let manager = ctx.data().registry.get_or_create(guild_id).await;
    guild_context::ensure_same_channel(user_channel, manager.voice_channel())?;

    if manager.voice_channel().is_none() {
        manager.join(user_channel).await?;
    }

    Ok(manager)
}

async fn queue_track(
    ctx: Context<'_>,
    manager: &PlaybackManager,
    query: &str,
) -> MusicResult<(Track, usize)> {
    let author = ctx.author();
    let requester = Requester::new(author.id, author.name.clone());

    let source = TrackSource::resolve(
        ctx.data().extractor.as_ref(),
        query,
        requester,
        ctx.channel_id(),
    )
    .await?;

    let track = Track::new(source);
    let position = manager.enqueue(track.clone())?;

    Ok((track, position))
}
