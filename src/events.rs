use poise::serenity_prelude as serenity;
use serenity::{ChannelId, UserId};
use tracing::{debug, info};

use crate::{Data, Error};

/// Gateway events the bot reacts to outside of commands.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot, .. } => {
            info!("Logged in as {}", data_about_bot.user.name);
        }
        serenity::FullEvent::VoiceStateUpdate { old, new } => {
            let Some(guild_id) = new.guild_id else {
                return Ok(());
            };
            let Some(manager) = data.registry.get(guild_id) else {
                return Ok(());
            };

            let bot_id = ctx.cache.current_user().id;
            let old_channel = old.as_ref().and_then(|state| state.channel_id);

            if bot_was_disconnected(
                bot_id,
                new.user_id,
                old_channel,
                new.channel_id,
                manager.voice_channel(),
            ) {
                info!("Disconnected from voice in guild {}, removing player", guild_id);
                data.registry.remove(guild_id).await;
            } else {
                debug!("Voice state update in guild {} ignored", guild_id);
            }
        }
        _ => {}
    }

    Ok(())
}

/// Whether a voice state update means the bot was removed from the channel its
/// player is connected to. Updates from an earlier connection are ignored.
fn bot_was_disconnected(
    bot_id: UserId,
    user_id: UserId,
    old_channel: Option<ChannelId>,
    new_channel: Option<ChannelId>,
    player_channel: Option<ChannelId>,
) -> bool {
    if user_id != bot_id || new_channel.is_some() {
        return false;
    }

    match (old_channel, player_channel) {
        (_, None) => false,
        (Some(old), Some(player)) => old == player,
        (None, Some(_)) => true,
    }
}
