use poise::{CreateReply, serenity_prelude as serenity};
use serenity::{ChannelId, CreateEmbed, CreateEmbedFooter};
use thousands::Separable;

use super::music_manager::{MusicError, PlayerState};
use super::queue_manager::QueuePage;
use crate::commands::music::audio_sources::Track;

const SUCCESS: u32 = 0x00ff00;
const FAILURE: u32 = 0xff0000;

fn track_link(track: &Track) -> String {
    format!("[{}]({})", track.title(), track.source.url)
}

fn duration_or_unknown(track: &Track) -> String {
    if track.source.duration.is_empty() {
        "Unknown duration".to_string()
    } else {
        track.source.duration.clone()
    }
}

/// Create an embed for when a track starts playing
pub fn now_playing(track: &Track) -> CreateEmbed {
    let source = &track.source;

    let uploader = match &source.uploader_url {
        Some(url) => format!("[{}]({})", source.uploader, url),
        None => source.uploader.clone(),
    };

    let mut embed = CreateEmbed::new()
        .title("🎵 Now Playing")
        .description(track_link(track))
        .field("Duration", format!("`{}`", duration_or_unknown(track)), true)
        .field("Requested by", track.requester.mention(), true)
        .field("Uploader", uploader, true)
        .field("URL", source.url.clone(), false)
        .color(SUCCESS);

    if let Some(views) = source.views {
        embed = embed.field("Views", views.separate_with_commas(), true);
    }
    if let Some(likes) = source.likes {
        embed = embed.field("Likes", likes.separate_with_commas(), true);
    }
    if let Some(thumbnail) = &source.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }

    embed
}

/// Create an embed for when a track could not be played
pub fn playback_failed(track: &Track, err: &MusicError) -> CreateEmbed {
    CreateEmbed::new()
        .title("❌ Error")
        .description(format!("Couldn't play {}: {}", track_link(track), err))
        .color(FAILURE)
}

/// Create an embed for when a track is added to the queue
pub fn added_to_queue(track: &Track, position: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🎵 Added to Queue")
            .description(track_link(track))
            .field("Duration", format!("`{}`", duration_or_unknown(track)), true)
            .field("Position", format!("`#{}`", position), true)
            .color(SUCCESS),
    )
}

/// Create an embed for one page of the music queue
pub fn music_queue(current: Option<&Track>, page: QueuePage, tracks: &[Track]) -> CreateReply {
    let mut description = String::new();

    match current {
        Some(track) => {
            description.push_str("**🎵 Now Playing**\n");
            description.push_str(&format!("**{}**\n\n", track_link(track)));
        }
        None => description.push_str("**🔇 Nothing playing**\n\n"),
    }

    if tracks.is_empty() {
        description.push_str("**📭 Queue is empty**");
    } else {
        description.push_str(&format!("**📋 Queue - {} tracks**\n", page.total));
        for (offset, track) in tracks.iter().enumerate() {
            description.push_str(&format!("`{}.` {}", page.start + offset + 1, track_link(track)));
            if !track.source.duration.is_empty() {
                description.push_str(&format!(" `{}`", track.source.duration));
            }
            description.push('\n');
        }
    }

    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🎵 Music Queue")
            .description(description)
            .footer(CreateEmbedFooter::new(format!(
                "Viewing page {}/{}",
                page.page, page.pages
            )))
            .color(SUCCESS),
    )
}

/// Create an embed for the `now` command
/// Create the reply for the `now` command, with the player's status and loop mode
pub fn current_track(track: Option<&Track>, state: PlayerState, looping: bool) -> CreateReply {
    let Some(track) = track else {
        return error(&MusicError::NothingPlaying);
    };

    let status = match state {
        PlayerState::Paused => "⏸️ Paused",
        _ => "▶️ Playing",
    };
    let loop_mode = if looping { "🔁 On" } else { "Off" };

    CreateReply::default().embed(
        now_playing(track)
            .field("Status", status, true)
            .field("Loop", loop_mode, true),
    )
}

/// Create an embed for when a track is paused
pub fn paused(track: &Track) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⏸️ Paused")
            .description(format!("Paused {}", track_link(track)))
            .color(SUCCESS),
    )
}

/// Create an embed for when a track is resumed
pub fn resumed(track: &Track) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("▶️ Resumed")
            .description(format!("Resumed {}", track_link(track)))
            .color(SUCCESS),
    )
}

/// Create an embed for when a track is skipped
pub fn skipped(track: &Track) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⏭️ Skipped")
            .description(format!("Skipped {}", track_link(track)))
            .color(SUCCESS),
    )
}

/// Create an embed for when the bot stops playing music
pub fn stopped(cleared: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("⏹️ Stopped")
            .description(format!(
                "Playback stopped and {} queued tracks cleared",
                cleared
            ))
            .color(SUCCESS),
    )
}

pub fn joined_voice_channel(channel_id: ChannelId) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🔊 Joined Voice Channel")
            .description(format!("Connected to <#{}>", channel_id))
            .color(SUCCESS),
    )
}

/// Create an embed for when the bot leaves a voice channel
pub fn left_voice_channel() -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("👋 Left Voice Channel")
            .description("Successfully disconnected and cleared the queue")
            .color(SUCCESS),
    )
}

pub fn shuffled(count: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🔀 Shuffled")
            .description(format!("Shuffled {} queued tracks", count))
            .color(SUCCESS),
    )
}

/// Create an embed for when a track is removed from the queue
pub fn track_removed(track: &Track, position: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🗑️ Track Removed")
            .description(format!(
                "Removed {} from position #{}",
                track_link(track),
                position
            ))
            .color(SUCCESS),
    )
}

pub fn volume_set(volume: u8) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🔉 Volume")
            .description(format!("Volume set to {}%", volume))
            .color(SUCCESS),
    )
}

/// Create an embed for when repeat is enabled or disabled
pub fn loop_status(enabled: bool) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title(if enabled {
                "🔂 Loop Enabled"
            } else {
                "➡️ Loop Disabled"
            })
            .description(if enabled {
                "The current track will repeat until loop is turned off or it is skipped"
            } else {
                "Tracks will play once and move on to the next"
            })
            .color(SUCCESS),
    )
}

/// Create an embed for when the queue is empty
pub fn queue_is_empty() -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("❌ Error")
            .description("The queue is empty")
            .color(FAILURE),
    )
}

/// Create an error embed for a failed music command. Errors caused by the
/// user's own state are only shown to them.
pub fn error(err: &MusicError) -> CreateReply {
    let private = matches!(
        err,
        MusicError::UserNotInVoiceChannel | MusicError::VoiceChannelConflict
    );

    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("❌ Error")
                .description(err.to_string())
                .color(FAILURE),
        )
        .ephemeral(private)
}
