//! Test fixtures for the playback core
//! Sample ids and track builders used across the integration tests

use fake::Fake;
use fake::faker::lorem::en::Words;
use poise::serenity_prelude::{ChannelId, GuildId, UserId};

use jukebox::commands::music::audio_sources::{Requester, Track, TrackSource};

/// Sample guild ID for testing
pub const SAMPLE_GUILD_ID: u64 = 123456789;

/// Sample text channel ID for testing
pub const SAMPLE_CHANNEL_ID: u64 = 987654321;

/// Sample voice channel IDs for testing
pub const SAMPLE_VOICE_CHANNEL_ID: u64 = 555000111;
pub const OTHER_VOICE_CHANNEL_ID: u64 = 555000222;

/// Sample user ID for testing
pub const SAMPLE_USER_ID: u64 = 42;

pub fn guild() -> GuildId {
    GuildId::new(SAMPLE_GUILD_ID)
}

pub fn voice_channel() -> ChannelId {
    ChannelId::new(SAMPLE_VOICE_CHANNEL_ID)
}

pub fn other_voice_channel() -> ChannelId {
    ChannelId::new(OTHER_VOICE_CHANNEL_ID)
}

/// A resolved track with the given title.
pub fn track(title: &str) -> Track {
    let slug = title.replace(' ', "-");

    Track::new(TrackSource {
        requester: Requester::new(UserId::new(SAMPLE_USER_ID), "tester"),
        channel_id: ChannelId::new(SAMPLE_CHANNEL_ID),
        title: title.to_string(),
        uploader: "Test Uploader".to_string(),
        uploader_url: None,
        upload_date: Some("01.01.2024".to_string()),
        thumbnail: None,
        description: None,
        duration: "3 minutes".to_string(),
        duration_secs: Some(180),
        tags: Vec::new(),
        url: format!("https://www.youtube.com/watch?v={}", slug),
        views: Some(1000),
        likes: Some(10),
        dislikes: None,
        stream_url: format!("https://cdn.example/{}", slug),
    })
}

/// A track with a generated title.
pub fn random_track() -> Track {
    let words: Vec<String> = Words(2..5).fake();
    track(&words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_track() {
        let track = track("never gonna");
        assert_eq!(track.title(), "never gonna");
        assert_eq!(track.source.url, "https://www.youtube.com/watch?v=never-gonna");
        assert_eq!(track.requester.id, UserId::new(SAMPLE_USER_ID));
        assert!(!random_track().title().is_empty());
    }
}
