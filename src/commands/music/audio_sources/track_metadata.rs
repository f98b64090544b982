//! Defines `TrackSource`, the fully resolved form of a user's search term or URL,
//! and the two-phase resolution that produces it.

use chrono::NaiveDate;
use serenity::model::id::ChannelId;
use std::fmt;
use tracing::{debug, info, warn};

use super::{AudioSourceResult, ExtractedInfo, Extractor, Requester};
use crate::commands::music::utils::format_duration;
use crate::commands::music::utils::music_manager::MusicError;

/// A playable stream plus everything we know about it. Immutable once resolved;
/// the voice transport opens the stream from `stream_url` when the track starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSource {
    /// The user who asked for the track.
    pub requester: Requester,
    /// The text channel the request came from; announcements go here.
    pub channel_id: ChannelId,
    pub title: String,
    pub uploader: String,
    pub uploader_url: Option<String>,
    /// Upload date rendered as `DD.MM.YYYY`.
    pub upload_date: Option<String>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    /// Human-readable duration, see [`format_duration`].
    pub duration: String,
    pub duration_secs: Option<u64>,
    pub tags: Vec<String>,
    /// Canonical page URL of the track.
    pub url: String,
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub dislikes: Option<u64>,
    /// Direct URL of the audio stream.
    pub stream_url: String,
}

impl TrackSource {
    /// Resolve a search term or URL into a `TrackSource`.
    ///
    /// First a fast flat lookup picks the item (the first resolvable entry when
    /// the lookup returns a listing), then a full resolution of that item's page
    /// yields the stream URL and complete metadata. Every failure is reported as
    /// [`MusicError::Resolution`] carrying the original search text.
    pub async fn resolve(
        extractor: &dyn Extractor,
        query: &str,
        requester: Requester,
        channel_id: ChannelId,
    ) -> AudioSourceResult<TrackSource> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MusicError::resolution(query, "the search was empty"));
        }

        info!("Resolving track for query: {}", query);

        let found = extractor
            .lookup(query)
            .await
            .map_err(|e| MusicError::resolution(query, e))?
            .ok_or_else(|| MusicError::resolution(query, "nothing was found"))?;

        let selected = found
            .first_resolvable()
            .ok_or_else(|| MusicError::resolution(query, "no playable results"))?;

        let page_url = selected
            .page_url()
            .ok_or_else(|| MusicError::resolution(query, "no playable results"))?;

        debug!("Selected {} for query {}", page_url, query);

        let resolved = extractor
            .resolve_full(&page_url)
            .await
            .map_err(|e| MusicError::resolution(query, e))?
            .and_then(ExtractedInfo::first_entry)
            .ok_or_else(|| MusicError::resolution(query, "could not fetch the track"))?;

        let stream_url = resolved
            .url
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| MusicError::resolution(query, "no audio stream available"))?;

        Ok(Self::from_info(
            resolved,
            page_url,
            stream_url,
            requester,
            channel_id,
        ))
    }

    fn from_info(
        info: ExtractedInfo,
        page_url: String,
        stream_url: String,
        requester: Requester,
        channel_id: ChannelId,
    ) -> Self {
        let duration_secs = info.duration.map(|secs| secs.max(0.0) as u64);

        Self {
            requester,
            channel_id,
            title: info.title.unwrap_or_else(|| "Unknown Title".to_string()),
            uploader: info.uploader.unwrap_or_else(|| "Unknown".to_string()),
            uploader_url: info.uploader_url,
            upload_date: info.upload_date.as_deref().and_then(format_upload_date),
            thumbnail: info.thumbnail,
            description: info.description,
            duration: format_duration(duration_secs.unwrap_or_default()),
            duration_secs,
            tags: info.tags.unwrap_or_default(),
            url: info.webpage_url.unwrap_or(page_url),
            views: info.view_count,
            likes: info.like_count,
            dislikes: info.dislike_count,
            stream_url,
        }
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{}** by **{}**", self.title, self.uploader)
    }
}

/// `yt-dlp` reports upload dates as `YYYYMMDD`.
fn format_upload_date(raw: &str) -> Option<String> {
    match NaiveDate::parse_from_str(raw, "%Y%m%d") {
        Ok(date) => Some(date.format("%d.%m.%Y").to_string()),
        Err(e) => {
            warn!("Unexpected upload date {:?}: {}", raw, e);
            None
        }
    }
}
