//! This module defines how search terms and URLs are turned into playable tracks.
//! It holds the `Extractor` trait the rest of the bot resolves tracks through,
//! the record type the extraction service returns, and the `yt-dlp` implementation.

/// Submodule defining the immutable `Track` queue entry and its requester.
pub mod track;
/// Submodule defining `TrackSource`, the resolved stream plus its metadata.
pub mod track_metadata;
/// Submodule implementing the `Extractor` trait on top of the `yt-dlp` executable.
pub mod youtube;

pub use track::{Requester, Track};
pub use track_metadata::TrackSource;
pub use youtube::YtDlp;

use crate::commands::music::utils::music_manager::MusicError;
use serde::Deserialize;
use serenity::async_trait;
use url::Url;

/// A specialized `Result` type for operations within the `audio_sources` module.
pub type AudioSourceResult<T> = Result<T, MusicError>;

/// One record returned by the extraction service. A search or playlist lookup
/// yields a listing with `entries`; a video lookup yields a single item.
///
/// Every field is optional because `yt-dlp` omits (or nulls) whatever the
/// extractor could not find.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractedInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub uploader_url: Option<String>,
    pub upload_date: Option<String>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub duration: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub webpage_url: Option<String>,
    /// Direct stream URL after full resolution, page URL in flat listings.
    pub url: Option<String>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub dislike_count: Option<u64>,
    /// Unavailable entries come back as `null` and are kept as `None`.
    pub entries: Option<Vec<Option<ExtractedInfo>>>,
}

impl ExtractedInfo {
    /// Whether this record is a listing (search results, playlist) rather than one item.
    pub fn is_listing(&self) -> bool {
        self.entries.is_some()
    }

    /// The canonical page URL of this item, used for the full resolution pass.
    pub fn page_url(&self) -> Option<String> {
        if let Some(url) = self.webpage_url.as_ref().filter(|url| !url.is_empty()) {
            return Some(url.clone());
        }

        if let Some(url) = self.url.as_ref().filter(|url| AudioSource::is_url(url)) {
            return Some(url.clone());
        }

        self.id
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("https://www.youtube.com/watch?v={}", id))
    }

    /// Pick the item to resolve from a lookup result: the record itself when it is
    /// a single item, otherwise the first entry that can be resolved.
    pub fn first_resolvable(self) -> Option<ExtractedInfo> {
        match self.entries {
            Some(entries) => entries
                .into_iter()
                .flatten()
                .find(|entry| entry.page_url().is_some()),
            None => Some(self),
        }
    }

    /// Pick the fully resolved item: the record itself, or the first present entry
    /// when full resolution still produced a listing.
    pub fn first_entry(self) -> Option<ExtractedInfo> {
        match self.entries {
            Some(entries) => entries.into_iter().flatten().next(),
            None => Some(self),
        }
    }
}

/// The extraction service: turns a search term or URL into metadata and a
/// playable stream URL. Both calls are slow, fallible network operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Fast, non-downloading lookup. May return a single item or a listing.
    /// `Ok(None)` means the service found nothing.
    async fn lookup(&self, query: &str) -> AudioSourceResult<Option<ExtractedInfo>>;

    /// Full resolution of a page URL, including the direct stream URL.
    async fn resolve_full(&self, url: &str) -> AudioSourceResult<Option<ExtractedInfo>>;
}

/// A utility struct providing general helper functions related to audio sources.
pub struct AudioSource;

impl AudioSource {
    /// Performs a basic check if the input string can be parsed as an http(s) URL.
    /// Does not validate if the URL is actually reachable or supported.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
    }
}
