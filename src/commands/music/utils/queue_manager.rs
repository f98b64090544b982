use parking_lot::Mutex;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use tokio::sync::Notify;
use tracing::{debug, info};

use super::music_manager::{MusicError, MusicResult};
use crate::commands::music::audio_sources::Track;

/// Tracks shown per page of the `queue` command.
pub const QUEUE_PAGE_SIZE: usize = 10;

/// One page of the pending tracks. Pages are 1-based; a requested page out of
/// range is clamped to the nearest existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuePage {
    pub page: usize,
    pub pages: usize,
    /// 0-based index of the first track on this page.
    pub start: usize,
    pub end: usize,
    /// Number of pending tracks across all pages.
    pub total: usize,
}

impl QueuePage {
    pub fn new(requested: usize, len: usize) -> Self {
        let pages = len.div_ceil(QUEUE_PAGE_SIZE).max(1);
        let page = requested.clamp(1, pages);
        let start = (page - 1) * QUEUE_PAGE_SIZE;
        let end = (start + QUEUE_PAGE_SIZE).min(len);

        Self {
            page,
            pages,
            start,
            end,
            total: len,
        }
    }
}

/// The pending tracks of one guild.
///
/// Command handlers append and rearrange; the guild's playback loop is the only
/// caller of [`TrackQueue::take_next`]. Every operation runs under one lock, so
/// readers never observe a half-applied change.
#[derive(Default)]
pub struct TrackQueue {
    items: Mutex<VecDeque<Track>>,
    available: Notify,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track to the back of the queue. Returns the new queue length.
    pub fn append(&self, track: Track) -> usize {
        let len = {
            let mut items = self.items.lock();
            items.push_back(track);
            items.len()
        };
        self.available.notify_one();
        len
    }

    /// Remove and return the oldest track, waiting until one is available.
    ///
    /// Cancel safe: a track is only removed when this future completes.
    pub async fn take_next(&self) -> Track {
        loop {
            let notified = self.available.notified();

            let next = self.items.lock().pop_front();
            if let Some(track) = next {
                debug!("Took next track: {}", track.title());
                return track;
            }

            notified.await;
        }
    }

    /// Copy of the tracks in `start..end`, clamped to the queue bounds.
    pub fn peek_range(&self, start: usize, end: usize) -> Vec<Track> {
        let items = self.items.lock();
        let end = end.min(items.len());
        let start = start.min(end);
        items.range(start..end).cloned().collect()
    }

    /// The tracks on the requested page, read under a single lock.
    pub fn page(&self, requested: usize) -> (QueuePage, Vec<Track>) {
        let items = self.items.lock();
        let page = QueuePage::new(requested, items.len());
        let tracks = items.range(page.start..page.end).cloned().collect();
        (page, tracks)
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Drop every pending track. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut items = self.items.lock();
        let cleared = items.len();
        items.clear();
        info!("Cleared {} tracks from queue", cleared);
        cleared
    }

    /// Randomly reorder the pending tracks.
    pub fn shuffle(&self) {
        let mut items = self.items.lock();
        items.make_contiguous().shuffle(&mut rand::rng());
        debug!("Shuffled {} tracks", items.len());
    }

    /// Remove the track at a 0-based position.
    pub fn remove_at(&self, index: usize) -> MusicResult<Track> {
        let mut items = self.items.lock();
        let len = items.len();
        items
            .remove(index)
            .ok_or(MusicError::InvalidIndex {
                position: index + 1,
                len,
            })
    }
}
