//! Defines `Track`, the immutable entry that sits in a guild's queue.

use serenity::model::id::UserId;
use std::fmt;

use super::TrackSource;

/// The user who asked for a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: UserId,
    pub name: String,
}

impl Requester {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Discord mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// A resolved track together with the user who queued it. One per enqueue request.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub source: TrackSource,
    pub requester: Requester,
}

impl Track {
    pub fn new(source: TrackSource) -> Self {
        let requester = source.requester.clone();
        Self { source, requester }
    }

    pub fn title(&self) -> &str {
        &self.source.title
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
