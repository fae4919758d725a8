//! Feed entry data structure.

use serde::{Deserialize, Serialize};

/// A single post pulled from the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedEntry {
    /// Stable post identifier from the feed
    pub id: String,

    /// Full URL of the post
    pub url: String,
}

impl FeedEntry {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}
