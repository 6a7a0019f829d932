//! YouTube items as the notifier sees them.

use serde::{Deserialize, Serialize};

/// The most recent upload returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    /// ISO-8601 publication time as returned by the API.
    pub published_at: String,
}

impl Video {
    /// Canonical watch URL.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://i.ytimg.com/vi/{}/sddefault.jpg", self.id)
    }

    pub fn channel_url(&self) -> String {
        format!("https://youtube.com/channel/{}", self.channel_id)
    }
}

/// Result of a channel lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDetails {
    /// Uploads playlist id.
    pub playlist_id: String,
    /// Default-size channel thumbnail.
    pub icon_url: String,
}
