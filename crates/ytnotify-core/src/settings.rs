//! The notifier's persisted settings document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store partition owned by the notifier.
pub const PARTITION: &str = "youtube_notifier";

/// Fixed id of the singleton settings document.
pub const DOCUMENT_ID: &str = "config";

/// Operational mode derived from [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Enabled with source, playlist and destination all set.
    Active,
    /// Anything else. The poller does nothing.
    Paused,
}

impl Mode {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }
}

/// Singleton settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// YouTube channel polled for uploads.
    #[serde(default, rename = "yt")]
    pub source_channel: String,
    /// Uploads playlist of the source channel.
    #[serde(default, rename = "playlist")]
    pub playlist: String,
    /// Discord channel receiving notifications.
    #[serde(default, rename = "channel")]
    pub destination_channel: String,
    #[serde(default, rename = "lastvideo")]
    pub last_video: String,
    #[serde(default, rename = "icon")]
    pub icon_url: String,
    /// Optional text sent with the embed, `{url}` is replaced by the watch URL.
    #[serde(default, rename = "message")]
    pub message: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(
        default,
        rename = "updatedAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_channel: String::new(),
            playlist: String::new(),
            destination_channel: String::new(),
            last_video: String::new(),
            icon_url: String::new(),
            message: String::new(),
            enabled: true,
            updated_at: None,
        }
    }
}

impl Settings {
    pub fn mode(&self) -> Mode {
        if self.enabled
            && !self.source_channel.is_empty()
            && !self.destination_channel.is_empty()
            && !self.playlist.is_empty()
        {
            Mode::Active
        } else {
            Mode::Paused
        }
    }

    pub fn is_active(&self) -> bool {
        self.mode() == Mode::Active
    }

    /// Top-level document fields, as written by a full upsert.
    pub fn to_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }

    /// Decode a stored document, defaulting every missing field.
    pub fn from_document(doc: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(doc)
    }
}
