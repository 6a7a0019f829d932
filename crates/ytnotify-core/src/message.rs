use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Word after the prefix that opens every bot command.
pub const COMMAND_GROUP: &str = "ytnotifier";

/// An incoming command message from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "discord").
    pub channel: String,
    /// Platform-specific user ID.
    pub sender_id: String,
    /// Human-readable sender name.
    pub sender_name: Option<String>,
    /// Message text content.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific target for routing the response (the Discord channel id).
    #[serde(default)]
    pub reply_target: Option<String>,
    /// Server the message was sent in, `None` for direct messages.
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Whether the sender holds administrator rights where the message was sent.
    #[serde(default)]
    pub is_admin: bool,
}

/// An outgoing message to send through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    #[serde(default)]
    pub embed: Option<Embed>,
    /// Platform-specific target for routing (the Discord channel id).
    #[serde(default)]
    pub reply_target: Option<String>,
}

impl OutgoingMessage {
    /// Plain text reply to the given target.
    pub fn text(text: impl Into<String>, reply_target: Option<String>) -> Self {
        Self {
            text: text.into(),
            embed: None,
            reply_target,
        }
    }
}

/// Platform-neutral rich embed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub url: Option<String>,
    pub description: String,
    pub colour: u32,
    pub author: Option<EmbedAuthor>,
    pub image: Option<String>,
    pub footer: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Author block of an [`Embed`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}
