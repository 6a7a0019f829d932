use crate::{
    error::NotifierError,
    message::{IncomingMessage, OutgoingMessage},
    video::{ChannelDetails, Video},
};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Messaging Channel trait.
///
/// The chat platform the bot lives on: receives admin commands and
/// delivers notifications.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, NotifierError>;

    /// Send a message to `message.reply_target`.
    async fn send(&self, message: OutgoingMessage) -> Result<(), NotifierError>;

    /// Whether `target` names a destination the bot can currently see.
    async fn resolve_target(&self, target: &str) -> bool;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), NotifierError>;
}

/// Where uploads come from.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Most recent upload of `channel_id`, `None` when the channel has none.
    async fn latest_video(&self, channel_id: &str) -> Result<Option<Video>, NotifierError>;

    /// Uploads playlist and icon of `channel_id`.
    async fn channel_details(&self, channel_id: &str) -> Result<ChannelDetails, NotifierError>;
}

/// Document-oriented key/value store scoped by partition.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, partition: &str, id: &str) -> Result<Option<Value>, NotifierError>;

    /// Create the document if absent, otherwise overwrite the given top-level fields.
    async fn upsert(
        &self,
        partition: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), NotifierError>;
}
