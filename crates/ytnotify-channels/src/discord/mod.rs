//! Discord channel.
//!
//! Gateway connection through serenity for inbound commands, REST for
//! notifications and channel lookups.

mod handler;
pub(crate) mod send;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serenity::all::{ChannelId, Client, GatewayIntents, Http, ShardManager};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};
use ytnotify_core::{
    config::DiscordConfig,
    error::NotifierError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};

pub use send::parse_channel_id;

/// Discord channel backed by a serenity client.
pub struct DiscordChannel {
    config: DiscordConfig,
    http: Arc<Http>,
    shard_manager: Mutex<Option<Arc<ShardManager>>>,
}

impl DiscordChannel {
    /// Create a new Discord channel from config.
    pub fn new(config: DiscordConfig) -> Self {
        let http = Arc::new(Http::new(&config.bot_token));
        Self {
            config,
            http,
            shard_manager: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Channel for DiscordChannel {
    fn name(&self) -> &str {
        "discord"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, NotifierError> {
        let (tx, rx) = mpsc::channel(64);
        let intents =
            GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

        let handler = handler::Handler::new(
            tx,
            self.config.prefix.clone(),
            self.config.admin_users.clone(),
        );

        let mut client = Client::builder(&self.config.bot_token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| NotifierError::Channel(format!("discord client build failed: {e}")))?;

        *self.shard_manager.lock().await = Some(client.shard_manager.clone());

        info!("Discord channel connecting to gateway...");
        tokio::spawn(async move {
            if let Err(e) = client.start().await {
                error!("discord gateway stopped: {e}");
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), NotifierError> {
        let target = message
            .reply_target
            .as_deref()
            .ok_or_else(|| NotifierError::Channel("no reply_target on outgoing message".into()))?;
        let channel_id = parse_channel_id(target)
            .map(ChannelId::new)
            .ok_or_else(|| NotifierError::Channel(format!("invalid discord channel id: {target}")))?;

        for builder in send::build_messages(&message) {
            channel_id
                .send_message(&self.http, builder)
                .await
                .map_err(|e| NotifierError::Channel(format!("discord send failed: {e}")))?;
        }
        Ok(())
    }

    async fn resolve_target(&self, target: &str) -> bool {
        let Some(id) = parse_channel_id(target) else {
            return false;
        };
        match ChannelId::new(id).to_channel(&self.http).await {
            Ok(_) => true,
            Err(e) => {
                warn!("discord: channel {id} not resolvable: {e}");
                false
            }
        }
    }

    async fn stop(&self) -> Result<(), NotifierError> {
        if let Some(manager) = self.shard_manager.lock().await.take() {
            manager.shutdown_all().await;
            info!("Discord channel stopped");
        }
        Ok(())
    }
}
