//! Gateway event handler: forwards prefixed messages to the bot.

use chrono::Utc;
use serenity::all::{Context, EventHandler, Message, Ready};
use serenity::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use ytnotify_core::message::{IncomingMessage, COMMAND_GROUP};

pub(super) struct Handler {
    tx: mpsc::Sender<IncomingMessage>,
    prefix: String,
    admin_users: Vec<u64>,
}

impl Handler {
    pub(super) fn new(
        tx: mpsc::Sender<IncomingMessage>,
        prefix: String,
        admin_users: Vec<u64>,
    ) -> Self {
        Self {
            tx,
            prefix,
            admin_users,
        }
    }

    /// Configured admin, or ADMINISTRATOR in the guild the message came from.
    async fn is_admin(&self, ctx: &Context, msg: &Message) -> bool {
        if self.admin_users.contains(&msg.author.id.get()) {
            return true;
        }
        let Some(guild_id) = msg.guild_id else {
            return false;
        };
        let member = match guild_id.member(ctx, msg.author.id).await {
            Ok(m) => m,
            Err(e) => {
                warn!("discord: failed to fetch member {}: {e}", msg.author.id);
                return false;
            }
        };
        ctx.cache
            .guild(guild_id)
            .map(|guild| guild.member_permissions(&member).administrator())
            .unwrap_or(false)
    }
}

/// `{prefix}ytnotifier ...`, the only text worth an admin lookup.
pub(super) fn is_command(content: &str, prefix: &str) -> bool {
    content
        .trim_start()
        .strip_prefix(prefix)
        .and_then(|rest| rest.split_whitespace().next())
        .is_some_and(|word| word == COMMAND_GROUP)
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || !is_command(&msg.content, &self.prefix) {
            return;
        }

        let is_admin = self.is_admin(&ctx, &msg).await;
        debug!(
            "discord: command from {} in {} (admin: {is_admin})",
            msg.author.id, msg.channel_id
        );

        let incoming = IncomingMessage {
            id: Uuid::new_v4(),
            channel: "discord".to_string(),
            sender_id: msg.author.id.get().to_string(),
            sender_name: Some(msg.author.name.clone()),
            text: msg.content.trim().to_string(),
            timestamp: Utc::now(),
            reply_target: Some(msg.channel_id.get().to_string()),
            guild_id: msg.guild_id.map(|g| g.get().to_string()),
            is_admin,
        };

        if self.tx.send(incoming).await.is_err() {
            warn!("discord: receiver dropped, command discarded");
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("discord: connected as {}", ready.user.name);
    }
}
