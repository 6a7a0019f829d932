//! Gateway: the event loop joining the Discord channel, the command
//! handlers and the upload poller.

mod poller;


use poller::Poller;

use crate::commands::{self, Command, CommandContext};
use crate::state::NotifierState;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use ytnotify_core::{
    message::IncomingMessage,
    traits::{Channel, VideoSource},
};

pub struct Gateway {
    channel: Arc<dyn Channel>,
    state: Arc<NotifierState>,
    source: Arc<dyn VideoSource>,
    prefix: String,
    interval: Duration,
    /// False when no YouTube key is configured; commands still work.
    polling: bool,
}

impl Gateway {
    pub fn new(
        channel: Arc<dyn Channel>,
        state: Arc<NotifierState>,
        source: Arc<dyn VideoSource>,
        prefix: String,
        interval: Duration,
        polling: bool,
    ) -> Self {
        Self {
            channel,
            state,
            source,
            prefix,
            interval,
            polling,
        }
    }

    /// Run until ctrl-c.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name()))?;
        info!(
            "ytnotify gateway running | channel: {} | prefix: {} | interval: {}s",
            self.channel.name(),
            self.prefix,
            self.interval.as_secs()
        );

        let poll_handle = if self.polling {
            let poller = Poller::new(
                self.state.clone(),
                self.source.clone(),
                self.channel.clone(),
                self.interval,
            );
            Some(tokio::spawn(poller.run()))
        } else {
            error!("no YouTube API key configured, upload polling disabled");
            None
        };

        loop {
            tokio::select! {
                incoming = rx.recv() => {
                    let Some(incoming) = incoming else {
                        warn!("channel {} closed its inbound stream", self.channel.name());
                        break;
                    };
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.handle_message(incoming).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        info!("Shutting down...");
        if let Some(h) = poll_handle {
            h.abort();
        }
        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }
        info!("Shutdown complete.");
        Ok(())
    }

    /// Answer a command message. Non-command text is ignored.
    pub(crate) async fn handle_message(&self, incoming: IncomingMessage) {
        let Some(cmd) = Command::parse(&incoming.text, &self.prefix) else {
            return;
        };
        info!(
            "command {cmd:?} from {} ({})",
            incoming.sender_name.as_deref().unwrap_or("unknown"),
            incoming.sender_id
        );

        let ctx = CommandContext {
            state: &self.state,
            source: self.source.as_ref(),
            incoming: &incoming,
            prefix: &self.prefix,
        };
        let reply = commands::handle(cmd, &ctx).await;

        if let Err(e) = self.channel.send(reply).await {
            warn!("failed to send command reply: {e}");
        }
    }
}
