//! Fixed-interval upload poll loop.

use crate::render::render;
use crate::state::NotifierState;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use ytnotify_core::{
    error::NotifierError,
    traits::{Channel, VideoSource},
};

/// What one tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Disabled or not fully configured; nothing was fetched.
    Paused,
    /// The fetch failed; nothing changed.
    FetchFailed(String),
    /// The source channel has no videos.
    NoVideos,
    /// The newest video was already notified.
    Unchanged,
    /// Destination channel not resolvable; the video is retried next tick.
    Deferred(String),
    /// Delivery failed; the video is retried next tick.
    SendFailed(String),
    /// A notification for this video id was delivered.
    Notified(String),
}

/// Polls the source channel and notifies on a new upload.
pub struct Poller {
    state: Arc<NotifierState>,
    source: Arc<dyn VideoSource>,
    channel: Arc<dyn Channel>,
    interval: Duration,
}

impl Poller {
    pub fn new(
        state: Arc<NotifierState>,
        source: Arc<dyn VideoSource>,
        channel: Arc<dyn Channel>,
        interval: Duration,
    ) -> Self {
        Self {
            state,
            source,
            channel,
            interval,
        }
    }

    /// Background task: tick, then sleep. Never returns.
    pub async fn run(self) {
        info!("poller: started, interval {}s", self.interval.as_secs());
        loop {
            match self.tick().await {
                TickOutcome::Paused => debug!("poller: paused"),
                TickOutcome::NoVideos => debug!("poller: source channel has no videos"),
                TickOutcome::Unchanged => debug!("poller: no new video"),
                TickOutcome::FetchFailed(_) => {}
                TickOutcome::Deferred(id) => {
                    warn!("poller: destination channel unavailable, {id} deferred")
                }
                TickOutcome::SendFailed(id) => warn!("poller: delivery of {id} failed, retrying"),
                TickOutcome::Notified(id) => info!("poller: notified new video {id}"),
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One fetch/compare/notify cycle.
    pub async fn tick(&self) -> TickOutcome {
        let settings = self.state.snapshot().await;
        if !settings.is_active() {
            return TickOutcome::Paused;
        }

        let video = match self.source.latest_video(&settings.source_channel).await {
            Ok(Some(v)) => v,
            Ok(None) => return TickOutcome::NoVideos,
            Err(e) => {
                match e {
                    NotifierError::QuotaExhausted { .. } | NotifierError::MissingCredentials => {
                        error!("poller: fetch failed: {e}")
                    }
                    _ => warn!("poller: fetch failed: {e}"),
                }
                return TickOutcome::FetchFailed(e.to_string());
            }
        };

        if video.id == settings.last_video {
            return TickOutcome::Unchanged;
        }

        if !self
            .channel
            .resolve_target(&settings.destination_channel)
            .await
        {
            return TickOutcome::Deferred(video.id);
        }

        let mut message = render(&video, &settings);
        message.reply_target = Some(settings.destination_channel.clone());
        if let Err(e) = self.channel.send(message).await {
            warn!("poller: send failed: {e}");
            return TickOutcome::SendFailed(video.id);
        }

        if let Err(e) = self
            .state
            .record_seen(&settings.source_channel, &video.id)
            .await
        {
            error!("poller: failed to persist last video {}: {e}", video.id);
        }
        TickOutcome::Notified(video.id)
    }
}
