//! Settings mutations: ytchannel, channel, message, toggle.

use super::CommandContext;
use tracing::{error, info};
use ytnotify_channels::discord::parse_channel_id;
use ytnotify_core::{error::NotifierError, message::OutgoingMessage};

const DONE: &str = "Done";
const CHECK_LOGS: &str = "Failed. Check Logs for more details";

/// Point the notifier at a YouTube channel and seed its current latest video.
pub(super) async fn handle_ytchannel(ctx: &CommandContext<'_>) -> OutgoingMessage {
    let channel_id = match ctx.args().split_whitespace().next() {
        Some(id) => id.to_string(),
        None => return ctx.reply(format!("Usage: {}ytnotifier ytchannel <channel id>", ctx.prefix)),
    };

    let details = match ctx.source.channel_details(&channel_id).await {
        Ok(d) => d,
        Err(NotifierError::MissingCredentials) => {
            error!("ytchannel: no YouTube API key configured");
            return ctx.reply("No YouTube API key configured.");
        }
        Err(e @ (NotifierError::Http { .. } | NotifierError::YouTube(_))) => {
            error!("ytchannel: channel lookup for {channel_id} failed: {e}");
            return ctx.reply("Request failed");
        }
        Err(e) => {
            error!("ytchannel: channel lookup for {channel_id} failed: {e}");
            return ctx.reply(CHECK_LOGS);
        }
    };

    let latest = match ctx.source.latest_video(&channel_id).await {
        Ok(Some(video)) => video.id,
        Ok(None) => String::new(),
        Err(e) => {
            error!("ytchannel: latest video lookup for {channel_id} failed: {e}");
            return ctx.reply(CHECK_LOGS);
        }
    };

    let result = ctx
        .state
        .update(|s| {
            s.source_channel = channel_id.clone();
            s.playlist = details.playlist_id.clone();
            s.icon_url = details.icon_url.clone();
            s.last_video = latest.clone();
        })
        .await;

    match result {
        Ok(()) => {
            info!("ytchannel: now watching {channel_id} (seeded with {latest:?})");
            ctx.reply(DONE)
        }
        Err(e) => {
            error!("ytchannel: failed to save settings: {e}");
            ctx.reply(CHECK_LOGS)
        }
    }
}

/// Set the Discord channel notifications go to.
pub(super) async fn handle_channel(ctx: &CommandContext<'_>) -> OutgoingMessage {
    let arg = ctx.args();
    if arg.is_empty() {
        return ctx.reply(format!("Usage: {}ytnotifier channel <#channel>", ctx.prefix));
    }
    let Some(id) = parse_channel_id(arg) else {
        return ctx.reply(format!("`{arg}` is not a channel."));
    };

    match ctx
        .state
        .update(|s| s.destination_channel = id.to_string())
        .await
    {
        Ok(()) => ctx.reply(DONE),
        Err(e) => {
            error!("channel: failed to save settings: {e}");
            ctx.reply(CHECK_LOGS)
        }
    }
}

/// Store the message template verbatim.
pub(super) async fn handle_message(ctx: &CommandContext<'_>) -> OutgoingMessage {
    let text = ctx.args();
    if text.is_empty() {
        return ctx.reply(format!(
            "Usage: {}ytnotifier message <text, {{url}} is replaced by the video link>",
            ctx.prefix
        ));
    }
    let text = text.to_string();

    match ctx.state.update(|s| s.message = text).await {
        Ok(()) => ctx.reply(DONE),
        Err(e) => {
            error!("message: failed to save settings: {e}");
            ctx.reply(CHECK_LOGS)
        }
    }
}

/// Flip the master switch.
pub(super) async fn handle_toggle(ctx: &CommandContext<'_>) -> OutgoingMessage {
    let result = ctx
        .state
        .update(|s| {
            s.enabled = !s.enabled;
            s.enabled
        })
        .await;

    match result {
        Ok(enabled) => ctx.reply(format!(
            "{} the notifications",
            if enabled { "Enabled" } else { "Disabled" }
        )),
        Err(e) => {
            error!("toggle: failed to save settings: {e}");
            ctx.reply(CHECK_LOGS)
        }
    }
}
