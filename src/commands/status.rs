//! Read-only commands: help, status, test.

use super::CommandContext;
use crate::render::render;
use tracing::error;
use ytnotify_core::message::OutgoingMessage;

pub(super) fn help_text(prefix: &str) -> String {
    format!(
        "**YouTube notifier**\n\
         `{prefix}ytnotifier ytchannel <channel id>` set the YouTube channel to watch\n\
         `{prefix}ytnotifier channel <#channel>` set the channel notifications are sent to\n\
         `{prefix}ytnotifier message <text>` text sent with the embed, `{{url}}` becomes the video link\n\
         `{prefix}ytnotifier toggle` enable or disable notifications\n\
         `{prefix}ytnotifier test` send the latest video here\n\
         `{prefix}ytnotifier status` show the current settings"
    )
}

pub(super) async fn handle_status(ctx: &CommandContext<'_>) -> OutgoingMessage {
    let s = ctx.state.snapshot().await;
    let or_unset = |v: &str| {
        if v.is_empty() {
            "not set".to_string()
        } else {
            format!("`{v}`")
        }
    };
    let destination = if s.destination_channel.is_empty() {
        "not set".to_string()
    } else {
        format!("<#{}>", s.destination_channel)
    };
    let updated = s
        .updated_at
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    ctx.reply(format!(
        "**YouTube notifier** ({})\n\
         Enabled: {}\n\
         YouTube channel: {}\n\
         Uploads playlist: {}\n\
         Discord channel: {}\n\
         Last video: {}\n\
         Message: {}\n\
         Updated: {}",
        s.mode().display_name(),
        if s.enabled { "yes" } else { "no" },
        or_unset(&s.source_channel),
        or_unset(&s.playlist),
        destination,
        or_unset(&s.last_video),
        or_unset(&s.message),
        updated,
    ))
}

/// Render the current latest video into the invoking channel. Reads and
/// writes nothing but the fetch.
pub(super) async fn handle_test(ctx: &CommandContext<'_>) -> OutgoingMessage {
    let settings = ctx.state.snapshot().await;
    if settings.source_channel.is_empty() {
        return ctx.reply(format!(
            "No YouTube channel set. Use `{}ytnotifier ytchannel <channel id>` first.",
            ctx.prefix
        ));
    }

    match ctx.source.latest_video(&settings.source_channel).await {
        Ok(Some(video)) => {
            let mut message = render(&video, &settings);
            message.reply_target = ctx.incoming.reply_target.clone();
            message
        }
        Ok(None) => ctx.reply("No video available to test with."),
        Err(e) => {
            error!("test: fetch failed: {e}");
            ctx.reply("No video available to test with.")
        }
    }
}
