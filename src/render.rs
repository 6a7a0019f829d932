//! Notification rendering.

use chrono::{DateTime, Utc};
use tracing::debug;
use ytnotify_core::{
    message::{Embed, EmbedAuthor, OutgoingMessage},
    settings::Settings,
    video::Video,
};

/// YouTube red.
pub const EMBED_COLOUR: u32 = 0xC4302B;

const FOOTER: &str = "Uploaded ";

/// Replace every literal `{url}` in `template`. An empty template renders as a single space.
pub fn apply_template(template: &str, url: &str) -> String {
    if template.is_empty() {
        " ".to_string()
    } else {
        template.replace("{url}", url)
    }
}

/// Text before the first blank line.
pub fn truncate_description(description: &str) -> &str {
    description
        .split("\n\n")
        .next()
        .unwrap_or(description)
}

/// Build the notification for `video` with the stored template and icon.
/// The caller sets `reply_target`.
pub fn render(video: &Video, settings: &Settings) -> OutgoingMessage {
    let url = video.watch_url();

    let timestamp = match DateTime::parse_from_rfc3339(&video.published_at) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            debug!(
                "unparsable publishedAt {:?} on {}: {e}",
                video.published_at, video.id
            );
            None
        }
    };

    let embed = Embed {
        title: video.title.clone(),
        url: Some(url.clone()),
        description: truncate_description(&video.description).to_string(),
        colour: EMBED_COLOUR,
        author: Some(EmbedAuthor {
            name: video.channel_title.clone(),
            url: (!video.channel_id.is_empty()).then(|| video.channel_url()),
            icon_url: (!settings.icon_url.is_empty()).then(|| settings.icon_url.clone()),
        }),
        image: (!video.id.is_empty()).then(|| video.thumbnail_url()),
        footer: Some(FOOTER.to_string()),
        timestamp,
    };

    OutgoingMessage {
        text: apply_template(&settings.message, &url),
        embed: Some(embed),
        reply_target: None,
    }
}
