//! Outgoing message conversion.

use serenity::all::{
    CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateMessage, Timestamp,
};
use ytnotify_core::message::{Embed, OutgoingMessage};

/// Discord's per-message content limit.
pub(crate) const MAX_CONTENT_LEN: usize = 2000;

/// Parse a raw id or a `<#id>` channel mention. Zero is not a valid id.
pub fn parse_channel_id(target: &str) -> Option<u64> {
    let trimmed = target.trim();
    let raw = trimmed
        .strip_prefix("<#")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(trimmed);
    raw.parse::<u64>().ok().filter(|id| *id != 0)
}

/// Build the Discord messages for `message`. The embed rides on the first one.
pub(crate) fn build_messages(message: &OutgoingMessage) -> Vec<CreateMessage> {
    let chunks = split_message(&message.text, MAX_CONTENT_LEN);
    let mut embed = message.embed.as_ref().map(to_create_embed);

    if chunks.is_empty() {
        return embed
            .map(|e| vec![CreateMessage::new().embed(e)])
            .unwrap_or_default();
    }

    chunks
        .into_iter()
        .map(|chunk| {
            let builder = CreateMessage::new().content(chunk);
            match embed.take() {
                Some(e) => builder.embed(e),
                None => builder,
            }
        })
        .collect()
}

pub(crate) fn to_create_embed(embed: &Embed) -> CreateEmbed {
    let mut out = CreateEmbed::new()
        .title(embed.title.as_str())
        .description(embed.description.as_str())
        .colour(embed.colour);

    if let Some(ref url) = embed.url {
        out = out.url(url.as_str());
    }
    if let Some(ref author) = embed.author {
        let mut a = CreateEmbedAuthor::new(author.name.as_str());
        if let Some(ref url) = author.url {
            a = a.url(url.as_str());
        }
        if let Some(ref icon) = author.icon_url {
            a = a.icon_url(icon.as_str());
        }
        out = out.author(a);
    }
    if let Some(ref image) = embed.image {
        out = out.image(image.as_str());
    }
    if let Some(ref footer) = embed.footer {
        out = out.footer(CreateEmbedFooter::new(footer.as_str()));
    }
    if let Some(ts) = embed
        .timestamp
        .and_then(|t| Timestamp::from_unix_timestamp(t.timestamp()).ok())
    {
        out = out.timestamp(ts);
    }
    out
}

/// Split on newlines where possible, never inside a UTF-8 character.
/// Empty text yields no chunks.
pub(crate) fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let break_at = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .map(|i| start + i + 1)
                .unwrap_or(end)
        } else {
            end
        };
        chunks.push(&text[start..break_at]);
        start = break_at;
    }

    chunks
}
