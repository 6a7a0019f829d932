//! YouTube Data API v3 client.
//!
//! Docs: <https://developers.google.com/youtube/v3/docs>

#[cfg(test)]
mod tests;

use crate::keys::KeyPool;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, warn};
use ytnotify_core::{
    error::NotifierError,
    traits::VideoSource,
    video::{ChannelDetails, Video},
};

/// Client for the two read-only endpoints the notifier needs.
pub struct YouTubeClient {
    client: reqwest::Client,
    base_url: String,
    keys: KeyPool,
}

// --- YouTube API types ---

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    published_at: String,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChannelsResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    content_details: Option<ContentDetails>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

impl YouTubeClient {
    /// Create a client against `base_url` (normally `https://www.googleapis.com/youtube/v3`).
    pub fn new(base_url: &str, keys: KeyPool) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            keys,
        }
    }

    /// Newest-first search for videos of `channel_id`.
    ///
    /// A 403 means the key's quota is spent: each key is tried at most once
    /// before giving up with [`NotifierError::QuotaExhausted`].
    pub async fn latest_video(&self, channel_id: &str) -> Result<Option<Video>, NotifierError> {
        if self.keys.is_empty() {
            return Err(NotifierError::MissingCredentials);
        }

        let sweep = self.keys.shuffled();
        let url = format!("{}/search", self.base_url);

        for (attempt, key) in sweep.iter().copied().enumerate() {
            debug!("youtube: GET {url} channel={channel_id} attempt={attempt}");
            let resp = self
                .client
                .get(&url)
                .header("Accept", "application/json")
                .query(&[
                    ("part", "snippet"),
                    ("type", "video"),
                    ("order", "date"),
                    ("safeSearch", "none"),
                    ("channelId", channel_id),
                    ("key", key),
                ])
                .send()
                .await
                .map_err(|e| NotifierError::YouTube(format!("search request failed: {e}")))?;

            let status = resp.status();
            if status == StatusCode::FORBIDDEN {
                if sweep.len() <= 1 {
                    error!("youtube: API quota reached and only one API key provided");
                    break;
                }
                warn!(
                    "youtube: API key {} of {} exhausted, trying another",
                    attempt + 1,
                    sweep.len()
                );
                continue;
            }
            if !status.is_success() {
                return Err(NotifierError::Http {
                    status: status.as_u16(),
                });
            }

            let body: SearchResponse = resp
                .json()
                .await
                .map_err(|e| NotifierError::YouTube(format!("search parse failed: {e}")))?;
            return first_video(body);
        }

        Err(NotifierError::QuotaExhausted { keys: sweep.len() })
    }

    /// Uploads playlist and default thumbnail of `channel_id`.
    pub async fn channel_details(&self, channel_id: &str) -> Result<ChannelDetails, NotifierError> {
        let key = self.keys.pick().ok_or(NotifierError::MissingCredentials)?;
        let url = format!("{}/channels", self.base_url);
        debug!("youtube: GET {url} id={channel_id}");

        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", channel_id),
                ("key", key),
            ])
            .send()
            .await
            .map_err(|e| NotifierError::YouTube(format!("channel request failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(NotifierError::Http {
                status: status.as_u16(),
            });
        }

        let body: ChannelsResponse = resp
            .json()
            .await
            .map_err(|e| NotifierError::Malformed(format!("channel response: {e}")))?;
        channel_from_response(body)
    }
}

/// First search hit as a [`Video`]. Items without a video id are malformed.
fn first_video(body: SearchResponse) -> Result<Option<Video>, NotifierError> {
    let Some(item) = body.items.into_iter().next() else {
        return Ok(None);
    };
    let id = item
        .id
        .video_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| NotifierError::Malformed("search item without videoId".into()))?;
    let snippet = item.snippet;
    Ok(Some(Video {
        id,
        title: snippet.title,
        description: snippet.description,
        channel_id: snippet.channel_id,
        channel_title: snippet.channel_title,
        published_at: snippet.published_at,
    }))
}

fn channel_from_response(body: ChannelsResponse) -> Result<ChannelDetails, NotifierError> {
    let item = body
        .items
        .into_iter()
        .next()
        .ok_or_else(|| NotifierError::Malformed("no channel with that id".into()))?;

    let playlist_id = item
        .content_details
        .and_then(|c| c.related_playlists)
        .and_then(|r| r.uploads)
        .ok_or_else(|| NotifierError::Malformed("missing uploads playlist".into()))?;

    let icon_url = item
        .snippet
        .and_then(|s| s.thumbnails)
        .and_then(|t| t.default)
        .map(|t| t.url)
        .ok_or_else(|| NotifierError::Malformed("missing default thumbnail".into()))?;

    Ok(ChannelDetails {
        playlist_id,
        icon_url,
    })
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn latest_video(&self, channel_id: &str) -> Result<Option<Video>, NotifierError> {
        YouTubeClient::latest_video(self, channel_id).await
    }

    async fn channel_details(&self, channel_id: &str) -> Result<ChannelDetails, NotifierError> {
        YouTubeClient::channel_details(self, channel_id).await
    }
}
