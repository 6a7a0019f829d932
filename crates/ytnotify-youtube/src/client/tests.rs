use super::*;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const SEARCH_OK: &str = r#"{
  "items": [
    {
      "id": {"kind": "youtube#video", "videoId": "abc123"},
      "snippet": {
        "publishedAt": "2024-05-01T12:00:00Z",
        "channelId": "UCxyz",
        "title": "Newest",
        "description": "Line one\n\nLine two",
        "channelTitle": "Some Channel"
      }
    },
    {
      "id": {"kind": "youtube#video", "videoId": "older"},
      "snippet": {"title": "Older"}
    }
  ]
}"#;

const CHANNEL_OK: &str = r#"{
  "items": [
    {
      "snippet": {
        "title": "Some Channel",
        "thumbnails": {"default": {"url": "https://yt3.ggpht.com/icon.jpg"}}
      },
      "contentDetails": {"relatedPlaylists": {"likes": "", "uploads": "UUxyz"}}
    }
  ]
}"#;

/// Serve `responses` in order, one connection each, recording request lines.
async fn stub(responses: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let request = String::from_utf8_lossy(&buf);
            let line = request.lines().next().unwrap_or_default().to_string();
            log.lock().unwrap().push(line);

            let response = format!(
                "HTTP/1.1 {status} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}"), seen)
}

fn key_of(request_line: &str) -> String {
    request_line
        .split(|c: char| c == '?' || c == '&' || c == ' ')
        .find_map(|part| part.strip_prefix("key="))
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_latest_video_takes_first_item() {
    let (base, seen) = stub(vec![(200, SEARCH_OK)]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("k1"));

    let video = client.latest_video("UCxyz").await.unwrap().unwrap();
    assert_eq!(video.id, "abc123");
    assert_eq!(video.title, "Newest");
    assert_eq!(video.channel_title, "Some Channel");
    assert_eq!(video.published_at, "2024-05-01T12:00:00Z");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("GET /search?"));
    assert!(seen[0].contains("channelId=UCxyz"));
    assert!(seen[0].contains("order=date"));
    assert!(seen[0].contains("type=video"));
    assert_eq!(key_of(&seen[0]), "k1");
}

#[tokio::test]
async fn test_latest_video_empty_items() {
    let (base, _) = stub(vec![(200, r#"{"items": []}"#)]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("k1"));
    assert!(client.latest_video("UCxyz").await.unwrap().is_none());
}

#[tokio::test]
async fn test_latest_video_missing_video_id_is_malformed() {
    let (base, _) = stub(vec![(200, r#"{"items": [{"id": {"kind": "youtube#channel"}}]}"#)]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("k1"));
    let err = client.latest_video("UCxyz").await.unwrap_err();
    assert!(matches!(err, NotifierError::Malformed(_)));
}

#[tokio::test]
async fn test_quota_retries_with_a_different_key() {
    let (base, seen) = stub(vec![(403, "{}"), (200, SEARCH_OK)]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("k1,k2"));

    let video = client.latest_video("UCxyz").await.unwrap().unwrap();
    assert_eq!(video.id, "abc123");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_ne!(key_of(&seen[0]), key_of(&seen[1]));
}

#[tokio::test]
async fn test_quota_exhausted_after_one_attempt_per_key() {
    let (base, seen) = stub(vec![(403, "{}"), (403, "{}"), (403, "{}")]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("k1,k2,k3"));

    let err = client.latest_video("UCxyz").await.unwrap_err();
    assert!(matches!(err, NotifierError::QuotaExhausted { keys: 3 }));

    let seen = seen.lock().unwrap();
    let mut keys: Vec<String> = seen.iter().map(|l| key_of(l)).collect();
    keys.sort();
    assert_eq!(keys, vec!["k1", "k2", "k3"]);
}

#[tokio::test]
async fn test_quota_with_single_key_gives_up_immediately() {
    let (base, seen) = stub(vec![(403, "{}")]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("only"));

    let err = client.latest_video("UCxyz").await.unwrap_err();
    assert!(matches!(err, NotifierError::QuotaExhausted { keys: 1 }));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_other_status_is_http_error() {
    let (base, _) = stub(vec![(500, "oops")]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("k1,k2"));
    let err = client.latest_video("UCxyz").await.unwrap_err();
    assert!(matches!(err, NotifierError::Http { status: 500 }));
}

#[tokio::test]
async fn test_no_keys_makes_no_request() {
    let client = YouTubeClient::new("http://127.0.0.1:9", KeyPool::default());
    assert!(matches!(
        client.latest_video("UCxyz").await.unwrap_err(),
        NotifierError::MissingCredentials
    ));
    assert!(matches!(
        client.channel_details("UCxyz").await.unwrap_err(),
        NotifierError::MissingCredentials
    ));
}

#[tokio::test]
async fn test_channel_details() {
    let (base, seen) = stub(vec![(200, CHANNEL_OK)]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("k1"));

    let details = client.channel_details("UCxyz").await.unwrap();
    assert_eq!(details.playlist_id, "UUxyz");
    assert_eq!(details.icon_url, "https://yt3.ggpht.com/icon.jpg");

    let seen = seen.lock().unwrap();
    assert!(seen[0].starts_with("GET /channels?"));
    assert!(seen[0].contains("id=UCxyz"));
}

#[tokio::test]
async fn test_channel_details_unknown_channel_is_malformed() {
    let (base, _) = stub(vec![(200, r#"{"pageInfo": {"totalResults": 0}}"#)]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("k1"));
    let err = client.channel_details("UCnope").await.unwrap_err();
    assert!(matches!(err, NotifierError::Malformed(_)));
}

#[tokio::test]
async fn test_channel_details_missing_uploads_is_malformed() {
    let body = r#"{"items": [{"snippet": {"thumbnails": {"default": {"url": "u"}}}, "contentDetails": {}}]}"#;
    let (base, _) = stub(vec![(200, body)]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("k1"));
    let err = client.channel_details("UCxyz").await.unwrap_err();
    assert!(matches!(err, NotifierError::Malformed(_)));
}

#[tokio::test]
async fn test_channel_details_non_ok_status() {
    let (base, _) = stub(vec![(400, r#"{"error": {}}"#)]).await;
    let client = YouTubeClient::new(&base, KeyPool::parse("k1"));
    let err = client.channel_details("bad").await.unwrap_err();
    assert!(matches!(err, NotifierError::Http { status: 400 }));
}
