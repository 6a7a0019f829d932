//! In-process fakes for the channel, video source and document store.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use ytnotify_core::{
    error::NotifierError,
    message::{IncomingMessage, OutgoingMessage},
    traits::{Channel, DocumentStore, VideoSource},
    video::{ChannelDetails, Video},
};

pub fn video(id: &str) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {id}"),
        description: "First paragraph\n\nSecond paragraph".to_string(),
        channel_id: "UCsource".to_string(),
        channel_title: "Source Channel".to_string(),
        published_at: "2024-05-01T12:00:00Z".to_string(),
    }
}

/// Single-document store counting writes.
#[derive(Default)]
pub struct MemoryDocs {
    doc: Mutex<Option<Map<String, Value>>>,
    last_fields: Mutex<Option<Map<String, Value>>>,
    writes: AtomicUsize,
    fail: AtomicBool,
}

impl MemoryDocs {
    pub fn with_document(doc: Value) -> Self {
        let docs = Self::default();
        if let Value::Object(map) = doc {
            *docs.doc.lock().unwrap() = Some(map);
        }
        docs
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn document(&self) -> Option<Map<String, Value>> {
        self.doc.lock().unwrap().clone()
    }

    /// Fields passed to the most recent upsert.
    pub fn last_fields(&self) -> Option<Map<String, Value>> {
        self.last_fields.lock().unwrap().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocs {
    async fn find_one(&self, _partition: &str, _id: &str) -> Result<Option<Value>, NotifierError> {
        Ok(self.doc.lock().unwrap().clone().map(Value::Object))
    }

    async fn upsert(
        &self,
        _partition: &str,
        _id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), NotifierError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifierError::Memory("write refused".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut doc = self.doc.lock().unwrap();
        let body = doc.get_or_insert_with(Map::new);
        for (k, v) in &fields {
            body.insert(k.clone(), v.clone());
        }
        *self.last_fields.lock().unwrap() = Some(fields);
        Ok(())
    }
}

/// What [`FakeSource::latest_video`] answers.
#[derive(Clone)]
pub enum Latest {
    Video(Video),
    Empty,
    Quota,
    Fail,
}

/// What [`FakeSource::channel_details`] answers.
#[derive(Clone)]
pub enum Details {
    Found(ChannelDetails),
    Malformed,
    NoKeys,
    Http(u16),
    Transport,
}

pub struct FakeSource {
    latest: Mutex<Latest>,
    details: Mutex<Details>,
    pub latest_calls: AtomicUsize,
    pub details_calls: AtomicUsize,
    pub last_channel: Mutex<Option<String>>,
}

impl FakeSource {
    pub fn new(latest: Latest) -> Self {
        Self {
            latest: Mutex::new(latest),
            details: Mutex::new(Details::Found(ChannelDetails {
                playlist_id: "UUsource".to_string(),
                icon_url: "https://yt3.ggpht.com/icon.jpg".to_string(),
            })),
            latest_calls: AtomicUsize::new(0),
            details_calls: AtomicUsize::new(0),
            last_channel: Mutex::new(None),
        }
    }

    pub fn set_latest(&self, latest: Latest) {
        *self.latest.lock().unwrap() = latest;
    }

    pub fn set_details(&self, details: Details) {
        *self.details.lock().unwrap() = details;
    }

    pub fn calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst) + self.details_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoSource for FakeSource {
    async fn latest_video(&self, channel_id: &str) -> Result<Option<Video>, NotifierError> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_channel.lock().unwrap() = Some(channel_id.to_string());
        match self.latest.lock().unwrap().clone() {
            Latest::Video(v) => Ok(Some(v)),
            Latest::Empty => Ok(None),
            Latest::Quota => Err(NotifierError::QuotaExhausted { keys: 2 }),
            Latest::Fail => Err(NotifierError::YouTube("connection reset".into())),
        }
    }

    async fn channel_details(&self, _channel_id: &str) -> Result<ChannelDetails, NotifierError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        match self.details.lock().unwrap().clone() {
            Details::Found(d) => Ok(d),
            Details::Malformed => Err(NotifierError::Malformed("missing uploads playlist".into())),
            Details::NoKeys => Err(NotifierError::MissingCredentials),
            Details::Http(status) => Err(NotifierError::Http { status }),
            Details::Transport => Err(NotifierError::YouTube("connection reset".into())),
        }
    }
}

pub struct FakeChannel {
    pub sent: Mutex<Vec<OutgoingMessage>>,
    resolvable: AtomicBool,
    fail_send: AtomicBool,
    pub resolve_calls: AtomicUsize,
}

impl Default for FakeChannel {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            resolvable: AtomicBool::new(true),
            fail_send: AtomicBool::new(false),
            resolve_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeChannel {
    pub fn set_resolvable(&self, resolvable: bool) {
        self.resolvable.store(resolvable, Ordering::SeqCst);
    }

    pub fn set_fail_send(&self, fail: bool) {
        self.fail_send.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for FakeChannel {
    fn name(&self) -> &str {
        "fake"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, NotifierError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), NotifierError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(NotifierError::Channel("send refused".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn resolve_target(&self, _target: &str) -> bool {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.resolvable.load(Ordering::SeqCst)
    }

    async fn stop(&self) -> Result<(), NotifierError> {
        Ok(())
    }
}

/// Command message as the Discord channel would forward it.
pub fn incoming(text: &str, guild: bool, admin: bool) -> IncomingMessage {
    IncomingMessage {
        id: uuid::Uuid::new_v4(),
        channel: "discord".to_string(),
        sender_id: "1001".to_string(),
        sender_name: Some("moderator".to_string()),
        text: text.to_string(),
        timestamp: chrono::Utc::now(),
        reply_target: Some("555".to_string()),
        guild_id: guild.then(|| "777".to_string()),
        is_admin: admin,
    }
}
