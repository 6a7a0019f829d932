//! Shared notifier settings: one owned copy, every change persisted.

use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use ytnotify_core::{
    error::NotifierError,
    settings::{Settings, DOCUMENT_ID, PARTITION},
    traits::DocumentStore,
};

/// Settings shared by the poll loop and the command handlers.
pub struct NotifierState {
    store: Arc<dyn DocumentStore>,
    settings: Mutex<Settings>,
}

impl NotifierState {
    /// Load the settings document, writing the defaults on first run.
    pub async fn load(store: Arc<dyn DocumentStore>) -> Result<Self, NotifierError> {
        let settings = match store.find_one(PARTITION, DOCUMENT_ID).await? {
            Some(doc) => Settings::from_document(doc)?,
            None => {
                let defaults = Settings::default();
                store
                    .upsert(PARTITION, DOCUMENT_ID, defaults.to_fields())
                    .await?;
                info!("created default notifier settings");
                defaults
            }
        };

        Ok(Self {
            store,
            settings: Mutex::new(settings),
        })
    }

    pub async fn snapshot(&self) -> Settings {
        self.settings.lock().await.clone()
    }

    /// Apply `f`, stamp the update time and persist the whole record.
    ///
    /// The in-memory settings only change once the write succeeded.
    pub async fn update<F, R>(&self, f: F) -> Result<R, NotifierError>
    where
        F: FnOnce(&mut Settings) -> R,
    {
        let mut guard = self.settings.lock().await;
        let mut next = guard.clone();
        let out = f(&mut next);
        next.updated_at = Some(Utc::now());

        self.store
            .upsert(PARTITION, DOCUMENT_ID, next.to_fields())
            .await?;
        *guard = next;
        Ok(out)
    }

    /// Record `video_id` as notified for `source_channel`.
    ///
    /// Skipped when the source changed since the poll started, so a fresh
    /// `ytchannel` seed is never overwritten by the old channel's video.
    /// Memory is updated before the write; a failed write only loses persistence.
    pub async fn record_seen(
        &self,
        source_channel: &str,
        video_id: &str,
    ) -> Result<(), NotifierError> {
        let mut guard = self.settings.lock().await;
        if guard.source_channel != source_channel {
            debug!("source changed during poll, not recording {video_id}");
            return Ok(());
        }
        guard.last_video = video_id.to_string();

        let mut fields = Map::new();
        fields.insert("lastvideo".to_string(), Value::String(video_id.to_string()));
        self.store.upsert(PARTITION, DOCUMENT_ID, fields).await
    }
}
