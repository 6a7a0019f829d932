//! Document CRUD: find-one and merge-upsert.

use super::Store;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;
use ytnotify_core::{error::NotifierError, traits::DocumentStore};

impl Store {
    /// Get a single document, with its id under `_id`.
    pub async fn find_document(
        &self,
        partition: &str,
        id: &str,
    ) -> Result<Option<Value>, NotifierError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE partition = ? AND id = ?")
                .bind(partition)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| NotifierError::Memory(format!("query failed: {e}")))?;

        let Some((body,)) = row else {
            return Ok(None);
        };

        let mut doc: Value = serde_json::from_str(&body)?;
        if let Value::Object(ref mut map) = doc {
            map.insert("_id".to_string(), Value::String(id.to_string()));
        }
        Ok(Some(doc))
    }

    /// Insert the document or overwrite the given top-level fields of the stored one.
    pub async fn upsert_document(
        &self,
        partition: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), NotifierError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| NotifierError::Memory(format!("begin failed: {e}")))?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE partition = ? AND id = ?")
                .bind(partition)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| NotifierError::Memory(format!("query failed: {e}")))?;

        let mut body = match existing {
            Some((raw,)) => match serde_json::from_str::<Value>(&raw)? {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            None => Map::new(),
        };
        let changed = fields.len();
        for (key, value) in fields {
            if key == "_id" {
                continue;
            }
            body.insert(key, value);
        }
        let serialized = serde_json::to_string(&Value::Object(body))?;

        sqlx::query(
            "INSERT INTO documents (partition, id, body) VALUES (?, ?, ?) \
             ON CONFLICT(partition, id) DO UPDATE SET body = excluded.body, updated_at = datetime('now')",
        )
        .bind(partition)
        .bind(id)
        .bind(&serialized)
        .execute(&mut *tx)
        .await
        .map_err(|e| NotifierError::Memory(format!("upsert document failed: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| NotifierError::Memory(format!("commit failed: {e}")))?;

        debug!("upserted {partition}/{id} ({changed} field(s))");
        Ok(())
    }

    /// Ids of every document in a partition, sorted.
    pub async fn document_ids(&self, partition: &str) -> Result<Vec<String>, NotifierError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM documents WHERE partition = ? ORDER BY id")
                .bind(partition)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| NotifierError::Memory(format!("query failed: {e}")))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

#[async_trait]
impl DocumentStore for Store {
    async fn find_one(&self, partition: &str, id: &str) -> Result<Option<Value>, NotifierError> {
        self.find_document(partition, id).await
    }

    async fn upsert(
        &self,
        partition: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), NotifierError> {
        self.upsert_document(partition, id, fields).await
    }
}
