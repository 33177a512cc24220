//! Record Store: user-scoped résumé records (key-value) plus their uploaded
//! files (blobs). Backends sit behind traits so tests can run in memory.
//!
//! Key layout: `user:{user_id}:resume:{id}` → JSON `StoredResumeRecord`.
//! Blob layout: `{user_id}/{id}/resume.{ext}`.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::resume::StoredResumeRecord;

#[cfg(test)]
pub mod memory;
pub mod redis_kv;
pub mod s3_blobs;

pub use redis_kv::RedisKv;
pub use s3_blobs::S3Blobs;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Blob store error: {0}")]
    Blob(String),

    #[error("Record {key} is unreadable: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Returns whether the key existed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
    /// `pattern` is a prefix followed by a single trailing `*`.
    async fn list(&self, pattern: &str) -> Result<Vec<(String, String)>, StoreError>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, path: &str, bytes: Bytes, content_type: &str) -> Result<(), StoreError>;
    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}

pub fn record_key(user_id: Uuid, id: Uuid) -> String {
    format!("user:{user_id}:resume:{id}")
}

pub fn record_pattern(user_id: Uuid) -> String {
    format!("user:{user_id}:resume:*")
}

pub fn resume_blob_path(user_id: Uuid, id: Uuid, extension: &str) -> String {
    format!("{user_id}/{id}/resume.{extension}")
}

/// Parses and validates one stored record.
pub fn parse_record(key: &str, raw: &str) -> Result<StoredResumeRecord, StoreError> {
    let record: StoredResumeRecord =
        serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    record
        .feedback
        .validate()
        .map_err(|reason| StoreError::Corrupt {
            key: key.to_string(),
            reason,
        })?;
    Ok(record)
}

#[derive(Clone)]
pub struct RecordStore {
    kv: Arc<dyn KeyValueStore>,
    blobs: Arc<dyn BlobStore>,
}

impl RecordStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { kv, blobs }
    }

    /// Uploads the résumé file to `record.resume_path`, then writes the
    /// record. If the record write fails the upload is removed again.
    pub async fn save(
        &self,
        user_id: Uuid,
        record: &StoredResumeRecord,
        file: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.blobs.put(&record.resume_path, file, content_type).await?;

        if let Err(e) = self.insert(user_id, record).await {
            if let Err(cleanup) = self.blobs.delete(&record.resume_path).await {
                warn!(
                    "Failed to remove orphaned upload {}: {cleanup}",
                    record.resume_path
                );
            }
            return Err(e);
        }
        Ok(())
    }

    pub async fn insert(
        &self,
        user_id: Uuid,
        record: &StoredResumeRecord,
    ) -> Result<(), StoreError> {
        let key = record_key(user_id, record.id);
        let value = serde_json::to_string(record)?;
        self.kv.set(&key, &value).await?;
        info!("Stored resume record {key}");
        Ok(())
    }

    pub async fn get(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<StoredResumeRecord>, StoreError> {
        let key = record_key(user_id, id);
        match self.kv.get(&key).await? {
            Some(raw) => parse_record(&key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// All readable records for a user, oldest first.
    /// Records that fail to parse or validate are skipped.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<StoredResumeRecord>, StoreError> {
        let entries = self.kv.list(&record_pattern(user_id)).await?;

        let mut records: Vec<_> = entries
            .iter()
            .filter_map(|(key, raw)| match parse_record(key, raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping record: {e}");
                    None
                }
            })
            .collect();

        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    /// Deletes the record, then its blobs. Blob failures are logged and
    /// swallowed; the record is gone either way. Returns false if the record
    /// did not exist.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let key = record_key(user_id, id);

        // Read first so the blob paths are known; an unreadable record is
        // still deleted, it just has no blobs to cascade to.
        let record = match self.kv.get(&key).await? {
            Some(raw) => parse_record(&key, &raw).ok(),
            None => return Ok(false),
        };

        let existed = self.kv.delete(&key).await?;

        if let Some(record) = record {
            for path in record.blob_paths() {
                if let Err(e) = self.blobs.delete(path).await {
                    warn!("Failed to delete blob {path} for {key}: {e}");
                }
            }
        }

        info!("Deleted resume record {key}");
        Ok(existed)
    }
}
