//! In-memory backends for tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::{BlobStore, KeyValueStore, StoreError};

#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<BTreeMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn list(&self, pattern: &str) -> Result<Vec<(String, String)>, StoreError> {
        let prefix = pattern.strip_suffix('*').unwrap_or(pattern);
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryBlobs {
    blobs: Mutex<HashMap<String, Bytes>>,
    fail_deletes: AtomicBool,
}

impl MemoryBlobs {
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobs {
    async fn put(&self, path: &str, bytes: Bytes, _content_type: &str) -> Result<(), StoreError> {
        self.blobs.lock().unwrap().insert(path.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Blob(format!("refusing to delete {path}")));
        }
        self.blobs.lock().unwrap().remove(path);
        Ok(())
    }
}
