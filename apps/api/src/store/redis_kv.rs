use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use super::{KeyValueStore, StoreError};

const SCAN_BATCH: usize = 100;

/// Key-value backend on Redis. Each call takes a multiplexed connection from
/// the client, so the backend is cheap to share across handlers.
pub struct RedisKv {
    client: redis::Client,
}

impl RedisKv {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl KeyValueStore for RedisKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut con = self.connection().await?;
        Ok(con.get::<_, Option<String>>(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        con.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut con = self.connection().await?;
        let removed: i64 = con.del(key).await?;
        Ok(removed > 0)
    }

    async fn list(&self, pattern: &str) -> Result<Vec<(String, String)>, StoreError> {
        let mut con = self.connection().await?;

        // SCAN instead of KEYS so a large keyspace never blocks the server.
        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut con)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once
        keys.sort();
        keys.dedup();

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut con)
            .await?;

        debug!("Listed {} keys matching {pattern}", keys.len());

        // keys deleted between SCAN and MGET come back as nil
        Ok(keys
            .into_iter()
            .zip(values)
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect())
    }
}
