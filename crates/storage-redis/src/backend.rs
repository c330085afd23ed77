//! Redis implementation of [`HashStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use gateway_auth_storage::{FieldMap, HashStore, StorageError, StorageResult};
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use crate::{
    config::RedisBackendConfig,
    error::{Result, redis_error_to_storage_error},
};

/// [`HashStore`] backed by a Redis server.
///
/// Each logical hash maps to one Redis hash. Multi-field writes are a single
/// variadic `HSET`, which Redis applies atomically. The underlying
/// [`ConnectionManager`] reconnects on its own and is cheap to clone, so
/// `RedisHashStore` is too; clones share one multiplexed connection.
#[derive(Clone)]
pub struct RedisHashStore {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisHashStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisHashStore").finish_non_exhaustive()
    }
}

impl RedisHashStore {
    /// Connects to the server named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the initial
    /// connection cannot be established within the connection timeout.
    pub async fn new(config: RedisBackendConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::open(config.url())?;
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(config.connection_timeout())
            .set_response_timeout(config.response_timeout());
        let conn = ConnectionManager::new_with_config(client, manager_config).await?;

        tracing::debug!(url = %config.redacted_url(), "connected to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl HashStore for RedisHashStore {
    #[tracing::instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn hash_multi_set(&self, key: &str, fields: &FieldMap) -> StorageResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let items: Vec<(&str, &str)> =
            fields.iter().map(|(field, value)| (field.as_str(), value.as_str())).collect();

        let mut conn = self.conn.clone();
        let (): () =
            conn.hset_multiple(key, items.as_slice()).await.map_err(redis_error_to_storage_error)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, value))]
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> StorageResult<()> {
        let mut conn = self.conn.clone();
        let (): () = conn.hset(key, field, value).await.map_err(redis_error_to_storage_error)?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn hash_get(&self, key: &str, field: &str) -> StorageResult<String> {
        let mut conn = self.conn.clone();
        let value: Option<String> =
            conn.hget(key, field).await.map_err(redis_error_to_storage_error)?;
        value.ok_or_else(|| StorageError::field_not_found(key, field))
    }

    #[tracing::instrument(skip(self))]
    async fn hash_get_all(&self, key: &str) -> StorageResult<FieldMap> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> =
            conn.hgetall(key).await.map_err(redis_error_to_storage_error)?;

        // Redis reports a missing key as an empty hash.
        if fields.is_empty() {
            return Err(StorageError::not_found(key));
        }
        Ok(fields)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: &str) -> StorageResult<()> {
        let mut conn = self.conn.clone();
        let (): () = conn.del(key).await.map_err(redis_error_to_storage_error)?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn health_check(&self) -> StorageResult<()> {
        let mut conn = self.conn.clone();
        let reply: String =
            redis::cmd("PING").query_async(&mut conn).await.map_err(redis_error_to_storage_error)?;

        if reply != "PONG" {
            return Err(StorageError::internal(format!("unexpected PING reply: {reply}")));
        }
        Ok(())
    }
}
