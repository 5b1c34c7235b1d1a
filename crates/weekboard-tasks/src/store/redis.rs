//! Redis storage backend for task persistence.
//!
//! [`RedisBackend`] implements [`StorageBackend`] on Redis. Reads use
//! `HGETALL`; writes are Lua scripts (`redis::Script`) that update the
//! record hash and its prefix index in a single round-trip.
//!
//! # Key Schema
//!
//! | Key Pattern | Type | Purpose |
//! |-------------|------|---------|
//! | `{namespace}:{key}` | Hash | Record storage (`version`, `data`) |
//! | `{namespace}:idx:{segment}` | Sorted Set | Index of keys starting with `{segment}:` |
//!
//! `{segment}` is the part of the storage key before its first `:`, so every
//! `task:{id}` key lands in the `{namespace}:idx:task` index. Index members
//! are full storage keys scored by the record's `createdAt` in epoch
//! milliseconds.
//!
//! # Usage
//!
//! ```rust,no_run
//! use weekboard_tasks::store::redis::RedisBackend;
//! use weekboard_tasks::store::generic::GenericTaskStore;
//!
//! # async fn example() {
//! let backend = RedisBackend::new("redis://127.0.0.1:6379").await.unwrap();
//! let store = GenericTaskStore::new(backend);
//! # }
//! ```

use std::collections::HashMap;

use ::redis::aio::MultiplexedConnection;
use ::redis::{AsyncCommands, Script};
use async_trait::async_trait;

use crate::store::backend::{StorageBackend, StorageError, VersionedRecord};

/// Default namespace for every Redis key this backend touches.
pub const DEFAULT_NAMESPACE: &str = "weekboard";

// ---------------------------------------------------------------------------
// Lua script constants
// ---------------------------------------------------------------------------

/// Unconditional put: update hash, maintain index.
///
/// KEYS[1] = record hash key, KEYS[2] = index sorted set key.
/// ARGV[1] = data, ARGV[2] = storage key (index member), ARGV[3] = score.
/// Returns: new version number.
const LUA_PUT: &str = r#"
local current_version = redis.call('HGET', KEYS[1], 'version')
local new_version
if current_version then
    new_version = tonumber(current_version) + 1
else
    new_version = 1
end

redis.call('HSET', KEYS[1], 'version', tostring(new_version), 'data', ARGV[1])
redis.call('ZADD', KEYS[2], 'NX', tonumber(ARGV[3]), ARGV[2])

return new_version
"#;

/// Conditional put (CAS).
///
/// KEYS[1] = record hash key.
/// ARGV[1] = data, ARGV[2] = expected version.
/// Returns: {status, value} where status 1=success, 0=mismatch, -1=missing.
const LUA_PUT_IF_VERSION: &str = r#"
local current_version = redis.call('HGET', KEYS[1], 'version')
if not current_version then
    return {-1, 0}
end

local actual = tonumber(current_version)
if actual ~= tonumber(ARGV[2]) then
    return {0, actual}
end

local new_version = actual + 1
redis.call('HSET', KEYS[1], 'version', tostring(new_version), 'data', ARGV[1])
return {1, new_version}
"#;

/// Delete: remove hash and index entry.
///
/// KEYS[1] = record hash key, KEYS[2] = index sorted set key.
/// ARGV[1] = storage key (index member).
/// Returns: 1 if the key existed, 0 otherwise.
const LUA_DELETE: &str = r#"
local existed = redis.call('DEL', KEYS[1])
redis.call('ZREM', KEYS[2], ARGV[1])
return existed
"#;

/// Redis storage backend.
///
/// Holds a [`MultiplexedConnection`], which is cheap to clone; every method
/// clones it so calls may run concurrently.
#[derive(Debug, Clone)]
pub struct RedisBackend {
    conn: MultiplexedConnection,
    namespace: String,
}

impl RedisBackend {
    /// Connects to Redis at `url` (`redis://[:<password>@]<host>:<port>[/<db>]`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the client cannot be created or
    /// the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self, StorageError> {
        let client = ::redis::Client::open(url)
            .map_err(|e| StorageError::backend(format!("failed to create Redis client: {e}"), e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StorageError::backend(format!("failed to connect to Redis: {e}"), e))?;
        tracing::info!(namespace = DEFAULT_NAMESPACE, "connected to Redis");
        Ok(Self::with_connection(conn))
    }

    /// Creates a backend over an existing multiplexed connection.
    pub fn with_connection(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Sets the key namespace. Distinct namespaces never see each other's
    /// records.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    fn record_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    fn index_key(&self, segment: &str) -> String {
        format!("{}:idx:{}", self.namespace, segment)
    }
}

/// Returns the part of `key` before its first `:`.
fn key_segment(key: &str) -> Result<&str, StorageError> {
    key.split_once(':')
        .map(|(segment, _)| segment)
        .ok_or_else(|| StorageError::Backend {
            message: format!("invalid key format (missing ':'): {key}"),
            source: None,
        })
}

/// Extracts `createdAt` as epoch milliseconds for index scoring.
fn extract_created_at_ms(data: &[u8]) -> Option<i64> {
    let value: serde_json::Value = serde_json::from_slice(data).ok()?;
    let created_at = value.get("createdAt")?.as_str()?;
    let dt = chrono::DateTime::parse_from_rfc3339(created_at).ok()?;
    Some(dt.timestamp_millis())
}

fn utf8(data: &[u8]) -> Result<&str, StorageError> {
    std::str::from_utf8(data)
        .map_err(|e| StorageError::backend(format!("data is not valid UTF-8: {e}"), e))
}

fn map_redis_error(err: ::redis::RedisError, key: &str) -> StorageError {
    StorageError::backend(format!("Redis error for key {key}: {err}"), err)
}

fn parse_record(fields: &HashMap<String, String>, key: &str) -> Result<VersionedRecord, StorageError> {
    let version: u64 = fields
        .get("version")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| StorageError::Backend {
            message: format!("missing or invalid version field for key {key}"),
            source: None,
        })?;
    let data = fields.get("data").ok_or_else(|| StorageError::Backend {
        message: format!("missing data field for key {key}"),
        source: None,
    })?;
    Ok(VersionedRecord {
        data: data.as_bytes().to_vec(),
        version,
    })
}

#[async_trait]
impl StorageBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<VersionedRecord, StorageError> {
        let fields: HashMap<String, String> = self
            .conn
            .clone()
            .hgetall(self.record_key(key))
            .await
            .map_err(|e| map_redis_error(e, key))?;

        if fields.is_empty() {
            return Err(StorageError::NotFound {
                key: key.to_string(),
            });
        }
        parse_record(&fields, key)
    }

    async fn put(&self, key: &str, data: &[u8]) -> Result<u64, StorageError> {
        let segment = key_segment(key)?;
        let score = extract_created_at_ms(data).unwrap_or(0);

        Script::new(LUA_PUT)
            .key(self.record_key(key))
            .key(self.index_key(segment))
            .arg(utf8(data)?)
            .arg(key)
            .arg(score)
            .invoke_async(&mut self.conn.clone())
            .await
            .map_err(|e| map_redis_error(e, key))
    }

    async fn put_if_version(
        &self,
        key: &str,
        data: &[u8],
        expected_version: u64,
    ) -> Result<u64, StorageError> {
        let (status, value): (i64, i64) = Script::new(LUA_PUT_IF_VERSION)
            .key(self.record_key(key))
            .arg(utf8(data)?)
            .arg(expected_version)
            .invoke_async(&mut self.conn.clone())
            .await
            .map_err(|e| map_redis_error(e, key))?;

        match status {
            1 => Ok(value.unsigned_abs()),
            0 => Err(StorageError::VersionConflict {
                key: key.to_string(),
                expected: expected_version,
                actual: value.unsigned_abs(),
            }),
            _ => Err(StorageError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let segment = key_segment(key)?;
        let existed: i64 = Script::new(LUA_DELETE)
            .key(self.record_key(key))
            .key(self.index_key(segment))
            .arg(key)
            .invoke_async(&mut self.conn.clone())
            .await
            .map_err(|e| map_redis_error(e, key))?;
        Ok(existed > 0)
    }

    async fn list_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, VersionedRecord)>, StorageError> {
        let idx_key = self.index_key(key_segment(prefix)?);
        let members: Vec<String> = self
            .conn
            .clone()
            .zrange(&idx_key, 0, -1)
            .await
            .map_err(|e| map_redis_error(e, prefix))?;

        let mut results = Vec::with_capacity(members.len());
        let mut orphaned: Vec<String> = Vec::new();
        for key in members.into_iter().filter(|k| k.starts_with(prefix)) {
            let fields: HashMap<String, String> = self
                .conn
                .clone()
                .hgetall(self.record_key(&key))
                .await
                .map_err(|e| map_redis_error(e, &key))?;
            if fields.is_empty() {
                orphaned.push(key);
                continue;
            }
            let record = parse_record(&fields, &key)?;
            results.push((key, record));
        }

        if !orphaned.is_empty() {
            tracing::debug!(count = orphaned.len(), "pruning orphaned index entries");
            let pruned: Result<(), ::redis::RedisError> =
                self.conn.clone().zrem(&idx_key, &orphaned).await;
            if let Err(e) = pruned {
                tracing::warn!(error = %e, "failed to prune orphaned index entries");
            }
        }

        Ok(results)
    }
}
