//! State storage implementation
//!
//! This module handles persistence of conversation state in Redis or in
//! process memory, including serialization, deserialization and expiration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::config::{StateBackendKind, StateConfig};
use crate::utils::errors::Result;
use super::context::ConversationContext;

/// Key-value store with per-key expiry holding serialized contexts
#[async_trait]
pub trait StateBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;

    /// Returns true when a key was removed
    async fn del(&self, key: &str) -> Result<bool>;
}

/// Redis-backed state, shared between bot instances
#[derive(Clone)]
pub struct RedisBackend {
    connection_manager: redis::aio::ConnectionManager,
}

impl RedisBackend {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self { connection_manager })
    }
}

#[async_trait]
impl StateBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection_manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection_manager.clone();
        let deleted: u32 = conn.del(key).await?;
        Ok(deleted > 0)
    }
}

/// In-process state for single-instance deployments and tests
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((_, deadline)) if Instant::now() >= *deadline => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(ttl_seconds);
        self.entries.lock().await.insert(key.to_string(), (value, deadline));
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().await.remove(key).is_some())
    }
}

/// Conversation state storage manager
#[derive(Clone)]
pub struct StateStorage {
    backend: Arc<dyn StateBackend>,
    prefix: String,
    ttl_seconds: u64,
}

impl StateStorage {
    /// Create a state storage for the configured backend
    pub async fn new(config: &StateConfig) -> Result<Self> {
        let backend: Arc<dyn StateBackend> = match config.backend {
            StateBackendKind::Redis => Arc::new(RedisBackend::connect(&config.redis_url).await?),
            StateBackendKind::Memory => Arc::new(MemoryBackend::new()),
        };

        Ok(Self::with_backend(backend, &config.prefix, config.ttl_seconds))
    }

    pub fn with_backend(backend: Arc<dyn StateBackend>, prefix: &str, ttl_seconds: u64) -> Self {
        Self {
            backend,
            prefix: prefix.to_string(),
            ttl_seconds,
        }
    }

    /// In-memory storage with default settings
    pub fn in_memory() -> Self {
        let config = StateConfig::default();
        Self::with_backend(Arc::new(MemoryBackend::new()), &config.prefix, config.ttl_seconds)
    }

    /// Save conversation context
    pub async fn save_context(&self, context: &ConversationContext) -> Result<()> {
        let key = self.get_context_key(context.user_id);
        debug!(user_id = context.user_id, key = %key, scenario = ?context.scenario,
               step = ?context.step, "Saving context");

        let serialized = serde_json::to_string(context).map_err(|e| {
            error!(user_id = context.user_id, error = %e, "Failed to serialize context");
            e
        })?;

        let ttl_seconds = if let Some(expires_at) = context.expires_at {
            let duration = expires_at - chrono::Utc::now();
            std::cmp::max(duration.num_seconds(), 60) as u64
        } else {
            self.ttl_seconds
        };

        self.backend.set_ex(&key, serialized, ttl_seconds).await.map_err(|e| {
            error!(user_id = context.user_id, error = %e, "Failed to save context");
            e
        })
    }

    /// Load conversation context; expired contexts are removed and reported absent
    pub async fn load_context(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        let key = self.get_context_key(user_id);

        let Some(data) = self.backend.get(&key).await? else {
            debug!(user_id = user_id, "No context found");
            return Ok(None);
        };

        let context: ConversationContext = serde_json::from_str(&data).map_err(|e| {
            error!(user_id = user_id, error = %e, "Failed to deserialize context");
            e
        })?;

        if context.is_expired() {
            warn!(user_id = user_id, expires_at = ?context.expires_at, "Context has expired, removing");
            self.delete_context(user_id).await?;
            return Ok(None);
        }

        debug!(user_id = user_id, scenario = ?context.scenario, step = ?context.step,
               "Context loaded successfully");
        Ok(Some(context))
    }

    /// Delete conversation context; returns true when one existed
    pub async fn delete_context(&self, user_id: i64) -> Result<bool> {
        let deleted = self.backend.del(&self.get_context_key(user_id)).await?;

        if deleted {
            debug!("Deleted context for user {}", user_id);
        } else {
            debug!("No context to delete for user {}", user_id);
        }

        Ok(deleted)
    }

    fn get_context_key(&self, user_id: i64) -> String {
        format!("{}context:{}", self.prefix, user_id)
    }
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStorage")
            .field("prefix", &self.prefix)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}
