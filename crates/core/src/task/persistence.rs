//! Task collection persistence
//!
//! The whole collection is stored as one JSON array under a single key.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use super::model::Task;
use crate::config::{StoreConfig, TASKS_KEY};
use crate::storage::{delete_local_file, FileKeyValueStore, KeyValueStore};
use crate::{Error, Result};

/// Persistence interface used by the task store
#[async_trait]
pub trait TaskPersistence: Send + Sync {
    /// Overwrite the stored collection
    async fn save(&self, tasks: &[Task]) -> Result<()>;

    /// Load the stored collection; empty when nothing has been stored yet
    async fn load(&self) -> Result<Vec<Task>>;

    /// Remove an attachment file. Never fails.
    async fn delete_attachment(&self, uri: &str);
}

/// Task persistence on top of a key-value store
pub struct KvTaskPersistence {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl KvTaskPersistence {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// File-backed persistence under the configured data directory
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(Arc::new(FileKeyValueStore::new(config.kv_dir())), TASKS_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl TaskPersistence for KvTaskPersistence {
    async fn save(&self, tasks: &[Task]) -> Result<()> {
        let content = serde_json::to_string(tasks).map_err(|e| {
            Error::persistence(format!("Failed to serialize tasks: {}", e))
        })?;

        if let Err(e) = self.kv.set(&self.key, &content).await {
            error!("Failed to save tasks: {}", e);
            return Err(e);
        }

        debug!("Saved {} tasks under {}", tasks.len(), self.key);
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Task>> {
        let content = match self.kv.get(&self.key).await {
            Ok(Some(content)) => content,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => {
                error!("Failed to load tasks: {}", e);
                return Err(e);
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tasks: Vec<Task> =
            serde_json::from_str(&content).map_err(|e| Error::CorruptCollection {
                key: self.key.clone(),
                reason: e.to_string(),
            })?;

        debug!("Loaded {} tasks from {}", tasks.len(), self.key);
        Ok(tasks)
    }

    async fn delete_attachment(&self, uri: &str) {
        delete_local_file(uri).await;
    }
}
