//! In-memory task collection kept in sync with persistence
//!
//! Every mutation holds the collection lock for its whole duration: the new
//! collection is staged, saved, and only then committed. A failed save
//! leaves the previous collection in place. Attachment cleanup runs after
//! the commit and never fails the operation.

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{Task, TaskForm};
use super::persistence::{KvTaskPersistence, TaskPersistence};
use crate::config::StoreConfig;
use crate::Result;

/// Task store with a single writer
pub struct TaskStore {
    persistence: Arc<dyn TaskPersistence>,
    tasks: Mutex<Vec<Task>>,
    loading: AtomicBool,
}

impl TaskStore {
    /// Create an empty store; call [`TaskStore::reload`] to read persisted tasks
    pub fn new(persistence: Arc<dyn TaskPersistence>) -> Self {
        Self {
            persistence,
            tasks: Mutex::new(Vec::new()),
            loading: AtomicBool::new(false),
        }
    }

    /// Create a store and load the persisted collection
    pub async fn open(persistence: Arc<dyn TaskPersistence>) -> Result<Self> {
        let store = Self::new(persistence);
        store.reload().await?;
        Ok(store)
    }

    /// Open the file-backed store described by `config`
    pub async fn open_with_config(config: &StoreConfig) -> Result<Self> {
        Self::open(Arc::new(KvTaskPersistence::from_config(config))).await
    }

    /// Whether a reload is in progress
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// On failure the current collection is kept.
    pub async fn reload(&self) -> Result<Vec<Task>> {
        let mut tasks = self.tasks.lock().await;
        self.loading.store(true, Ordering::SeqCst);
        let result = self.persistence.load().await;
        self.loading.store(false, Ordering::SeqCst);

        *tasks = result?;
        debug!("Reloaded {} tasks", tasks.len());
        Ok(tasks.clone())
    }

    /// Current collection, in insertion order
    pub async fn list_all(&self) -> Vec<Task> {
        self.tasks.lock().await.clone()
    }

    /// Get a task by ID
    pub async fn get(&self, id: &str) -> Option<Task> {
        self.tasks.lock().await.iter().find(|t| t.id == id).cloned()
    }

    /// Create a task from form data and append it to the collection
    pub async fn create(&self, form: TaskForm) -> Result<Task> {
        let mut tasks = self.tasks.lock().await;

        let now = now_millis();
        let id = unique_task_id(&tasks, now);
        let task = Task::from_form(id, form, now);

        let mut staged = tasks.clone();
        staged.push(task.clone());
        self.persistence.save(&staged).await?;
        *tasks = staged;

        info!("Created task {}", task.id);
        Ok(task)
    }

    /// Merge form data into an existing task.
    ///
    /// Returns `None` when no task has the given ID. A replaced or removed
    /// attachment file is deleted once the change is saved.
    pub async fn update(&self, id: &str, form: TaskForm) -> Result<Option<Task>> {
        let mut tasks = self.tasks.lock().await;

        let Some(index) = tasks.iter().position(|t| t.id == id) else {
            debug!("Update skipped, task {} not found", id);
            return Ok(None);
        };

        let old_uri = tasks[index].media_uri().map(str::to_string);
        let mut updated = tasks[index].clone();
        updated.apply_form(form, now_millis());

        let mut staged = tasks.clone();
        staged[index] = updated.clone();
        self.persistence.save(&staged).await?;
        *tasks = staged;

        if let Some(old_uri) = old_uri {
            if updated.media_uri() != Some(old_uri.as_str()) {
                self.persistence.delete_attachment(&old_uri).await;
            }
        }

        info!("Updated task {}", id);
        Ok(Some(updated))
    }

    /// Delete a task and its attachment file.
    ///
    /// Returns the removed task, or `None` when no task has the given ID.
    pub async fn delete(&self, id: &str) -> Result<Option<Task>> {
        let mut tasks = self.tasks.lock().await;

        let Some(index) = tasks.iter().position(|t| t.id == id) else {
            debug!("Delete skipped, task {} not found", id);
            return Ok(None);
        };

        let mut staged = tasks.clone();
        let removed = staged.remove(index);
        self.persistence.save(&staged).await?;
        *tasks = staged;

        if let Some(uri) = removed.media_uri() {
            self.persistence.delete_attachment(uri).await;
        }

        info!("Deleted task {}", id);
        Ok(Some(removed))
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn unique_task_id(tasks: &[Task], now: i64) -> String {
    loop {
        let suffix = Uuid::new_v4().simple().to_string();
        let id = format!("task-{}-{}", now, &suffix[..8]);
        if !tasks.iter().any(|t| t.id == id) {
            return id;
        }
    }
}
