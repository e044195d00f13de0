//! Task model definitions
//!
//! The stored format is a flat camelCase record (`mediaUri` / `mediaType`),
//! while in memory the attachment is a single optional value so that a
//! reference can never exist without its kind.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Kind of media attached to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A photo or video attached to a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub kind: MediaKind,
    /// Stable reference to the file, normally a `file://` URI
    pub uri: String,
}

impl Attachment {
    pub fn new(kind: MediaKind, uri: impl Into<String>) -> Self {
        Self {
            kind,
            uri: uri.into(),
        }
    }

    pub fn image(uri: impl Into<String>) -> Self {
        Self::new(MediaKind::Image, uri)
    }

    pub fn video(uri: impl Into<String>) -> Self {
        Self::new(MediaKind::Video, uri)
    }
}

/// A user task with an optional media attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub attachment: Option<Attachment>,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    /// Milliseconds since the Unix epoch, set on every edit
    pub updated_at: Option<i64>,
}

impl Task {
    /// Create a task from submitted form data
    pub fn from_form(id: impl Into<String>, form: TaskForm, now: i64) -> Self {
        Self {
            id: id.into(),
            title: form.title,
            description: form.description,
            attachment: form.attachment,
            created_at: now,
            updated_at: None,
        }
    }

    /// Merge form data into this task and stamp `updated_at`.
    ///
    /// The stamp is strictly greater than the previous modification time,
    /// even when the wall clock has not advanced or went backwards.
    pub fn apply_form(&mut self, form: TaskForm, now: i64) {
        self.title = form.title;
        self.description = form.description;
        self.attachment = form.attachment;
        self.updated_at = Some(now.max(self.last_modified().saturating_add(1)));
    }

    /// Latest of `created_at` and `updated_at`
    pub fn last_modified(&self) -> i64 {
        self.updated_at.unwrap_or(self.created_at)
    }

    pub fn media_uri(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.uri.as_str())
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        self.attachment.as_ref().map(|a| a.kind)
    }
}

/// Editable fields of a task, as submitted by a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: Option<String>,
    pub attachment: Option<Attachment>,
}

impl TaskForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the attachment
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Boundary check run before the form reaches the store
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("Title is required"));
        }
        Ok(())
    }
}

impl From<&Task> for TaskForm {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            attachment: task.attachment.clone(),
        }
    }
}

/// On-disk shape of a task
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_type: Option<MediaKind>,
    created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<i64>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = String;

    fn try_from(record: TaskRecord) -> std::result::Result<Self, Self::Error> {
        let media_uri = record.media_uri.filter(|uri| !uri.is_empty());
        let attachment = match (media_uri, record.media_type) {
            (Some(uri), Some(kind)) => Some(Attachment { kind, uri }),
            (Some(_), None) => {
                return Err(format!("task {} has mediaUri without mediaType", record.id));
            }
            // A kind with nothing to point at carries no information
            (None, _) => None,
        };

        Ok(Self {
            id: record.id,
            title: record.title,
            description: record.description,
            attachment,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        let (media_uri, media_type) = match task.attachment {
            Some(Attachment { kind, uri }) => (Some(uri), Some(kind)),
            None => (None, None),
        };

        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            media_uri,
            media_type,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
