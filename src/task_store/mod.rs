//! Confirmed-task storage with pluggable backends.
//!
//! Supports:
//! - `memory`: In-memory storage (non-persistent, for testing)
//! - `file`: a single named JSON entry holding the whole task list
//!
//! The list is always written in full; there are no partial updates,
//! migrations or schema versions.

mod file;
mod memory;

pub use file::FileTaskStore;
pub use memory::InMemoryTaskStore;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::draft::{TaskDraft, TaskRequest};

/// Entry name used when none is configured.
pub const DEFAULT_ENTRY: &str = "tasks";

/// A confirmed task: the accepted draft together with the request it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Creation time in milliseconds since the Unix epoch
    pub id: String,
    pub task_title: String,
    pub task_description: String,
    pub request_title: String,
    pub request_description: String,
    /// RFC 3339 timestamp, millisecond precision, UTC
    pub submission_date: String,
}

impl Task {
    /// Combine a request and its accepted draft, stamped with `submitted_at`.
    pub fn from_draft(request: &TaskRequest, draft: &TaskDraft, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: submitted_at.timestamp_millis().to_string(),
            task_title: draft.title.clone(),
            task_description: draft.description.clone(),
            request_title: request.title.clone(),
            request_description: request.description.clone(),
            submission_date: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to {action} task store {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize task list: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Sanitize an entry name for use as a filename.
pub fn sanitize_entry_name(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        DEFAULT_ENTRY.to_string()
    } else {
        out
    }
}

/// Task store trait - implemented by all storage backends.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Whether this store persists data across restarts.
    fn is_persistent(&self) -> bool;

    /// Read the whole task list, in insertion order.
    async fn load(&self) -> Result<Vec<Task>, StorageError>;

    /// Replace the stored list with `tasks`.
    async fn save(&self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// Task store type selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    Memory,
    #[default]
    File,
}

impl StoreType {
    /// Parse from environment variable value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "file" | "json" => Some(Self::File),
            _ => None,
        }
    }
}

/// Create a task store based on type and configuration.
pub async fn create_task_store(
    store_type: StoreType,
    base_dir: PathBuf,
    entry: &str,
) -> Result<Box<dyn TaskStore>, StorageError> {
    match store_type {
        StoreType::Memory => Ok(Box::new(InMemoryTaskStore::new())),
        StoreType::File => {
            let store = FileTaskStore::new(base_dir, entry).await?;
            Ok(Box::new(store))
        }
    }
}
