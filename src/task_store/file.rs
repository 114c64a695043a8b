//! JSON file-based task store.
//!
//! The named entry lives at `<base_dir>/<entry>.json` and holds the task
//! array. An unreadable entry is set aside as `<entry>.json.corrupt` (or
//! `<entry>.json.corrupt.<n>` when earlier copies exist; none is ever
//! replaced) and the store starts over from an empty list.

use super::{sanitize_entry_name, StorageError, Task, TaskStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct FileTaskStore {
    path: PathBuf,
    persist_lock: Arc<Mutex<()>>,
}

impl FileTaskStore {
    pub async fn new(base_dir: PathBuf, entry: &str) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|source| StorageError::Io {
                action: "create directory for",
                path: base_dir.clone(),
                source,
            })?;
        let filename = format!("{}.json", sanitize_entry_name(entry));
        Ok(Self {
            path: base_dir.join(filename),
            persist_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First free name among `<entry>.json.corrupt`, `<entry>.json.corrupt.1`, ...
    async fn free_corrupt_path(&self) -> PathBuf {
        let mut candidate = self.path.with_extension("json.corrupt");
        let mut n = 0u32;
        while matches!(fs::try_exists(&candidate).await, Ok(true)) {
            n += 1;
            candidate = self.path.with_extension(format!("json.corrupt.{}", n));
        }
        candidate
    }

    async fn quarantine(&self) {
        let corrupt_path = self.free_corrupt_path().await;
        match fs::rename(&self.path, &corrupt_path).await {
            Ok(()) => tracing::warn!(
                "Moved unreadable task store to {}",
                corrupt_path.display()
            ),
            Err(e) => tracing::warn!(
                "Failed to set aside unreadable task store {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

#[async_trait]
impl TaskStore for FileTaskStore {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn load(&self) -> Result<Vec<Task>, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    action: "read",
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_slice::<Vec<Task>>(&bytes) {
            Ok(tasks) => {
                tracing::debug!("Loaded {} tasks from {}", tasks.len(), self.path.display());
                Ok(tasks)
            }
            Err(e) => {
                tracing::warn!("Failed to parse task store {}: {}", self.path.display(), e);
                self.quarantine().await;
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let _guard = self.persist_lock.lock().await;
        let data = serde_json::to_vec_pretty(tasks)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data)
            .await
            .map_err(|source| StorageError::Io {
                action: "write",
                path: tmp_path.clone(),
                source,
            })?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StorageError::Io {
                action: "finalize",
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            task_title: format!("{} - Comprehensive Action Plan", title),
            task_description: "## Overview\nsomething".to_string(),
            request_title: title.to_string(),
            request_description: "something".to_string(),
            submission_date: "2026-10-17T09:30:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_entry_loads_empty() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FileTaskStore::new(temp.path().to_path_buf(), "tasks")
            .await
            .unwrap();
        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.path(), temp.path().join("tasks.json"));
    }

    #[tokio::test]
    async fn save_overwrites_whole_list_and_reloads_in_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FileTaskStore::new(temp.path().to_path_buf(), "tasks")
            .await
            .unwrap();

        store.save(&[task("1", "first")]).await.unwrap();
        store
            .save(&[task("1", "first"), task("2", "second")])
            .await
            .unwrap();

        let reloaded = FileTaskStore::new(temp.path().to_path_buf(), "tasks")
            .await
            .unwrap();
        let tasks = reloaded.load().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "1");
        assert_eq!(tasks[1].request_title, "second");
        assert!(!temp.path().join("tasks.json.tmp").exists());

        // The entry is a bare JSON array of camelCase records.
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw[1]["requestTitle"], "second");
    }

    #[tokio::test]
    async fn corrupt_entry_is_set_aside() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::write(temp.path().join("tasks.json"), b"{not json").unwrap();

        let store = FileTaskStore::new(temp.path().to_path_buf(), "tasks")
            .await
            .unwrap();
        assert!(store.load().await.unwrap().is_empty());
        assert!(temp.path().join("tasks.json.corrupt").exists());
        assert!(!temp.path().join("tasks.json").exists());

        // The next save starts a fresh entry.
        store.save(&[task("7", "fresh")]).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn repeated_corruption_keeps_every_copy() {
        let temp = tempfile::tempdir().expect("tempdir");
        let entry = temp.path().join("tasks.json");
        let store = FileTaskStore::new(temp.path().to_path_buf(), "tasks")
            .await
            .unwrap();

        std::fs::write(&entry, b"FIRST-CORRUPT user data").unwrap();
        assert!(store.load().await.unwrap().is_empty());
        std::fs::write(&entry, b"SECOND-CORRUPT").unwrap();
        assert!(store.load().await.unwrap().is_empty());

        assert_eq!(
            std::fs::read_to_string(temp.path().join("tasks.json.corrupt")).unwrap(),
            "FIRST-CORRUPT user data"
        );
        assert_eq!(
            std::fs::read_to_string(temp.path().join("tasks.json.corrupt.1")).unwrap(),
            "SECOND-CORRUPT"
        );
        assert!(!entry.exists());
    }
}
