//! Checkpoint persistence: the pending map `M: node_id -> Vec<State<T>>`
//! plus the superstep index it belongs to, saved and restored atomically.
//!
//! Two models, chosen by construction (per §6): a store-driven
//! `CheckpointStore` trait for pluggable backends, and a JSON file
//! implementation of it using write-temp + rename for atomicity.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::GraphError;
use crate::state::State;

pub type PendingMap<T> = HashMap<String, Vec<State<T>>>;

/// Pluggable checkpoint backend. `save_checkpoint` must be atomic from the
/// caller's perspective: a crash mid-save must not leave a checkpoint that
/// resumes to a state between two supersteps.
#[async_trait]
pub trait CheckpointStore<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    async fn save_checkpoint(&self, step: u64, pending: &PendingMap<T>) -> Result<(), GraphError>;
    async fn load_checkpoint(&self) -> Result<Option<(u64, PendingMap<T>)>, GraphError>;
    async fn clear_checkpoints(&self) -> Result<(), GraphError>;
}

/// In-memory checkpoint store: backs tests and single-process resume where
/// durability across restarts is not required.
#[derive(Default)]
pub struct MemoryCheckpointStore<T> {
    slot: Mutex<Option<(u64, PendingMap<T>)>>,
}

impl<T> MemoryCheckpointStore<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<T> CheckpointStore<T> for MemoryCheckpointStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn save_checkpoint(&self, step: u64, pending: &PendingMap<T>) -> Result<(), GraphError> {
        *self.slot.lock().await = Some((step, pending.clone()));
        Ok(())
    }

    async fn load_checkpoint(&self) -> Result<Option<(u64, PendingMap<T>)>, GraphError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn clear_checkpoints(&self) -> Result<(), GraphError> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

#[derive(Serialize)]
struct CheckpointRecordRef<'a, T> {
    step: u64,
    pending: &'a PendingMap<T>,
}

#[derive(Deserialize)]
struct CheckpointRecordOwned<T> {
    step: u64,
    pending: PendingMap<T>,
}

/// File-backed checkpoint store. Writes `{path}.tmp` then renames over
/// `path`, so a reader never observes a partially-written file.
pub struct JsonCheckpointStore {
    path: PathBuf,
}

impl JsonCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl<T> CheckpointStore<T> for JsonCheckpointStore
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn save_checkpoint(&self, step: u64, pending: &PendingMap<T>) -> Result<(), GraphError> {
        let record = CheckpointRecordRef { step, pending };
        let json = serde_json::to_vec_pretty(&record)
            .map_err(|e| GraphError::Checkpoint(format!("serialize failed: {e}")))?;

        let tmp_path = tmp_path_for(&self.path);
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|e| GraphError::Checkpoint(format!("write failed: {e}")))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| GraphError::Checkpoint(format!("rename failed: {e}")))?;
        Ok(())
    }

    async fn load_checkpoint(&self) -> Result<Option<(u64, PendingMap<T>)>, GraphError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let record: CheckpointRecordOwned<T> = serde_json::from_slice(&bytes)
                    .map_err(|e| GraphError::Checkpoint(format!("deserialize failed: {e}")))?;
                Ok(Some((record.step, record.pending)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GraphError::Checkpoint(format!("read failed: {e}"))),
        }
    }

    async fn clear_checkpoints(&self) -> Result<(), GraphError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GraphError::Checkpoint(format!("remove failed: {e}"))),
        }
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store: MemoryCheckpointStore<i32> = MemoryCheckpointStore::new();
        let mut pending = PendingMap::new();
        pending.insert("a".to_string(), vec![State::new(vec![1, 2])]);

        store.save_checkpoint(3, &pending).await.unwrap();
        let loaded = store.load_checkpoint().await.unwrap().unwrap();
        assert_eq!(loaded.0, 3);
        assert_eq!(loaded.1.get("a").unwrap()[0].messages, vec![1, 2]);

        store.clear_checkpoints().await.unwrap();
        assert!(store.load_checkpoint().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn json_store_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        let store = JsonCheckpointStore::new(&path);

        let mut pending: PendingMap<i32> = PendingMap::new();
        pending.insert("b".to_string(), vec![State::new(vec![42])]);

        store.save_checkpoint(7, &pending).await.unwrap();
        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());

        let loaded = CheckpointStore::<i32>::load_checkpoint(&store)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.0, 7);
        assert_eq!(loaded.1.get("b").unwrap()[0].messages, vec![42]);

        CheckpointStore::<i32>::clear_checkpoints(&store).await.unwrap();
        assert!(!path.exists());
    }
}
