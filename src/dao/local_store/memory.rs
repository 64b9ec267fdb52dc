use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::storage::{StorageError, StorageResult};

use super::LocalStore;

#[derive(Debug, thiserror::Error)]
#[error("write rejected")]
struct RejectedWrite;

/// Process-local store used by tests and ephemeral runs.
#[derive(Clone, Default)]
pub struct MemoryLocalStore {
    blobs: Arc<DashMap<String, Vec<u8>>>,
    reject_writes: Arc<AtomicBool>,
}

impl MemoryLocalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, as a full or read-only disk would.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }
}

impl LocalStore for MemoryLocalStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Vec<u8>>>> {
        let blob = self.blobs.get(key).map(|entry| entry.value().clone());
        Box::pin(async move { Ok(blob) })
    }

    fn set(&self, key: &str, blob: Vec<u8>) -> BoxFuture<'static, StorageResult<()>> {
        let result = if self.reject_writes.load(Ordering::SeqCst) {
            Err(StorageError::unavailable(format!("writing {key}"), RejectedWrite))
        } else {
            self.blobs.insert(key.to_string(), blob);
            Ok(())
        };
        Box::pin(async move { result })
    }
}
