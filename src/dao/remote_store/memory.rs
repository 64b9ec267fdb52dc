use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use futures::future::BoxFuture;
use tokio::sync::broadcast;

use crate::dao::{
    models::PresetEntity,
    storage::{StorageError, StorageResult},
};

use super::{RemoteStore, TEAMS_RECORD_NAME};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct SimulatedFailure(&'static str);

#[derive(Default)]
struct Inner {
    record: Mutex<Option<Vec<PresetEntity>>>,
    unavailable: AtomicBool,
    reject_writes: AtomicBool,
}

/// In-process remote store, used for local-only runs and tests.
///
/// Writes coming from [`MemoryRemoteStore::write_from_peer`] behave like a
/// second device updating the record and fire a change notification.
#[derive(Clone)]
pub struct MemoryRemoteStore {
    inner: Arc<Inner>,
    changes: broadcast::Sender<()>,
}

impl Default for MemoryRemoteStore {
    fn default() -> Self {
        let (changes, _rx) = broadcast::channel(8);
        Self {
            inner: Arc::default(),
            changes,
        }
    }
}

impl MemoryRemoteStore {
    /// Create an available store with no record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle account availability.
    pub fn set_available(&self, available: bool) {
        self.inner.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Make subsequent pushes fail.
    pub fn set_reject_writes(&self, reject: bool) {
        self.inner.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Current record content, `None` when it was never written.
    pub fn record(&self) -> Option<Vec<PresetEntity>> {
        self.lock_record().clone()
    }

    /// Overwrite the record as another device would and notify subscribers.
    pub fn write_from_peer(&self, presets: Vec<PresetEntity>) {
        *self.lock_record() = Some(presets);
        let _ = self.changes.send(());
    }

    fn lock_record(&self) -> std::sync::MutexGuard<'_, Option<Vec<PresetEntity>>> {
        self.inner
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_available(&self) -> bool {
        !self.inner.unavailable.load(Ordering::SeqCst)
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn account_available(&self) -> BoxFuture<'static, bool> {
        let available = self.is_available();
        Box::pin(async move { available })
    }

    fn fetch_presets(&self) -> BoxFuture<'static, StorageResult<Vec<PresetEntity>>> {
        let result = if self.is_available() {
            Ok(self.record().unwrap_or_default())
        } else {
            Err(StorageError::unavailable(
                format!("fetching {TEAMS_RECORD_NAME}"),
                SimulatedFailure("account unavailable"),
            ))
        };
        Box::pin(async move { result })
    }

    fn save_presets(&self, presets: Vec<PresetEntity>) -> BoxFuture<'static, StorageResult<()>> {
        let result = if !self.is_available() || self.inner.reject_writes.load(Ordering::SeqCst) {
            Err(StorageError::unavailable(
                format!("saving {TEAMS_RECORD_NAME}"),
                SimulatedFailure("write rejected"),
            ))
        } else {
            *self.lock_record() = Some(presets);
            Ok(())
        };
        Box::pin(async move { result })
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}
