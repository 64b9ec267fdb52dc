//! Eventually-consistent mirror of the saved preset collection.
//!
//! The remote side holds a single record containing the whole serialized
//! collection rather than one record per preset.

#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;

use futures::future::BoxFuture;
use tokio::sync::broadcast;

use crate::dao::{models::PresetEntity, storage::StorageResult};

pub use self::memory::MemoryRemoteStore;

/// Name of the record holding the preset collection.
pub const TEAMS_RECORD_NAME: &str = "userTeams";
/// Record type tag attached to the preset collection record.
pub const TEAMS_RECORD_TYPE: &str = "Teams";

/// Abstraction over the remote record store.
pub trait RemoteStore: Send + Sync {
    /// Whether the account backing the store is usable right now.
    fn account_available(&self) -> BoxFuture<'static, bool>;
    /// Fetch the preset collection; a missing record yields an empty list.
    fn fetch_presets(&self) -> BoxFuture<'static, StorageResult<Vec<PresetEntity>>>;
    /// Replace the remote record with the given collection.
    fn save_presets(&self, presets: Vec<PresetEntity>) -> BoxFuture<'static, StorageResult<()>>;
    /// Payload-free "something changed" notifications for the preset record.
    fn subscribe(&self) -> broadcast::Receiver<()>;
}
