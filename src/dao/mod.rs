/// Always-available key/blob persistence.
pub mod local_store;
/// Persisted record shapes shared by both stores.
pub mod models;
/// Remote mirror of the preset collection.
pub mod remote_store;
/// Storage error types shared by the backends.
pub mod storage;
