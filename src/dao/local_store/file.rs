use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use tokio::fs;

use crate::dao::storage::{StorageError, StorageResult};

use super::LocalStore;

/// Local store keeping one JSON file per key inside a data directory.
#[derive(Clone)]
pub struct FileLocalStore {
    root: Arc<Path>,
}

impl FileLocalStore {
    /// Create a store rooted at `root`; the directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        Self {
            root: Arc::from(root),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl LocalStore for FileLocalStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Vec<u8>>>> {
        let path = self.path_for(key);
        Box::pin(async move {
            match fs::read(&path).await {
                Ok(blob) => Ok(Some(blob)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(StorageError::unavailable(
                    format!("reading {}", path.display()),
                    err,
                )),
            }
        })
    }

    fn set(&self, key: &str, blob: Vec<u8>) -> BoxFuture<'static, StorageResult<()>> {
        let root = self.root.clone();
        let path = self.path_for(key);
        Box::pin(async move {
            fs::create_dir_all(&root).await.map_err(|err| {
                StorageError::unavailable(format!("creating {}", root.display()), err)
            })?;

            // Write next to the target then rename so readers never see a torn file.
            let staging = path.with_extension("json.tmp");
            fs::write(&staging, &blob).await.map_err(|err| {
                StorageError::unavailable(format!("writing {}", staging.display()), err)
            })?;
            fs::rename(&staging, &path).await.map_err(|err| {
                StorageError::unavailable(format!("replacing {}", path.display()), err)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scoreboard-back-{name}-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn absent_file_reads_as_none() {
        let store = FileLocalStore::new(scratch_dir("absent"));
        assert!(store.get("current_game").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn written_blob_is_read_back() {
        let dir = scratch_dir("roundtrip");
        let store = FileLocalStore::new(&dir);
        store.set("saved_teams", b"[]".to_vec()).await.unwrap();
        store.set("saved_teams", b"[1]".to_vec()).await.unwrap();

        assert_eq!(store.get("saved_teams").await.unwrap(), Some(b"[1]".to_vec()));
        assert!(!dir.join("saved_teams.json.tmp").exists());

        let _ = std::fs::remove_dir_all(dir);
    }
}
