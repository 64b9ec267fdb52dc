//! Always-available key/blob persistence for the current game and saved presets.

pub mod file;
pub mod memory;

use futures::future::BoxFuture;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

use crate::dao::{
    models::{CurrentGameEntity, PresetEntity},
    storage::{StorageError, StorageResult},
};

pub use self::{file::FileLocalStore, memory::MemoryLocalStore};

/// Key holding the two live teams and the selected game type.
pub const CURRENT_GAME_KEY: &str = "current_game";
/// Key holding the saved preset collection.
pub const SAVED_TEAMS_KEY: &str = "saved_teams";

/// Abstraction over the local key/blob store.
pub trait LocalStore: Send + Sync {
    /// Read the blob stored under `key`, `None` when nothing was ever written.
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Vec<u8>>>>;
    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, blob: Vec<u8>) -> BoxFuture<'static, StorageResult<()>>;
}

/// Reasons a typed local read can fail. Each kind has its own fallback policy,
/// see [`LoadError::recover`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// Nothing stored yet (first launch).
    #[error("no value stored under `{0}`")]
    Missing(&'static str),
    /// Backend failure or undecodable blob.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LoadError {
    /// Log the failure according to its kind and return the fallback value.
    ///
    /// A missing key is expected on first launch and only traced at debug
    /// level; corrupted blobs and unreadable stores are reported as warnings.
    pub fn recover<T>(self, fallback: impl FnOnce() -> T) -> T {
        match &self {
            LoadError::Missing(key) => debug!(key, "nothing stored yet; using defaults"),
            LoadError::Storage(StorageError::Codec { key, source }) => {
                warn!(key = %key, error = %source, "discarding undecodable blob; using defaults")
            }
            LoadError::Storage(err) => {
                warn!(error = %err, "local store unreadable; using defaults")
            }
        }
        fallback()
    }
}

/// Read the current game snapshot.
pub async fn load_current_game(store: &dyn LocalStore) -> Result<CurrentGameEntity, LoadError> {
    load_json(store, CURRENT_GAME_KEY).await
}

/// Persist the current game snapshot.
pub async fn save_current_game(
    store: &dyn LocalStore,
    game: &CurrentGameEntity,
) -> StorageResult<()> {
    save_json(store, CURRENT_GAME_KEY, game).await
}

/// Read the saved preset collection.
pub async fn load_presets(store: &dyn LocalStore) -> Result<Vec<PresetEntity>, LoadError> {
    load_json(store, SAVED_TEAMS_KEY).await
}

/// Persist the saved preset collection.
pub async fn save_presets(store: &dyn LocalStore, presets: &[PresetEntity]) -> StorageResult<()> {
    save_json(store, SAVED_TEAMS_KEY, presets).await
}

async fn load_json<T>(store: &dyn LocalStore, key: &'static str) -> Result<T, LoadError>
where
    T: DeserializeOwned,
{
    let blob = store.get(key).await?.ok_or(LoadError::Missing(key))?;
    serde_json::from_slice(&blob).map_err(|source| StorageError::codec(key, source).into())
}

async fn save_json<T>(store: &dyn LocalStore, key: &'static str, value: &T) -> StorageResult<()>
where
    T: ?Sized + Serialize,
{
    let blob = serde_json::to_vec(value).map_err(|source| StorageError::codec(key, source))?;
    store.set(key, blob).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{ColorEntity, TeamEntity};
    use crate::state::game::GameType;

    fn color() -> ColorEntity {
        ColorEntity {
            red: 0.5,
            green: 0.25,
            blue: 1.0,
            alpha: 1.0,
        }
    }

    fn team(name: &str) -> TeamEntity {
        TeamEntity {
            name: name.into(),
            primary_color: color(),
            secondary_color: color(),
            font_color: color(),
            score: 3,
            saved_preset_id: None,
        }
    }

    #[tokio::test]
    async fn missing_key_is_reported_as_missing() {
        let store = MemoryLocalStore::new();
        let err = load_presets(&store).await.unwrap_err();
        assert!(matches!(err, LoadError::Missing(SAVED_TEAMS_KEY)));
        assert!(err.recover(Vec::<PresetEntity>::new).is_empty());
    }

    #[tokio::test]
    async fn corrupted_blob_falls_back_to_default() {
        let store = MemoryLocalStore::new();
        store
            .set(CURRENT_GAME_KEY, b"{not json".to_vec())
            .await
            .unwrap();

        let err = load_current_game(&store).await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::Storage(StorageError::Codec { .. })
        ));
        let fallback = err.recover(|| CurrentGameEntity {
            home: team("Home"),
            away: team("Away"),
            game_type: GameType::Soccer,
        });
        assert_eq!(fallback.game_type, GameType::Soccer);
    }

    #[tokio::test]
    async fn current_game_survives_a_write() {
        let store = MemoryLocalStore::new();
        let game = CurrentGameEntity {
            home: team("Wolves"),
            away: team("Bears"),
            game_type: GameType::TableTennis,
        };
        save_current_game(&store, &game).await.unwrap();
        assert_eq!(load_current_game(&store).await.unwrap(), game);
    }

    #[test]
    fn colors_are_stored_as_named_floats() {
        let json = serde_json::to_value(team("Wolves")).unwrap();
        assert_eq!(json["primary_color"]["green"], 0.25);
        assert_eq!(json["primary_color"]["alpha"], 1.0);
    }
}
