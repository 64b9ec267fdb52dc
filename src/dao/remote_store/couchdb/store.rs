use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::broadcast, task::JoinHandle, time::sleep};
use tracing::{debug, warn};

use crate::dao::{
    models::PresetEntity,
    remote_store::{RemoteStore, TEAMS_RECORD_NAME, TEAMS_RECORD_TYPE},
    storage::StorageResult,
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{ChangesResponse, CouchTeamsDocument, seq_to_string},
};

const CHANGES: &str = "_changes";
const LONGPOLL_TIMEOUT_MS: u64 = 25_000;
const WATCH_INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const WATCH_MAX_DELAY: Duration = Duration::from_secs(10);

/// HTTP plumbing shared by the store and its change watcher.
#[derive(Clone)]
struct CouchClient {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

/// Aborts the change watcher once the last store handle is dropped.
struct WatcherGuard(JoinHandle<()>);

impl Drop for WatcherGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Remote store keeping the preset collection in one CouchDB document.
#[derive(Clone)]
pub struct CouchRemoteStore {
    couch: CouchClient,
    changes: broadcast::Sender<()>,
    _watcher: Arc<WatcherGuard>,
}

impl CouchRemoteStore {
    /// Connect to CouchDB, make sure the database exists and start following
    /// the change feed of the preset record.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let couch = CouchClient {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
            database: Arc::<str>::from(config.database),
            auth: config
                .username
                .zip(config.password)
                .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p))),
        };

        couch.ensure_database().await?;

        let (changes, _rx) = broadcast::channel(8);
        let watcher = tokio::spawn(watch_changes(couch.clone(), changes.clone()));

        Ok(Self {
            couch,
            changes,
            _watcher: Arc::new(WatcherGuard(watcher)),
        })
    }
}

impl CouchClient {
    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, self.database)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some((ref user, ref pass)) = self.auth {
            builder.basic_auth(user.as_ref(), Some(pass.as_ref()))
        } else {
            builder
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.database_url(), path);
        self.authorize(self.client.request(method, url))
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();
        let url = self.database_url();

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|source| CouchDaoError::DatabaseQuery {
                database: database.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let create = self
                    .authorize(self.client.put(&url))
                    .send()
                    .await
                    .map_err(|source| CouchDaoError::DatabaseCreate {
                        database: database.clone(),
                        source,
                    })?;
                if create.status().is_success() {
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database,
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database,
                status: other,
            }),
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, doc_id)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json::<T>().await.map(Some).map_err(|source| {
                    CouchDaoError::DecodeResponse {
                        path: doc_id.to_string(),
                        source,
                    }
                })
            }
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .request(Method::PUT, doc_id)
            .json(document)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: response.status(),
            })
        }
    }

    /// Block until the preset record changes after `since` or the poll times out.
    async fn poll_changes(&self, since: &str) -> CouchResult<ChangesResponse> {
        let doc_ids = format!("[\"{TEAMS_RECORD_NAME}\"]");
        let query = [
            ("feed", "longpoll".to_string()),
            ("filter", "_doc_ids".to_string()),
            ("doc_ids", doc_ids),
            ("since", since.to_string()),
            ("timeout", LONGPOLL_TIMEOUT_MS.to_string()),
        ];

        let response = self
            .request(Method::GET, CHANGES)
            .query(&query)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: CHANGES.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: CHANGES.to_string(),
                status: response.status(),
            });
        }

        response
            .json::<ChangesResponse>()
            .await
            .map_err(|source| CouchDaoError::DecodeResponse {
                path: CHANGES.to_string(),
                source,
            })
    }
}

/// Follow the change feed and emit one notification per batch touching the
/// preset record.
async fn watch_changes(couch: CouchClient, changes: broadcast::Sender<()>) {
    let mut since = "now".to_string();
    let mut delay = WATCH_INITIAL_DELAY;

    loop {
        match couch.poll_changes(&since).await {
            Ok(batch) => {
                delay = WATCH_INITIAL_DELAY;
                since = seq_to_string(&batch.last_seq);
                if batch.results.iter().any(|row| row.id == TEAMS_RECORD_NAME) {
                    debug!(since = %since, "preset record changed remotely");
                    let _ = changes.send(());
                }
            }
            Err(err) => {
                warn!(error = %err, "CouchDB change feed failed; retrying");
                sleep(delay).await;
                delay = (delay * 2).min(WATCH_MAX_DELAY);
            }
        }
    }
}

impl RemoteStore for CouchRemoteStore {
    fn account_available(&self) -> BoxFuture<'static, bool> {
        let couch = self.couch.clone();
        Box::pin(async move {
            let url = couch.database_url();
            match couch.authorize(couch.client.get(&url)).send().await {
                Ok(response) => response.status().is_success(),
                Err(err) => {
                    debug!(error = %err, "CouchDB availability probe failed");
                    false
                }
            }
        })
    }

    fn fetch_presets(&self) -> BoxFuture<'static, StorageResult<Vec<PresetEntity>>> {
        let couch = self.couch.clone();
        Box::pin(async move {
            let doc = couch
                .get_document::<CouchTeamsDocument>(TEAMS_RECORD_NAME)
                .await?;
            Ok(doc.map(|doc| doc.teams_data).unwrap_or_default())
        })
    }

    fn save_presets(&self, presets: Vec<PresetEntity>) -> BoxFuture<'static, StorageResult<()>> {
        let couch = self.couch.clone();
        Box::pin(async move {
            let rev = couch
                .get_document::<CouchTeamsDocument>(TEAMS_RECORD_NAME)
                .await?
                .and_then(|existing| existing.rev);
            let doc = CouchTeamsDocument {
                id: TEAMS_RECORD_NAME.to_string(),
                rev,
                record_type: TEAMS_RECORD_TYPE.to_string(),
                teams_data: presets,
            };
            couch
                .put_document(TEAMS_RECORD_NAME, &doc)
                .await
                .map_err(Into::into)
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}
