use std::{future::Future, sync::Arc, time::Duration};

use tokio::{
    sync::broadcast::error::RecvError,
    time::{interval, sleep},
};
use tracing::{debug, info, warn};

use crate::{
    dao::{remote_store::RemoteStore, storage::StorageError},
    services::{sse_events, team_service},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Keep a remote preset store installed while its account is usable, pull its
/// content whenever it changes, and fall back to local-only mode otherwise.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn RemoteStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                if !store.account_available().await {
                    warn!("remote account unavailable; staying local-only");
                } else {
                    attach(&state, store).await;
                    info!("remote sync lost; back to local-only mode");
                    delay = INITIAL_DELAY;
                }
            }
            Err(err) => warn!(error = %err, "remote store connection attempt failed"),
        }

        sleep(delay).await;
        delay = (delay * 2).min(MAX_DELAY);
    }
}

/// Install `store`, merge its content, then follow it until it goes away.
async fn attach(state: &SharedState, store: Arc<dyn RemoteStore>) {
    // subscribe before the first fetch so no peer write falls in between
    let mut changes = store.subscribe();

    state.install_remote_store(store.clone()).await;
    sse_events::broadcast_remote_status(state, true);
    info!("remote store available; presets are mirrored");
    team_service::refresh_from_remote(state).await;

    let mut health = interval(HEALTH_POLL_INTERVAL);
    health.tick().await;

    loop {
        tokio::select! {
            change = changes.recv() => match change {
                Ok(()) => {
                    debug!("remote preset record changed");
                    team_service::refresh_from_remote(state).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "remote change feed lagging");
                    team_service::refresh_from_remote(state).await;
                }
                Err(RecvError::Closed) => {
                    warn!("remote change feed closed");
                    break;
                }
            },
            _ = health.tick() => {
                if !store.account_available().await {
                    warn!("remote account became unavailable");
                    break;
                }
            }
        }
    }

    state.clear_remote_store().await;
    sse_events::broadcast_remote_status(state, false);
}
