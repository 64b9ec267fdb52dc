use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether presets are mirrored remotely; the local store is always usable.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.remote_store().await {
        Some(store) => {
            if !store.account_available().await {
                warn!("remote account unavailable");
            }
        }
        None => warn!("remote store unavailable (local-only mode)"),
    }

    if state.is_remote_available() {
        HealthResponse::ok()
    } else {
        HealthResponse::degraded()
    }
}
