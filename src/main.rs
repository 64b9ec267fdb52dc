//! Scoreboard back binary entrypoint wiring REST, SSE, local persistence and remote sync.

use std::{env, net::SocketAddr};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scoreboard_back::{
    config::AppConfig,
    dao::local_store::FileLocalStore,
    routes,
    services::{live_activity_service, team_service},
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let local_store = FileLocalStore::new(config.data_dir.clone());
    let app_state = AppState::new(config, std::sync::Arc::new(local_store));

    team_service::load_on_startup(&app_state).await;
    tokio::spawn(live_activity_service::run(app_state.clone()));
    spawn_remote_sync(app_state.clone());

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Mirror presets to CouchDB when it is configured; otherwise stay local-only.
#[cfg(feature = "couch-store")]
fn spawn_remote_sync(state: SharedState) {
    use std::sync::Arc;

    use scoreboard_back::{
        dao::{
            remote_store::{
                RemoteStore,
                couchdb::{CouchConfig, CouchRemoteStore},
            },
            storage::StorageError,
        },
        services::sync_service,
    };

    let config = match CouchConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            info!(reason = %err, "remote sync disabled; running local-only");
            return;
        }
    };

    tokio::spawn(sync_service::run(state, move || {
        let config = config.clone();
        async move {
            let store = CouchRemoteStore::connect(config).await?;
            let store: Arc<dyn RemoteStore> = Arc::new(store);
            Ok::<_, StorageError>(store)
        }
    }));
}

#[cfg(not(feature = "couch-store"))]
fn spawn_remote_sync(_state: SharedState) {
    info!("built without a remote store; running local-only");
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
