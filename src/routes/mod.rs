use axum::Router;

use crate::state::SharedState;

pub mod activity;
pub mod docs;
pub mod game;
pub mod health;
pub mod panels;
pub mod presets;
pub mod sse;
pub mod teams;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(game::router())
        .merge(teams::router())
        .merge(presets::router())
        .merge(panels::router())
        .merge(activity::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
