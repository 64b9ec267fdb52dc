use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{
    services::sse_service::{self, StreamKind},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/public",
    tag = "sse",
    responses((status = 200, description = "Scores, teams, presets, remote status and ambient display events", content_type = "text/event-stream", body = String))
)]
/// Stream state changes to scoreboard frontends.
pub async fn public_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_public(&state);
    info!("New public SSE connection");
    sse_service::broadcast_handshake(
        state.public_sse(),
        StreamKind::Public,
        state.is_remote_available(),
    );
    sse_service::to_sse_stream(receiver, StreamKind::Public)
}

#[utoipa::path(
    get,
    path = "/sse/feedback",
    tag = "sse",
    responses((status = 200, description = "Haptic, flash, offset and target overlay events", content_type = "text/event-stream", body = String))
)]
/// Stream panel feedback to the device rendering the panels.
pub async fn feedback_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_feedback(&state);
    info!("New feedback SSE connection");
    sse_service::broadcast_handshake(
        state.feedback_sse(),
        StreamKind::Feedback,
        state.is_remote_available(),
    );
    sse_service::to_sse_stream(receiver, StreamKind::Feedback)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/sse/public", get(public_stream))
        .route("/sse/feedback", get(feedback_stream))
}
