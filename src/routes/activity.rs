use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::live_activity::{ActivityStatus, ActivitySummary},
    error::AppError,
    services::live_activity_service,
    state::SharedState,
};

/// Routes controlling the ambient display mirror.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/activity", get(get_activity))
        .route("/activity/start", post(start_activity))
        .route("/activity/end", post(end_activity))
}

#[utoipa::path(
    get,
    path = "/activity",
    tag = "activity",
    responses((status = 200, description = "Support flag and running session", body = ActivityStatus))
)]
/// Whether the mirror is enabled and which session runs.
pub async fn get_activity(State(state): State<SharedState>) -> Json<ActivityStatus> {
    Json(live_activity_service::status(&state).await)
}

#[utoipa::path(
    post,
    path = "/activity/start",
    tag = "activity",
    responses(
        (status = 200, description = "Session started or refreshed", body = ActivitySummary),
        (status = 409, description = "Live activities are disabled")
    )
)]
/// Start mirroring the current teams and scores.
pub async fn start_activity(
    State(state): State<SharedState>,
) -> Result<Json<ActivitySummary>, AppError> {
    Ok(Json(live_activity_service::start(&state).await?))
}

#[utoipa::path(
    post,
    path = "/activity/end",
    tag = "activity",
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "No session running")
    )
)]
/// Stop the running session.
pub async fn end_activity(State(state): State<SharedState>) -> Result<StatusCode, AppError> {
    live_activity_service::end(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}
