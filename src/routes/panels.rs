use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::panel::{GestureSampleRequest, LayoutDto, PanelSummary, TapRequest},
    services::scoring_service,
    state::{SharedState, game::PanelSide},
};

/// Routes receiving raw input from the two score panels.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/panels/{side}", get(get_panel))
        .route("/panels/{side}/gesture", post(gesture))
        .route("/panels/{side}/tap", post(tap))
        .route("/panels/{side}/layout", put(set_layout))
}

/// Current score, offset and gesture phase of a panel.
#[utoipa::path(
    get,
    path = "/panels/{side}",
    tag = "panels",
    params(("side" = PanelSide, Path, description = "`left` or `right`")),
    responses((status = 200, description = "Panel state", body = PanelSummary))
)]
pub async fn get_panel(
    State(state): State<SharedState>,
    Path(side): Path<PanelSide>,
) -> Json<PanelSummary> {
    Json(scoring_service::panel_summary(&state, side).await)
}

/// Feed one drag sample. Haptics and visual feedback go out on `/sse/feedback`.
#[utoipa::path(
    post,
    path = "/panels/{side}/gesture",
    tag = "panels",
    params(("side" = PanelSide, Path, description = "`left` or `right`")),
    request_body = GestureSampleRequest,
    responses((status = 200, description = "Panel state after the sample", body = PanelSummary))
)]
pub async fn gesture(
    State(state): State<SharedState>,
    Path(side): Path<PanelSide>,
    Json(payload): Json<GestureSampleRequest>,
) -> Json<PanelSummary> {
    Json(scoring_service::handle_gesture(&state, side, payload.into()).await)
}

/// Feed a tap.
#[utoipa::path(
    post,
    path = "/panels/{side}/tap",
    tag = "panels",
    params(("side" = PanelSide, Path, description = "`left` or `right`")),
    request_body = TapRequest,
    responses((status = 200, description = "Panel state after the tap", body = PanelSummary))
)]
pub async fn tap(
    State(state): State<SharedState>,
    Path(side): Path<PanelSide>,
    Json(payload): Json<TapRequest>,
) -> Json<PanelSummary> {
    Json(scoring_service::handle_tap(&state, side, payload.location.into()).await)
}

/// Report the size the panel is rendered at.
#[utoipa::path(
    put,
    path = "/panels/{side}/layout",
    tag = "panels",
    params(("side" = PanelSide, Path, description = "`left` or `right`")),
    request_body = LayoutDto,
    responses(
        (status = 200, description = "Layout recorded", body = PanelSummary),
        (status = 400, description = "Non-positive dimension")
    )
)]
pub async fn set_layout(
    State(state): State<SharedState>,
    Path(side): Path<PanelSide>,
    Valid(Json(payload)): Valid<Json<LayoutDto>>,
) -> Json<PanelSummary> {
    Json(scoring_service::set_layout(&state, side, payload.into()).await)
}
