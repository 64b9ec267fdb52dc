use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::preset::{PresetQuery, PresetSummary, UpdatePresetRequest},
    error::AppError,
    services::team_service,
    state::SharedState,
};

/// Routes managing the saved preset library.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/presets", get(list_presets))
        .route("/presets/refresh", post(refresh_presets))
        .route("/presets/{id}", put(update_preset).delete(delete_preset))
}

/// Presets of one sport in the order they were created.
#[utoipa::path(
    get,
    path = "/presets",
    tag = "presets",
    params(PresetQuery),
    responses((status = 200, description = "Saved presets", body = [PresetSummary]))
)]
pub async fn list_presets(
    State(state): State<SharedState>,
    Query(query): Query<PresetQuery>,
) -> Json<Vec<PresetSummary>> {
    Json(team_service::get_presets(&state, query.game_type).await)
}

/// Overwrite a preset.
#[utoipa::path(
    put,
    path = "/presets/{id}",
    tag = "presets",
    params(("id" = String, Path, description = "Identifier of the preset")),
    request_body = UpdatePresetRequest,
    responses(
        (status = 200, description = "Preset updated", body = PresetSummary),
        (status = 404, description = "Unknown preset")
    )
)]
pub async fn update_preset(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<UpdatePresetRequest>>,
) -> Result<Json<PresetSummary>, AppError> {
    let updated =
        team_service::update_preset(&state, id, payload.style.into(), payload.game_type).await?;
    Ok(Json(updated))
}

/// Delete a preset; live teams bound to it become unbound.
#[utoipa::path(
    delete,
    path = "/presets/{id}",
    tag = "presets",
    params(("id" = String, Path, description = "Identifier of the preset")),
    responses(
        (status = 204, description = "Preset deleted"),
        (status = 404, description = "Unknown preset")
    )
)]
pub async fn delete_preset(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    team_service::delete_preset(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pull the remote collection now instead of waiting for a change notification.
#[utoipa::path(
    post,
    path = "/presets/refresh",
    tag = "presets",
    responses((status = 200, description = "Presets of the selected sport after the merge", body = [PresetSummary]))
)]
pub async fn refresh_presets(State(state): State<SharedState>) -> Json<Vec<PresetSummary>> {
    team_service::refresh_from_remote(&state).await;
    Json(team_service::get_presets(&state, None).await)
}
