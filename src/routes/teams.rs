use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        common::TeamStyleDto,
        game::{ApplyPresetRequest, GameSummary, SaveTeamRequest, UnsavedChangesResponse},
        preset::PresetSummary,
    },
    error::AppError,
    services::team_service,
    state::{SharedState, game::TeamSlot},
};

/// Routes editing the two live teams.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams/{slot}", put(update_team))
        .route("/teams/{slot}/save", post(save_team))
        .route("/teams/{slot}/apply", post(apply_preset))
        .route("/teams/{slot}/new", post(create_new_team))
        .route("/teams/{slot}/unsaved", get(unsaved_changes))
}

/// Edit name and colors of a live team.
#[utoipa::path(
    put,
    path = "/teams/{slot}",
    tag = "teams",
    params(("slot" = TeamSlot, Path, description = "`home` or `away`")),
    request_body = TeamStyleDto,
    responses(
        (status = 200, description = "Team updated", body = GameSummary),
        (status = 400, description = "Invalid name or color channel")
    )
)]
pub async fn update_team(
    State(state): State<SharedState>,
    Path(slot): Path<TeamSlot>,
    Valid(Json(payload)): Valid<Json<TeamStyleDto>>,
) -> Result<Json<GameSummary>, AppError> {
    let summary = team_service::update_team(&state, slot, payload.into()).await?;
    Ok(Json(summary))
}

/// Save a live team as a preset, overwriting the preset it was loaded from.
#[utoipa::path(
    post,
    path = "/teams/{slot}/save",
    tag = "teams",
    params(("slot" = TeamSlot, Path, description = "`home` or `away`")),
    request_body(content = SaveTeamRequest, description = "Sport to file the preset under; defaults to the selected one"),
    responses(
        (status = 200, description = "Preset saved", body = PresetSummary),
        (status = 503, description = "Local store unavailable")
    )
)]
pub async fn save_team(
    State(state): State<SharedState>,
    Path(slot): Path<TeamSlot>,
    payload: Option<Json<SaveTeamRequest>>,
) -> Result<Json<PresetSummary>, AppError> {
    let game_type = payload.and_then(|Json(body)| body.game_type);
    let saved = team_service::save_team(&state, slot, game_type).await?;
    Ok(Json(saved))
}

/// Load a saved preset into a live team.
#[utoipa::path(
    post,
    path = "/teams/{slot}/apply",
    tag = "teams",
    params(("slot" = TeamSlot, Path, description = "`home` or `away`")),
    request_body = ApplyPresetRequest,
    responses(
        (status = 200, description = "Preset applied", body = GameSummary),
        (status = 404, description = "Unknown preset")
    )
)]
pub async fn apply_preset(
    State(state): State<SharedState>,
    Path(slot): Path<TeamSlot>,
    Json(payload): Json<ApplyPresetRequest>,
) -> Result<Json<GameSummary>, AppError> {
    let summary = team_service::apply_preset(&state, slot, payload.preset_id).await?;
    Ok(Json(summary))
}

/// Replace a live team with a blank one bound to no preset.
#[utoipa::path(
    post,
    path = "/teams/{slot}/new",
    tag = "teams",
    params(("slot" = TeamSlot, Path, description = "`home` or `away`")),
    responses((status = 200, description = "Team reset", body = GameSummary))
)]
pub async fn create_new_team(
    State(state): State<SharedState>,
    Path(slot): Path<TeamSlot>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(team_service::create_new_team(&state, slot).await?))
}

/// Whether a live team differs from its last save.
#[utoipa::path(
    get,
    path = "/teams/{slot}/unsaved",
    tag = "teams",
    params(("slot" = TeamSlot, Path, description = "`home` or `away`")),
    responses((status = 200, description = "Unsaved changes flag", body = UnsavedChangesResponse))
)]
pub async fn unsaved_changes(
    State(state): State<SharedState>,
    Path(slot): Path<TeamSlot>,
) -> Json<UnsavedChangesResponse> {
    Json(UnsavedChangesResponse {
        slot,
        has_unsaved_changes: team_service::has_unsaved_changes(&state, slot).await,
    })
}
