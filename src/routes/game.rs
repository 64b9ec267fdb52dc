use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};

use crate::{
    dto::game::{GameSummary, SetGameTypeRequest},
    error::AppError,
    services::team_service,
    state::SharedState,
};

/// Routes driving the match as a whole.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game", get(get_game))
        .route("/game/new", post(new_game))
        .route("/game/swap", post(swap_teams))
        .route("/game/type", put(set_game_type))
}

/// Current teams, scores and sport.
#[utoipa::path(
    get,
    path = "/game",
    tag = "game",
    responses((status = 200, description = "Current game", body = GameSummary))
)]
pub async fn get_game(State(state): State<SharedState>) -> Json<GameSummary> {
    Json(team_service::game_summary(&state).await)
}

/// Reset both scores, keeping the teams.
#[utoipa::path(
    post,
    path = "/game/new",
    tag = "game",
    responses((status = 200, description = "Scores reset", body = GameSummary))
)]
pub async fn new_game(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(team_service::new_game(&state).await?))
}

/// Exchange the home and away teams, scores included.
#[utoipa::path(
    post,
    path = "/game/swap",
    tag = "game",
    responses((status = 200, description = "Teams swapped", body = GameSummary))
)]
pub async fn swap_teams(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(team_service::swap_teams(&state).await?))
}

/// Select the sport; the preset list of that sport is published on the public stream.
#[utoipa::path(
    put,
    path = "/game/type",
    tag = "game",
    request_body = SetGameTypeRequest,
    responses((status = 200, description = "Game type selected", body = GameSummary))
)]
pub async fn set_game_type(
    State(state): State<SharedState>,
    Json(payload): Json<SetGameTypeRequest>,
) -> Result<Json<GameSummary>, AppError> {
    let summary = team_service::set_game_type(&state, payload.game_type).await?;
    Ok(Json(summary))
}
