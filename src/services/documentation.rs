use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the scoreboard backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::sse::feedback_stream,
        crate::routes::game::get_game,
        crate::routes::game::new_game,
        crate::routes::game::swap_teams,
        crate::routes::game::set_game_type,
        crate::routes::teams::update_team,
        crate::routes::teams::save_team,
        crate::routes::teams::apply_preset,
        crate::routes::teams::create_new_team,
        crate::routes::teams::unsaved_changes,
        crate::routes::presets::list_presets,
        crate::routes::presets::update_preset,
        crate::routes::presets::delete_preset,
        crate::routes::presets::refresh_presets,
        crate::routes::panels::get_panel,
        crate::routes::panels::gesture,
        crate::routes::panels::tap,
        crate::routes::panels::set_layout,
        crate::routes::activity::get_activity,
        crate::routes::activity::start_activity,
        crate::routes::activity::end_activity,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::ColorDto,
            crate::dto::common::TeamStyleDto,
            crate::dto::game::TeamSummary,
            crate::dto::game::GameSummary,
            crate::dto::game::SetGameTypeRequest,
            crate::dto::game::ApplyPresetRequest,
            crate::dto::game::SaveTeamRequest,
            crate::dto::game::UnsavedChangesResponse,
            crate::dto::preset::PresetSummary,
            crate::dto::preset::UpdatePresetRequest,
            crate::dto::panel::PointDto,
            crate::dto::panel::TranslationDto,
            crate::dto::panel::GestureSampleRequest,
            crate::dto::panel::TapRequest,
            crate::dto::panel::LayoutDto,
            crate::dto::panel::PanelSummary,
            crate::dto::live_activity::ActivityTeam,
            crate::dto::live_activity::ActivityScores,
            crate::dto::live_activity::ActivitySummary,
            crate::dto::live_activity::ActivityStatus,
            crate::dto::sse::Handshake,
            crate::dto::sse::RemoteStatusEvent,
            crate::dto::sse::ScoreChangedEvent,
            crate::dto::sse::PresetsChangedEvent,
            crate::dto::sse::ActivityEndedEvent,
            crate::dto::sse::HapticImpactEvent,
            crate::dto::sse::HapticErrorEvent,
            crate::dto::sse::PanelFlashEvent,
            crate::dto::sse::PanelOffsetEvent,
            crate::dto::sse::TargetsShownEvent,
            crate::dto::sse::TargetStruckEvent,
            crate::dto::sse::TargetsHiddenEvent,
            crate::state::game::GameType,
            crate::state::game::TeamSlot,
            crate::state::game::PanelSide,
            crate::state::gesture::GesturePhase,
            crate::state::gesture::TargetKind,
            crate::state::gesture::BasketballPhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "game", description = "Match-wide operations"),
        (name = "teams", description = "Live team editing"),
        (name = "presets", description = "Saved team library"),
        (name = "panels", description = "Score panel input"),
        (name = "activity", description = "Ambient display mirror"),
    )
)]
pub struct ApiDoc;
