use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::common::ColorDto,
    state::{
        game::{GameType, TeamSlot},
        scoreboard::Scoreboard,
    },
};

/// Public projection of a live team.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct TeamSummary {
    pub slot: TeamSlot,
    pub name: String,
    pub primary_color: ColorDto,
    pub secondary_color: ColorDto,
    pub font_color: ColorDto,
    pub score: u32,
    pub saved_preset_id: Option<Uuid>,
    /// True when name or colors differ from the last save.
    pub has_unsaved_changes: bool,
}

impl TeamSummary {
    pub fn from_scoreboard(board: &Scoreboard, slot: TeamSlot) -> Self {
        let team = board.team(slot);
        Self {
            slot,
            name: team.style.name.clone(),
            primary_color: team.style.primary_color.into(),
            secondary_color: team.style.secondary_color.into(),
            font_color: team.style.font_color.into(),
            score: team.score,
            saved_preset_id: team.saved_preset_id,
            has_unsaved_changes: board.has_unsaved_changes(slot),
        }
    }
}

/// Snapshot of the current game.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct GameSummary {
    pub game_type: GameType,
    pub home: TeamSummary,
    pub away: TeamSummary,
    /// Whether presets are mirrored to the remote store.
    pub remote_available: bool,
}

impl GameSummary {
    pub fn from_scoreboard(board: &Scoreboard, remote_available: bool) -> Self {
        Self {
            game_type: board.game_type(),
            home: TeamSummary::from_scoreboard(board, TeamSlot::Home),
            away: TeamSummary::from_scoreboard(board, TeamSlot::Away),
            remote_available,
        }
    }
}

/// Select the sport.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetGameTypeRequest {
    pub game_type: GameType,
}

/// Load a preset into a live team.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyPresetRequest {
    pub preset_id: Uuid,
}

/// Save a live team as a preset; defaults to the selected sport.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SaveTeamRequest {
    #[serde(default)]
    pub game_type: Option<GameType>,
}

/// Whether a live team differs from its last save.
#[derive(Clone, Copy, Debug, Serialize, ToSchema)]
pub struct UnsavedChangesResponse {
    pub slot: TeamSlot,
    pub has_unsaved_changes: bool,
}
