use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::common::TeamStyleDto,
    state::game::{GameType, SavedTeamPreset},
};

/// Saved team preset.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PresetSummary {
    pub id: Uuid,
    #[serde(flatten)]
    pub style: TeamStyleDto,
    pub game_type: GameType,
}

impl From<SavedTeamPreset> for PresetSummary {
    fn from(value: SavedTeamPreset) -> Self {
        Self {
            id: value.id,
            style: value.style.into(),
            game_type: value.game_type,
        }
    }
}

/// Filter for the preset listing; defaults to the selected sport.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PresetQuery {
    pub game_type: Option<GameType>,
}

/// Replacement content for an existing preset.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdatePresetRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub style: TeamStyleDto,
    pub game_type: GameType,
}
