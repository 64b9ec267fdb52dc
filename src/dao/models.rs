use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::game::GameType;

/// Color persisted as four named floating point channels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColorEntity {
    /// Red channel in `[0, 1]`.
    pub red: f64,
    /// Green channel in `[0, 1]`.
    pub green: f64,
    /// Blue channel in `[0, 1]`.
    pub blue: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

/// Saved team preset as stored locally and inside the remote record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresetEntity {
    /// Canonical key of the preset.
    pub id: Uuid,
    /// Display name; several presets may share a name.
    pub name: String,
    /// Panel background.
    pub primary_color: ColorEntity,
    /// Outline and flash color.
    pub secondary_color: ColorEntity,
    /// Score digits color.
    pub font_color: ColorEntity,
    /// Game type the preset is listed under.
    pub game_type: GameType,
}

/// Live team snapshot stored as part of the current game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamEntity {
    /// Display name.
    pub name: String,
    /// Panel background.
    pub primary_color: ColorEntity,
    /// Outline and flash color.
    pub secondary_color: ColorEntity,
    /// Score digits color.
    pub font_color: ColorEntity,
    /// Score at the time of the snapshot.
    pub score: u32,
    /// Preset the team is bound to, if any.
    #[serde(default)]
    pub saved_preset_id: Option<Uuid>,
}

/// Blob stored under the current game key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentGameEntity {
    /// Team bound to the home slot.
    pub home: TeamEntity,
    /// Team bound to the away slot.
    pub away: TeamEntity,
    /// Selected sport.
    #[serde(default)]
    pub game_type: GameType,
}
