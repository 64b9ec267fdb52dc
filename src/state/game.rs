use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{ColorEntity, PresetEntity, TeamEntity};

/// RGBA color with every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub red: f64,
    /// Green channel.
    pub green: f64,
    /// Blue channel.
    pub blue: f64,
    /// Opacity.
    pub alpha: f64,
}

impl Rgba {
    /// Opaque white, the default score font color.
    pub const WHITE: Rgba = Rgba::opaque(1.0, 1.0, 1.0);
    /// Opaque red, the default home primary color.
    pub const RED: Rgba = Rgba::opaque(1.0, 0.231, 0.188);
    /// Opaque blue, the default away primary color.
    pub const BLUE: Rgba = Rgba::opaque(0.0, 0.478, 1.0);

    /// Build a fully opaque color.
    pub const fn opaque(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Same color with the alpha channel replaced.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }
}

/// Sports supported by the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum GameType {
    /// Ice hockey.
    #[default]
    Hockey,
    /// Basketball, which enables the target mini-game on the score panels.
    Basketball,
    /// Soccer.
    Soccer,
    /// Table tennis.
    #[serde(rename = "Table Tennis")]
    TableTennis,
}

impl GameType {
    /// Every game type in display order.
    pub const ALL: [GameType; 4] = [
        GameType::Hockey,
        GameType::Basketball,
        GameType::Soccer,
        GameType::TableTennis,
    ];

    /// Whether score panels run the basketball target mini-game.
    pub fn uses_targets(self) -> bool {
        matches!(self, GameType::Basketball)
    }
}

/// Which of the two live team bindings is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamSlot {
    /// Team shown on the left panel.
    Home,
    /// Team shown on the right panel.
    Away,
}

impl TeamSlot {
    /// Panel rendering this slot.
    pub fn panel(self) -> PanelSide {
        match self {
            TeamSlot::Home => PanelSide::Left,
            TeamSlot::Away => PanelSide::Right,
        }
    }
}

/// Physical side of a score panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PanelSide {
    /// Left half of the screen.
    Left,
    /// Right half of the screen.
    Right,
}

impl PanelSide {
    /// Team slot displayed by this panel.
    pub fn slot(self) -> TeamSlot {
        match self {
            PanelSide::Left => TeamSlot::Home,
            PanelSide::Right => TeamSlot::Away,
        }
    }
}

/// Stable handle of a team record inside the scoreboard arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeamId(pub(crate) usize);

/// Editable presentation fields shared by live teams and presets.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamStyle {
    /// Display name.
    pub name: String,
    /// Panel background.
    pub primary_color: Rgba,
    /// Score outline and flash color.
    pub secondary_color: Rgba,
    /// Score digits color.
    pub font_color: Rgba,
}

/// Snapshot of the style taken when the team was last saved or applied.
pub type LastSavedState = TeamStyle;

/// Live team record owned by the active game session.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    /// Presentation fields.
    pub style: TeamStyle,
    /// Current score, never negative.
    pub score: u32,
    /// Preset this team was loaded from or saved to.
    pub saved_preset_id: Option<Uuid>,
    /// Style at the last save, used to detect unsaved edits.
    pub last_saved: Option<LastSavedState>,
}

impl Team {
    /// Fresh team with a zero score and no preset binding.
    pub fn new(style: TeamStyle) -> Self {
        Self {
            style,
            score: 0,
            saved_preset_id: None,
            last_saved: None,
        }
    }
}

/// Reusable named and colored team template.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedTeamPreset {
    /// Canonical key of the preset.
    pub id: Uuid,
    /// Presentation fields.
    pub style: TeamStyle,
    /// Game type the preset belongs to.
    pub game_type: GameType,
}

impl SavedTeamPreset {
    /// Mint a preset with a fresh identifier.
    pub fn new(style: TeamStyle, game_type: GameType) -> Self {
        Self {
            id: Uuid::new_v4(),
            style,
            game_type,
        }
    }
}

impl From<ColorEntity> for Rgba {
    fn from(value: ColorEntity) -> Self {
        Self {
            red: value.red,
            green: value.green,
            blue: value.blue,
            alpha: value.alpha,
        }
    }
}

impl From<Rgba> for ColorEntity {
    fn from(value: Rgba) -> Self {
        Self {
            red: value.red,
            green: value.green,
            blue: value.blue,
            alpha: value.alpha,
        }
    }
}

impl From<PresetEntity> for SavedTeamPreset {
    fn from(value: PresetEntity) -> Self {
        Self {
            id: value.id,
            style: TeamStyle {
                name: value.name,
                primary_color: value.primary_color.into(),
                secondary_color: value.secondary_color.into(),
                font_color: value.font_color.into(),
            },
            game_type: value.game_type,
        }
    }
}

impl From<SavedTeamPreset> for PresetEntity {
    fn from(value: SavedTeamPreset) -> Self {
        Self {
            id: value.id,
            name: value.style.name,
            primary_color: value.style.primary_color.into(),
            secondary_color: value.style.secondary_color.into(),
            font_color: value.style.font_color.into(),
            game_type: value.game_type,
        }
    }
}

impl From<TeamEntity> for Team {
    fn from(value: TeamEntity) -> Self {
        Self {
            style: TeamStyle {
                name: value.name,
                primary_color: value.primary_color.into(),
                secondary_color: value.secondary_color.into(),
                font_color: value.font_color.into(),
            },
            score: value.score,
            saved_preset_id: value.saved_preset_id,
            last_saved: None,
        }
    }
}

impl From<&Team> for TeamEntity {
    fn from(value: &Team) -> Self {
        Self {
            name: value.style.name.clone(),
            primary_color: value.style.primary_color.into(),
            secondary_color: value.style.secondary_color.into(),
            font_color: value.style.font_color.into(),
            score: value.score,
            saved_preset_id: value.saved_preset_id,
        }
    }
}
