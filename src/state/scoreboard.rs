//! In-memory owner of the live teams and the saved preset collection.
//!
//! Every mutation goes through [`Scoreboard`]; callers hold it behind the
//! application write lock, persistence and fan-out happen in the services.

use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{CurrentGameEntity, PresetEntity, TeamEntity};

use super::game::{GameType, Rgba, SavedTeamPreset, Team, TeamId, TeamSlot, TeamStyle};

/// Name given to a team created from scratch.
pub const NEW_TEAM_NAME: &str = "New Team";

/// Failures of scoreboard operations addressing a preset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreboardError {
    /// No preset carries the given id.
    #[error("preset `{0}` not found")]
    UnknownPreset(Uuid),
}

/// Result of a score adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOutcome {
    /// The score moved to `score`.
    Changed {
        /// New score.
        score: u32,
    },
    /// Decrement at zero; nothing changed.
    Rejected,
}

/// What a mutation touched, broadcast to interested subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// A score changed.
    Score(TeamSlot),
    /// Team fields or slot bindings changed.
    Teams,
    /// The selected game type changed.
    GameType,
    /// The preset collection changed.
    Presets,
}

/// Styles a slot falls back to on first launch and for new teams.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamDefaults {
    /// Home slot style.
    pub home: TeamStyle,
    /// Away slot style.
    pub away: TeamStyle,
}

impl Default for TeamDefaults {
    fn default() -> Self {
        Self {
            home: TeamStyle {
                name: "Home".into(),
                primary_color: Rgba::RED,
                secondary_color: Rgba::BLUE,
                font_color: Rgba::WHITE,
            },
            away: TeamStyle {
                name: "Away".into(),
                primary_color: Rgba::BLUE,
                secondary_color: Rgba::RED,
                font_color: Rgba::WHITE,
            },
        }
    }
}

impl TeamDefaults {
    fn for_slot(&self, slot: TeamSlot) -> &TeamStyle {
        match slot {
            TeamSlot::Home => &self.home,
            TeamSlot::Away => &self.away,
        }
    }
}

/// Live game session plus the saved presets.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    teams: Vec<Team>,
    home: TeamId,
    away: TeamId,
    game_type: GameType,
    presets: IndexMap<Uuid, SavedTeamPreset>,
    defaults: TeamDefaults,
}

impl Scoreboard {
    /// First-launch scoreboard: default teams, no presets.
    pub fn new(defaults: TeamDefaults) -> Self {
        let teams = vec![
            Team::new(defaults.home.clone()),
            Team::new(defaults.away.clone()),
        ];
        Self {
            teams,
            home: TeamId(0),
            away: TeamId(1),
            game_type: GameType::default(),
            presets: IndexMap::new(),
            defaults,
        }
    }

    /// Rebuild the session from a persisted snapshot.
    pub fn restore(
        defaults: TeamDefaults,
        game: Option<CurrentGameEntity>,
        presets: Vec<PresetEntity>,
    ) -> Self {
        let mut board = Self::new(defaults);
        if let Some(game) = game {
            board.teams = vec![Team::from(game.home), Team::from(game.away)];
            board.game_type = game.game_type;
        }
        board.replace_presets(presets);
        board
    }

    fn id(&self, slot: TeamSlot) -> TeamId {
        match slot {
            TeamSlot::Home => self.home,
            TeamSlot::Away => self.away,
        }
    }

    fn team_mut(&mut self, slot: TeamSlot) -> &mut Team {
        let TeamId(index) = self.id(slot);
        &mut self.teams[index]
    }

    /// Team currently bound to `slot`.
    pub fn team(&self, slot: TeamSlot) -> &Team {
        let TeamId(index) = self.id(slot);
        &self.teams[index]
    }

    /// Selected sport.
    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    /// Select a sport; returns whether it changed.
    pub fn set_game_type(&mut self, game_type: GameType) -> bool {
        let changed = self.game_type != game_type;
        self.game_type = game_type;
        changed
    }

    /// Add points to a team.
    pub fn increment(&mut self, slot: TeamSlot, points: u32) -> ScoreOutcome {
        let team = self.team_mut(slot);
        team.score = team.score.saturating_add(points);
        ScoreOutcome::Changed { score: team.score }
    }

    /// Remove one point, rejected when the score is already zero.
    pub fn decrement(&mut self, slot: TeamSlot) -> ScoreOutcome {
        let team = self.team_mut(slot);
        match team.score.checked_sub(1) {
            Some(score) => {
                team.score = score;
                ScoreOutcome::Changed { score }
            }
            None => ScoreOutcome::Rejected,
        }
    }

    /// Zero both scores. Teams and presets are kept.
    pub fn new_game(&mut self) {
        for team in &mut self.teams {
            team.score = 0;
        }
    }

    /// Exchange the home and away bindings.
    pub fn swap_teams(&mut self) {
        std::mem::swap(&mut self.home, &mut self.away);
    }

    /// Replace the editable fields of a live team.
    pub fn update_team(&mut self, slot: TeamSlot, style: TeamStyle) {
        self.team_mut(slot).style = style;
    }

    /// Store the team as a preset of `game_type`.
    ///
    /// A team bound to an existing preset overwrites it in place, otherwise a
    /// new preset is appended and bound. The team's last-saved snapshot is
    /// refreshed either way.
    pub fn save_team(&mut self, slot: TeamSlot, game_type: GameType) -> SavedTeamPreset {
        let style = self.team(slot).style.clone();
        let bound = self
            .team(slot)
            .saved_preset_id
            .filter(|id| self.presets.contains_key(id));

        let preset = match bound {
            Some(id) => SavedTeamPreset {
                id,
                style: style.clone(),
                game_type,
            },
            None => SavedTeamPreset::new(style.clone(), game_type),
        };
        self.presets.insert(preset.id, preset.clone());

        let team = self.team_mut(slot);
        team.saved_preset_id = Some(preset.id);
        team.last_saved = Some(style);
        preset
    }

    /// Load a preset into a live team and bind it.
    pub fn apply_preset(&mut self, slot: TeamSlot, id: Uuid) -> Result<(), ScoreboardError> {
        let style = self
            .presets
            .get(&id)
            .map(|preset| preset.style.clone())
            .ok_or(ScoreboardError::UnknownPreset(id))?;

        let team = self.team_mut(slot);
        team.style = style.clone();
        team.saved_preset_id = Some(id);
        team.last_saved = Some(style);
        Ok(())
    }

    /// Unbind the team and reset its fields to a blank team.
    pub fn create_new_team(&mut self, slot: TeamSlot) {
        let defaults = self.defaults.for_slot(slot);
        let style = TeamStyle {
            name: NEW_TEAM_NAME.to_string(),
            ..defaults.clone()
        };
        let team = self.team_mut(slot);
        team.style = style;
        team.saved_preset_id = None;
        team.last_saved = None;
    }

    /// Whether the team differs from what was last saved.
    ///
    /// Without a snapshot the bound preset is the reference; an unbound team
    /// counts as unsaved once it has a meaningful name.
    pub fn has_unsaved_changes(&self, slot: TeamSlot) -> bool {
        let team = self.team(slot);
        if let Some(saved) = &team.last_saved {
            return *saved != team.style;
        }
        match team.saved_preset_id {
            Some(id) => self
                .presets
                .get(&id)
                .is_none_or(|preset| preset.style != team.style),
            None => !team.style.name.is_empty() && team.style.name != NEW_TEAM_NAME,
        }
    }

    /// Presets of one game type, in insertion order.
    pub fn presets_for(&self, game_type: GameType) -> Vec<SavedTeamPreset> {
        self.presets
            .values()
            .filter(|preset| preset.game_type == game_type)
            .cloned()
            .collect()
    }

    /// Preset by id.
    pub fn preset(&self, id: Uuid) -> Option<&SavedTeamPreset> {
        self.presets.get(&id)
    }

    /// Overwrite an existing preset.
    pub fn update_preset(&mut self, preset: SavedTeamPreset) -> Result<(), ScoreboardError> {
        let existing = self
            .presets
            .get_mut(&preset.id)
            .ok_or(ScoreboardError::UnknownPreset(preset.id))?;
        *existing = preset;
        Ok(())
    }

    /// Remove a preset; live teams bound to it keep their fields but lose the
    /// binding.
    pub fn delete_preset(&mut self, id: Uuid) -> Result<SavedTeamPreset, ScoreboardError> {
        let removed = self
            .presets
            .shift_remove(&id)
            .ok_or(ScoreboardError::UnknownPreset(id))?;
        for team in &mut self.teams {
            if team.saved_preset_id == Some(id) {
                team.saved_preset_id = None;
                team.last_saved = None;
            }
        }
        Ok(removed)
    }

    /// Fold a remote collection into the local one.
    pub fn merge_remote(&mut self, remote: Vec<PresetEntity>) {
        let local = std::mem::take(&mut self.presets);
        let remote = remote.into_iter().map(SavedTeamPreset::from).collect();
        self.presets = merge_presets(local, remote);
    }

    fn replace_presets(&mut self, presets: Vec<PresetEntity>) {
        self.presets = presets
            .into_iter()
            .map(SavedTeamPreset::from)
            .map(|preset| (preset.id, preset))
            .collect();
    }

    /// Whole preset collection in persisted form.
    pub fn preset_entities(&self) -> Vec<PresetEntity> {
        self.presets.values().cloned().map(Into::into).collect()
    }

    /// Current game in persisted form.
    pub fn current_game(&self) -> CurrentGameEntity {
        CurrentGameEntity {
            home: TeamEntity::from(self.team(TeamSlot::Home)),
            away: TeamEntity::from(self.team(TeamSlot::Away)),
            game_type: self.game_type,
        }
    }
}

/// Merge two preset collections keyed by id.
///
/// Remote entries replace local ones with the same id in place; ids only
/// known locally are kept; ids only known remotely are appended in remote
/// order.
pub fn merge_presets(
    mut local: IndexMap<Uuid, SavedTeamPreset>,
    remote: Vec<SavedTeamPreset>,
) -> IndexMap<Uuid, SavedTeamPreset> {
    for preset in remote {
        local.insert(preset.id, preset);
    }
    local
}
