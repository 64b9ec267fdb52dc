use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::common::ColorDto,
    state::{
        game::Rgba,
        live_activity::{ActivityContent, ActivitySession},
    },
};

/// Team presentation shown by the ambient display.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ActivityTeam {
    pub name: String,
    pub primary_color: ColorDto,
    pub secondary_color: ColorDto,
    pub font_color: ColorDto,
}

impl ActivityTeam {
    fn new(name: &str, [primary, secondary, font]: [Rgba; 3]) -> Self {
        Self {
            name: name.to_string(),
            primary_color: primary.into(),
            secondary_color: secondary.into(),
            font_color: font.into(),
        }
    }
}

/// Changing part of the ambient display.
#[derive(Clone, Copy, Debug, Serialize, ToSchema)]
pub struct ActivityScores {
    pub home_team_score: u32,
    pub away_team_score: u32,
}

impl From<ActivityContent> for ActivityScores {
    fn from(value: ActivityContent) -> Self {
        Self {
            home_team_score: value.home_team_score,
            away_team_score: value.away_team_score,
        }
    }
}

/// A running ambient display session.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ActivitySummary {
    pub id: Uuid,
    pub home: ActivityTeam,
    pub away: ActivityTeam,
    pub content: ActivityScores,
}

impl From<ActivitySession> for ActivitySummary {
    fn from(value: ActivitySession) -> Self {
        let attributes = value.attributes;
        Self {
            id: value.id,
            home: ActivityTeam::new(&attributes.home_team_name, attributes.home_colors),
            away: ActivityTeam::new(&attributes.away_team_name, attributes.away_colors),
            content: value.content.into(),
        }
    }
}

/// Support flag and running session.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ActivityStatus {
    pub enabled: bool,
    pub session: Option<ActivitySummary>,
}
