use uuid::Uuid;

use super::{
    game::{Rgba, TeamSlot},
    scoreboard::Scoreboard,
};

/// Fixed presentation of an ambient score display, taken when it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityAttributes {
    /// Home team name.
    pub home_team_name: String,
    /// Away team name.
    pub away_team_name: String,
    /// Home colors as primary, secondary, font.
    pub home_colors: [Rgba; 3],
    /// Away colors as primary, secondary, font.
    pub away_colors: [Rgba; 3],
}

impl ActivityAttributes {
    /// Capture the teams currently bound to the scoreboard slots.
    pub fn from_scoreboard(board: &Scoreboard) -> Self {
        let colors = |slot| {
            let style = &board.team(slot).style;
            [style.primary_color, style.secondary_color, style.font_color]
        };
        Self {
            home_team_name: board.team(TeamSlot::Home).style.name.clone(),
            away_team_name: board.team(TeamSlot::Away).style.name.clone(),
            home_colors: colors(TeamSlot::Home),
            away_colors: colors(TeamSlot::Away),
        }
    }
}

/// Changing part of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivityContent {
    /// Home score.
    pub home_team_score: u32,
    /// Away score.
    pub away_team_score: u32,
}

impl ActivityContent {
    /// Current scores of the scoreboard.
    pub fn from_scoreboard(board: &Scoreboard) -> Self {
        Self {
            home_team_score: board.team(TeamSlot::Home).score,
            away_team_score: board.team(TeamSlot::Away).score,
        }
    }
}

/// A running ambient display.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySession {
    /// Session key, used by display clients to address updates.
    pub id: Uuid,
    /// Fixed presentation.
    pub attributes: ActivityAttributes,
    /// Latest scores.
    pub content: ActivityContent,
}

/// Visible result of a live activity call.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityTransition {
    /// A new session began.
    Started(ActivitySession),
    /// The running session received new scores.
    Updated(ActivitySession),
    /// The session with this id was closed.
    Ended(Uuid),
}

/// Outcome of [`LiveActivity::start`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityStart {
    /// A new session began.
    Started(ActivitySession),
    /// A session was already running and received the new scores.
    Resumed(ActivitySession),
}

impl ActivityStart {
    /// Session the display now shows.
    pub fn session(&self) -> &ActivitySession {
        match self {
            ActivityStart::Started(session) | ActivityStart::Resumed(session) => session,
        }
    }
}

impl From<ActivityStart> for ActivityTransition {
    fn from(value: ActivityStart) -> Self {
        match value {
            ActivityStart::Started(session) => ActivityTransition::Started(session),
            ActivityStart::Resumed(session) => ActivityTransition::Updated(session),
        }
    }
}

/// At most one ambient display session at a time.
#[derive(Debug, Clone)]
pub struct LiveActivity {
    enabled: bool,
    session: Option<ActivitySession>,
}

impl LiveActivity {
    /// Mirror with no running session.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            session: None,
        }
    }

    /// Whether ambient displays are supported at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Running session, if any.
    pub fn session(&self) -> Option<&ActivitySession> {
        self.session.as_ref()
    }

    /// Begin a session. An already running session is updated instead and
    /// keeps its original attributes.
    pub fn start(
        &mut self,
        attributes: ActivityAttributes,
        content: ActivityContent,
    ) -> Option<ActivityStart> {
        if !self.enabled {
            return None;
        }
        if let Some(session) = self.session.as_mut() {
            session.content = content;
            return Some(ActivityStart::Resumed(session.clone()));
        }

        let session = ActivitySession {
            id: Uuid::new_v4(),
            attributes,
            content,
        };
        self.session = Some(session.clone());
        Some(ActivityStart::Started(session))
    }

    /// Push new scores to the running session; nothing happens without one.
    pub fn update(&mut self, content: ActivityContent) -> Option<ActivitySession> {
        let session = self.session.as_mut()?;
        session.content = content;
        Some(session.clone())
    }

    /// Close the running session and return its id.
    pub fn end(&mut self) -> Option<Uuid> {
        self.session.take().map(|session| session.id)
    }
}
