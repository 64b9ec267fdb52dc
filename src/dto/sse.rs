use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{common::ColorDto, panel::PointDto, preset::PresetSummary},
    state::{
        game::{GameType, PanelSide, TeamSlot},
        gesture::TargetKind,
    },
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream (`public` or `feedback`).
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether presets are currently mirrored remotely.
    pub remote_available: bool,
    /// RFC 3339 timestamp of the subscription.
    pub connected_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when remote sync becomes available or is lost.
pub struct RemoteStatusEvent {
    pub available: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a team's score changed.
pub struct ScoreChangedEvent {
    pub slot: TeamSlot,
    pub score: u32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the preset collection changed.
pub struct PresetsChangedEvent {
    pub game_type: GameType,
    /// Presets of the selected sport.
    pub presets: Vec<PresetSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the ambient display session closed.
pub struct ActivityEndedEvent {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
/// Haptic impact pulse.
pub struct HapticImpactEvent {
    pub side: PanelSide,
    pub intensity: f64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Error notification for a rejected action.
pub struct HapticErrorEvent {
    pub side: PanelSide,
}

#[derive(Debug, Serialize, ToSchema)]
/// Confirmation flash of a panel background.
pub struct PanelFlashEvent {
    pub side: PanelSide,
    pub color: ColorDto,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Vertical offset of the score text.
pub struct PanelOffsetEvent {
    pub side: PanelSide,
    pub offset: f64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Basketball targets revealed and pulsing.
pub struct TargetsShownEvent {
    pub side: PanelSide,
    pub two_point: PointDto,
    pub three_point: PointDto,
}

#[derive(Debug, Serialize, ToSchema)]
/// A basketball target was struck.
pub struct TargetStruckEvent {
    pub side: PanelSide,
    pub target: TargetKind,
}

#[derive(Debug, Serialize, ToSchema)]
/// Basketball targets fading out.
pub struct TargetsHiddenEvent {
    pub side: PanelSide,
    pub fade_ms: u64,
}
