use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        game::GameSummary,
        live_activity::ActivitySummary,
        preset::PresetSummary,
        sse::{
            ActivityEndedEvent, PresetsChangedEvent, RemoteStatusEvent, ScoreChangedEvent,
            ServerEvent,
        },
    },
    state::{
        SharedState,
        game::{GameType, TeamSlot},
        live_activity::ActivityTransition,
    },
};

const EVENT_SCORE_CHANGED: &str = "score.changed";
const EVENT_GAME_CHANGED: &str = "game.changed";
const EVENT_PRESETS_CHANGED: &str = "presets.changed";
const EVENT_REMOTE_STATUS: &str = "remote.status";
const EVENT_ACTIVITY_STARTED: &str = "activity.started";
const EVENT_ACTIVITY_UPDATED: &str = "activity.updated";
const EVENT_ACTIVITY_ENDED: &str = "activity.ended";

/// Broadcast a new score for one slot.
pub fn broadcast_score_changed(state: &SharedState, slot: TeamSlot, score: u32) {
    send_public_event(state, EVENT_SCORE_CHANGED, &ScoreChangedEvent { slot, score });
}

/// Broadcast a snapshot of the whole game after teams or game type changed.
pub fn broadcast_game_changed(state: &SharedState, summary: &GameSummary) {
    send_public_event(state, EVENT_GAME_CHANGED, summary);
}

/// Broadcast the presets of the selected sport.
pub fn broadcast_presets_changed(
    state: &SharedState,
    game_type: GameType,
    presets: Vec<PresetSummary>,
) {
    let payload = PresetsChangedEvent { game_type, presets };
    send_public_event(state, EVENT_PRESETS_CHANGED, &payload);
}

/// Broadcast that remote sync became available or was lost.
pub fn broadcast_remote_status(state: &SharedState, available: bool) {
    send_public_event(state, EVENT_REMOTE_STATUS, &RemoteStatusEvent { available });
}

/// Broadcast an ambient display transition.
pub fn broadcast_activity(state: &SharedState, transition: ActivityTransition) {
    match transition {
        ActivityTransition::Started(session) => send_public_event(
            state,
            EVENT_ACTIVITY_STARTED,
            &ActivitySummary::from(session),
        ),
        ActivityTransition::Updated(session) => send_public_event(
            state,
            EVENT_ACTIVITY_UPDATED,
            &ActivitySummary::from(session),
        ),
        ActivityTransition::Ended(id) => {
            send_public_event(state, EVENT_ACTIVITY_ENDED, &ActivityEndedEvent { id })
        }
    }
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
