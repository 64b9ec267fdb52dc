//! Turns panel input into score mutations and feedback.

use tracing::debug;

use crate::{
    dto::panel::PanelSummary,
    services::{feedback_service, sse_events, team_service},
    state::{
        SharedState,
        feedback::Feedback,
        game::PanelSide,
        gesture::{GestureEffect, GestureSample, PanelContext, PanelLayout, Point},
        scoreboard::{ScoreOutcome, StoreChange},
    },
};

/// Feed one drag sample to the panel's engine and apply what it produced.
pub async fn handle_gesture(
    state: &SharedState,
    side: PanelSide,
    sample: GestureSample,
) -> PanelSummary {
    let ctx = panel_context(state, side).await;
    let effects = state.panel_mut(side).engine.handle_sample(&sample, &ctx);
    apply_effects(state, side, effects).await;
    panel_summary(state, side).await
}

/// Feed a tap to the panel's engine and apply what it produced.
pub async fn handle_tap(state: &SharedState, side: PanelSide, location: Point) -> PanelSummary {
    let ctx = panel_context(state, side).await;
    let effects = state.panel_mut(side).engine.on_tap(location, &ctx);
    apply_effects(state, side, effects).await;
    panel_summary(state, side).await
}

/// Record the geometry the client renders the panel with.
pub async fn set_layout(state: &SharedState, side: PanelSide, layout: PanelLayout) -> PanelSummary {
    state.panel_mut(side).layout = layout;
    debug!(?side, ?layout, "panel layout updated");
    panel_summary(state, side).await
}

/// Current state of a panel.
pub async fn panel_summary(state: &SharedState, side: PanelSide) -> PanelSummary {
    let score = state.scoreboard().read().await.team(side.slot()).score;
    let panel = state.panel_mut(side);
    PanelSummary {
        side,
        score,
        offset: panel.engine.offset(),
        locked: panel.engine.is_locked(),
        basketball_phase: panel.engine.basketball_phase(),
        layout: panel.layout.into(),
    }
}

async fn panel_context(state: &SharedState, side: PanelSide) -> PanelContext {
    let layout = state.panel_mut(side).layout;
    let board = state.scoreboard().read().await;
    PanelContext {
        layout,
        side,
        game_type: board.game_type(),
        score: board.team(side.slot()).score,
    }
}

async fn apply_effects(state: &SharedState, side: PanelSide, effects: Vec<GestureEffect>) {
    let sink = state.feedback();
    for effect in effects {
        match effect {
            GestureEffect::Offset(offset) => sink.emit(side, Feedback::Offset(offset)),
            GestureEffect::TargetsShown {
                two_point,
                three_point,
            } => sink.emit(
                side,
                Feedback::TargetsShown {
                    two_point,
                    three_point,
                },
            ),
            GestureEffect::TargetStruck(target) => sink.emit(side, Feedback::TargetStruck(target)),
            GestureEffect::TargetsHidden { fade } => {
                sink.emit(side, Feedback::TargetsHidden { fade })
            }
            GestureEffect::Increment { points } => {
                change_score(state, side, ScoreChange::Add(points)).await;
            }
            GestureEffect::Decrement => {
                change_score(state, side, ScoreChange::RemoveOne).await;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ScoreChange {
    Add(u32),
    RemoveOne,
}

/// Mutate the score, autosave, then fan out pulses, flash and the public event.
/// A rejected decrement only produces an error notification.
async fn change_score(state: &SharedState, side: PanelSide, change: ScoreChange) -> ScoreOutcome {
    let slot = side.slot();
    let (outcome, secondary) = {
        let mut board = state.scoreboard().write().await;
        let outcome = match change {
            ScoreChange::Add(points) => board.increment(slot, points),
            ScoreChange::RemoveOne => board.decrement(slot),
        };
        if outcome != ScoreOutcome::Rejected {
            team_service::persist_current_game(state, &board).await;
        }
        (outcome, board.team(slot).style.secondary_color)
    };

    let sink = state.feedback();
    match outcome {
        ScoreOutcome::Rejected => {
            debug!(?slot, "decrement rejected at zero");
            sink.emit(side, Feedback::Error);
        }
        ScoreOutcome::Changed { score } => {
            let pulses = match change {
                ScoreChange::Add(points) => points,
                ScoreChange::RemoveOne => 1,
            };
            {
                let mut panel = state.panel_mut(side);
                feedback_service::schedule_pulses(sink.clone(), &mut panel.pulses, side, pulses);
            }
            feedback_service::flash(sink.as_ref(), side, secondary);
            sse_events::broadcast_score_changed(state, slot, score);
            state.notify(StoreChange::Score(slot));
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::local_store::{self, MemoryLocalStore},
        services::feedback_service::testing::RecordingSink,
        state::{
            AppState,
            feedback::{FLASH_OPACITY, PULSE_INTENSITY},
            game::{GameType, Rgba, TeamSlot},
            gesture::{GesturePhase, TargetKind, Translation},
        },
    };

    const CENTRE: Point = Point::new(200.0, 400.0);

    fn setup() -> (SharedState, Arc<RecordingSink>, MemoryLocalStore) {
        let local = MemoryLocalStore::new();
        let sink = Arc::new(RecordingSink::default());
        let state =
            AppState::with_feedback_sink(AppConfig::default(), Arc::new(local.clone()), sink.clone());
        (state, sink, local)
    }

    fn drag(location: Point, width: f64, height: f64) -> GestureSample {
        GestureSample {
            location,
            translation: Translation { width, height },
            phase: GesturePhase::Changed,
        }
    }

    fn release() -> GestureSample {
        GestureSample {
            location: CENTRE,
            translation: Translation::default(),
            phase: GesturePhase::Ended,
        }
    }

    async fn score(state: &SharedState, slot: TeamSlot) -> u32 {
        state.scoreboard().read().await.team(slot).score
    }

    fn impacts(signals: &[(PanelSide, Feedback)]) -> usize {
        signals
            .iter()
            .filter(|(_, f)| matches!(f, Feedback::Impact { .. }))
            .count()
    }

    #[tokio::test]
    async fn upward_swipe_scores_once_and_autosaves() {
        let (state, sink, local) = setup();

        handle_gesture(&state, PanelSide::Left, drag(CENTRE, 0.0, -60.0)).await;
        handle_gesture(&state, PanelSide::Left, drag(CENTRE, 0.0, -130.0)).await;
        let summary = handle_gesture(&state, PanelSide::Left, drag(CENTRE, 0.0, -200.0)).await;

        assert_eq!(summary.score, 1);
        assert!(summary.locked);
        assert_eq!(score(&state, TeamSlot::Home).await, 1);
        let stored = local_store::load_current_game(&local)
            .await
            .expect("autosaved");
        assert_eq!(stored.home.score, 1);

        let signals = sink.take();
        assert!(signals.contains(&(
            PanelSide::Left,
            Feedback::Flash {
                color: Rgba::BLUE.with_alpha(FLASH_OPACITY),
                duration: crate::state::feedback::FLASH_DURATION,
            }
        )));

        let summary = handle_gesture(&state, PanelSide::Left, release()).await;
        assert!(!summary.locked);
        assert_eq!(summary.offset, 0.0);
    }

    #[tokio::test]
    async fn decrement_at_zero_fires_error_feedback_only() {
        let (state, sink, local) = setup();

        handle_gesture(&state, PanelSide::Right, drag(CENTRE, 0.0, 130.0)).await;

        assert_eq!(score(&state, TeamSlot::Away).await, 0);
        let signals = sink.take();
        assert!(signals.contains(&(PanelSide::Right, Feedback::Error)));
        assert_eq!(impacts(&signals), 0);
        assert!(local_store::load_current_game(&local).await.is_err());
    }

    #[tokio::test]
    async fn swipe_starting_outside_the_zone_never_scores() {
        let (state, _sink, _local) = setup();
        let corner = Point::new(10.0, 10.0);

        handle_gesture(&state, PanelSide::Left, drag(corner, 0.0, -60.0)).await;
        handle_gesture(&state, PanelSide::Left, drag(corner, 0.0, -200.0)).await;

        assert_eq!(score(&state, TeamSlot::Home).await, 0);
    }

    #[tokio::test]
    async fn tap_inside_zone_adds_a_point() {
        let (state, _sink, _local) = setup();

        handle_tap(&state, PanelSide::Right, CENTRE).await;
        handle_tap(&state, PanelSide::Right, Point::new(5.0, 5.0)).await;

        assert_eq!(score(&state, TeamSlot::Away).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn three_point_target_awards_three_pulses() {
        let (state, sink, _local) = setup();
        state
            .scoreboard()
            .write()
            .await
            .set_game_type(GameType::Basketball);
        let target = TargetKind::ThreePoint.position(&PanelLayout::default(), PanelSide::Left);

        handle_gesture(&state, PanelSide::Left, drag(CENTRE, 0.0, -40.0)).await;
        handle_gesture(&state, PanelSide::Left, drag(target, -140.0, -90.0)).await;
        handle_gesture(&state, PanelSide::Left, release()).await;

        assert_eq!(score(&state, TeamSlot::Home).await, 3);

        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        let signals = sink.take();
        assert_eq!(impacts(&signals), 3);
        assert!(signals.contains(&(
            PanelSide::Left,
            Feedback::Impact {
                intensity: PULSE_INTENSITY
            }
        )));
        assert!(signals.contains(&(
            PanelSide::Left,
            Feedback::TargetStruck(TargetKind::ThreePoint)
        )));
    }

    #[tokio::test]
    async fn layout_changes_are_reported() {
        let (state, _sink, _local) = setup();
        let layout = PanelLayout {
            width: 300.0,
            height: 600.0,
            font_size: 120.0,
        };

        let summary = set_layout(&state, PanelSide::Right, layout).await;

        assert_eq!(summary.layout.font_size, 120.0);
        assert_eq!(state.panel_mut(PanelSide::Right).layout, layout);
    }
}
