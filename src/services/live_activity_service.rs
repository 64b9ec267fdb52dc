use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::{
    dto::live_activity::{ActivityStatus, ActivitySummary},
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        live_activity::{ActivityAttributes, ActivityContent, ActivityStart, ActivityTransition},
        scoreboard::StoreChange,
    },
};

/// Support flag and running session.
pub async fn status(state: &SharedState) -> ActivityStatus {
    let activity = state.live_activity().lock().await;
    ActivityStatus {
        enabled: activity.is_enabled(),
        session: activity.session().cloned().map(ActivitySummary::from),
    }
}

/// Start an ambient display for the current teams, or refresh the running one.
pub async fn start(state: &SharedState) -> Result<ActivitySummary, ServiceError> {
    let (attributes, content) = {
        let board = state.scoreboard().read().await;
        (
            ActivityAttributes::from_scoreboard(&board),
            ActivityContent::from_scoreboard(&board),
        )
    };

    let started = state
        .live_activity()
        .lock()
        .await
        .start(attributes, content)
        .ok_or_else(|| ServiceError::InvalidState("live activities are disabled".into()))?;

    if let ActivityStart::Started(session) = &started {
        info!(activity_id = %session.id, "live activity started");
    }
    let summary = ActivitySummary::from(started.session().clone());
    sse_events::broadcast_activity(state, started.into());
    Ok(summary)
}

/// Push the current scores to the running session, if any.
pub async fn sync_scores(state: &SharedState) -> Option<ActivitySummary> {
    let content = ActivityContent::from_scoreboard(&*state.scoreboard().read().await);
    let session = state.live_activity().lock().await.update(content)?;
    let summary = ActivitySummary::from(session.clone());
    sse_events::broadcast_activity(state, ActivityTransition::Updated(session));
    Some(summary)
}

/// Close the running session.
pub async fn end(state: &SharedState) -> Result<(), ServiceError> {
    let id = state
        .live_activity()
        .lock()
        .await
        .end()
        .ok_or_else(|| ServiceError::NotFound("no live activity running".into()))?;
    info!(activity_id = %id, "live activity ended");
    sse_events::broadcast_activity(state, ActivityTransition::Ended(id));
    Ok(())
}

/// Mirror score changes into the running session until the state is dropped.
///
/// The subscription is taken when this is called, not when the future is first polled.
pub fn run(state: SharedState) -> impl Future<Output = ()> + Send + 'static {
    let mut changes = state.subscribe_changes();
    async move {
        loop {
            match changes.recv().await {
                Ok(StoreChange::Score(_) | StoreChange::Teams) | Err(RecvError::Lagged(_)) => {
                    if sync_scores(&state).await.is_some() {
                        debug!("live activity scores refreshed");
                    }
                }
                Ok(StoreChange::GameType | StoreChange::Presets) => {}
                Err(RecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::local_store::MemoryLocalStore,
        state::{AppState, game::TeamSlot},
    };

    fn setup() -> SharedState {
        AppState::new(AppConfig::default(), Arc::new(MemoryLocalStore::new()))
    }

    #[tokio::test]
    async fn start_then_start_again_keeps_the_session() {
        let state = setup();

        let first = start(&state).await.expect("started");
        state
            .scoreboard()
            .write()
            .await
            .increment(TeamSlot::Home, 2);
        let second = start(&state).await.expect("updated");

        assert_eq!(first.id, second.id);
        assert_eq!(second.content.home_team_score, 2);
        assert_eq!(second.home.name, "Home");
    }

    #[tokio::test]
    async fn end_without_session_is_not_found() {
        let state = setup();
        assert!(matches!(end(&state).await, Err(ServiceError::NotFound(_))));

        start(&state).await.expect("started");
        end(&state).await.expect("ended");
        assert!(status(&state).await.session.is_none());
    }

    #[tokio::test]
    async fn score_changes_reach_the_running_session() {
        let state = setup();
        start(&state).await.expect("started");
        let mut public = state.public_sse().subscribe();
        tokio::spawn(run(state.clone()));

        state
            .scoreboard()
            .write()
            .await
            .increment(TeamSlot::Away, 1);
        state.notify(StoreChange::Score(TeamSlot::Away));

        let event = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                let event = public.recv().await.expect("public stream open");
                if event.event.as_deref() == Some("activity.updated") {
                    return event;
                }
            }
        })
        .await
        .expect("activity update published");
        assert!(event.data.contains(r#""away_team_score":1"#));
    }

    #[tokio::test]
    async fn disabled_mirror_is_a_conflict() {
        let mut config = AppConfig::default();
        config.live_activities_enabled = false;
        let state = AppState::new(config, Arc::new(MemoryLocalStore::new()));

        assert!(matches!(
            start(&state).await,
            Err(ServiceError::InvalidState(_))
        ));
        assert!(!status(&state).await.enabled);
    }

    #[tokio::test]
    async fn restarting_publishes_an_update_not_a_second_start() {
        let state = setup();
        let mut public = state.public_sse().subscribe();

        start(&state).await.expect("started");
        start(&state).await.expect("resumed");

        let first = public.recv().await.expect("first event");
        let second = public.recv().await.expect("second event");
        assert_eq!(first.event.as_deref(), Some("activity.started"));
        assert_eq!(second.event.as_deref(), Some("activity.updated"));
    }
}
