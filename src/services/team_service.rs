use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        local_store::{self, LoadError},
        models::PresetEntity,
    },
    dto::{game::GameSummary, preset::PresetSummary},
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        game::{GameType, SavedTeamPreset, TeamSlot, TeamStyle},
        scoreboard::{Scoreboard, ScoreboardError, StoreChange},
    },
};

/// Restore the current game and the presets from the local store.
///
/// Each blob falls back to defaults on its own, so a corrupted game snapshot
/// does not cost the saved presets. Remote reconciliation is left to the sync
/// supervisor.
pub async fn load_on_startup(state: &SharedState) {
    let local = state.local_store();
    let game = local_store::load_current_game(local)
        .await
        .map(Some)
        .unwrap_or_else(|err: LoadError| err.recover(|| None));
    let presets = local_store::load_presets(local)
        .await
        .unwrap_or_else(|err| err.recover(Vec::new));

    let mut board = state.scoreboard().write().await;
    *board = Scoreboard::restore(state.config().team_defaults(), game, presets);
    info!(
        game_type = ?board.game_type(),
        presets = board.preset_entities().len(),
        "scoreboard restored from local store"
    );
}

/// Snapshot of the current game.
pub async fn game_summary(state: &SharedState) -> GameSummary {
    let board = state.scoreboard().read().await;
    GameSummary::from_scoreboard(&board, state.is_remote_available())
}

/// Zero both scores.
pub async fn new_game(state: &SharedState) -> Result<GameSummary, ServiceError> {
    mutate_game(state, StoreChange::Teams, |board| {
        board.new_game();
        Ok(())
    })
    .await
}

/// Exchange the home and away teams.
pub async fn swap_teams(state: &SharedState) -> Result<GameSummary, ServiceError> {
    mutate_game(state, StoreChange::Teams, |board| {
        board.swap_teams();
        Ok(())
    })
    .await
}

/// Select the sport and publish its presets.
pub async fn set_game_type(
    state: &SharedState,
    game_type: GameType,
) -> Result<GameSummary, ServiceError> {
    let summary = mutate_game(state, StoreChange::GameType, |board| {
        board.set_game_type(game_type);
        Ok(())
    })
    .await?;

    let presets = get_presets(state, Some(game_type)).await;
    sse_events::broadcast_presets_changed(state, game_type, presets);
    Ok(summary)
}

/// Edit name and colors of a live team.
pub async fn update_team(
    state: &SharedState,
    slot: TeamSlot,
    style: TeamStyle,
) -> Result<GameSummary, ServiceError> {
    mutate_game(state, StoreChange::Teams, |board| {
        board.update_team(slot, style);
        Ok(())
    })
    .await
}

/// Load a saved preset into a live team.
pub async fn apply_preset(
    state: &SharedState,
    slot: TeamSlot,
    preset_id: Uuid,
) -> Result<GameSummary, ServiceError> {
    mutate_game(state, StoreChange::Teams, |board| {
        board.apply_preset(slot, preset_id)
    })
    .await
}

/// Replace a live team with a blank, unbound one.
pub async fn create_new_team(
    state: &SharedState,
    slot: TeamSlot,
) -> Result<GameSummary, ServiceError> {
    mutate_game(state, StoreChange::Teams, |board| {
        board.create_new_team(slot);
        Ok(())
    })
    .await
}

/// Whether a live team differs from its last save.
pub async fn has_unsaved_changes(state: &SharedState, slot: TeamSlot) -> bool {
    state.scoreboard().read().await.has_unsaved_changes(slot)
}

/// Save a live team as a preset, overwriting the preset it is bound to.
///
/// The local write must succeed before the scoreboard changes; the remote push
/// is best-effort.
pub async fn save_team(
    state: &SharedState,
    slot: TeamSlot,
    game_type: Option<GameType>,
) -> Result<PresetSummary, ServiceError> {
    let (saved, entities, summary) = {
        let mut board = state.scoreboard().write().await;
        let mut staged = board.clone();
        let game_type = game_type.unwrap_or(staged.game_type());
        let saved = staged.save_team(slot, game_type);
        let entities = persist_presets(state, &staged).await?;
        *board = staged;
        persist_current_game(state, &board).await;
        let summary = GameSummary::from_scoreboard(&board, state.is_remote_available());
        (saved, entities, summary)
    };
    info!(preset_id = %saved.id, name = %saved.style.name, "team saved as preset");

    push_presets(state, entities).await;
    sse_events::broadcast_game_changed(state, &summary);
    announce_presets(state).await;
    Ok(saved.into())
}

/// Presets of a sport in insertion order; defaults to the selected sport.
pub async fn get_presets(state: &SharedState, game_type: Option<GameType>) -> Vec<PresetSummary> {
    let board = state.scoreboard().read().await;
    let game_type = game_type.unwrap_or(board.game_type());
    board
        .presets_for(game_type)
        .into_iter()
        .map(PresetSummary::from)
        .collect()
}

/// Overwrite a preset by id.
pub async fn update_preset(
    state: &SharedState,
    id: Uuid,
    style: TeamStyle,
    game_type: GameType,
) -> Result<PresetSummary, ServiceError> {
    let preset = SavedTeamPreset {
        id,
        style,
        game_type,
    };
    let entities = {
        let mut board = state.scoreboard().write().await;
        let mut staged = board.clone();
        staged.update_preset(preset.clone())?;
        let entities = persist_presets(state, &staged).await?;
        *board = staged;
        entities
    };

    push_presets(state, entities).await;
    announce_presets(state).await;
    Ok(preset.into())
}

/// Delete a preset by id.
pub async fn delete_preset(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let entities = {
        let mut board = state.scoreboard().write().await;
        let mut staged = board.clone();
        let removed = staged.delete_preset(id)?;
        let entities = persist_presets(state, &staged).await?;
        *board = staged;
        debug!(preset_id = %removed.id, "preset deleted");
        persist_current_game(state, &board).await;
        entities
    };

    push_presets(state, entities).await;
    announce_presets(state).await;
    Ok(())
}

/// Fetch the remote collection and merge it into the local one, remote entries
/// winning on id collision. Does nothing while running local-only.
pub async fn refresh_from_remote(state: &SharedState) {
    let Some(remote) = state.remote_store().await else {
        debug!("local-only mode; skipping remote refresh");
        return;
    };

    let fetched = match remote.fetch_presets().await {
        Ok(presets) => presets,
        Err(err) => {
            warn!(error = %err, "failed to fetch remote presets; keeping local copy");
            return;
        }
    };

    {
        let mut board = state.scoreboard().write().await;
        let received = fetched.len();
        board.merge_remote(fetched);
        let entities = board.preset_entities();
        if let Err(err) = local_store::save_presets(state.local_store(), &entities).await {
            warn!(error = %err, "failed to store merged presets locally");
        }
        info!(received, merged = entities.len(), "presets merged from remote store");
    }

    announce_presets(state).await;
}

/// Write the current game snapshot, logging failures.
pub(crate) async fn persist_current_game(state: &SharedState, board: &Scoreboard) {
    if let Err(err) = local_store::save_current_game(state.local_store(), &board.current_game()).await
    {
        warn!(error = %err, "failed to autosave current game");
    }
}

/// Write the preset collection of `board`. Callers stage preset changes on a
/// copy of the board and commit it only once this succeeded.
async fn persist_presets(
    state: &SharedState,
    board: &Scoreboard,
) -> Result<Vec<PresetEntity>, ServiceError> {
    let entities = board.preset_entities();
    local_store::save_presets(state.local_store(), &entities).await?;
    Ok(entities)
}

async fn push_presets(state: &SharedState, presets: Vec<PresetEntity>) {
    let Some(remote) = state.remote_store().await else {
        debug!("local-only mode; preset push skipped");
        return;
    };
    if let Err(err) = remote.save_presets(presets).await {
        warn!(error = %err, "failed to push presets; local copy stays authoritative");
    }
}

async fn announce_presets(state: &SharedState) {
    let game_type = state.scoreboard().read().await.game_type();
    let presets = get_presets(state, Some(game_type)).await;
    sse_events::broadcast_presets_changed(state, game_type, presets);
    state.notify(StoreChange::Presets);
}

/// Apply a team or game type mutation, autosave the current game and publish
/// the new snapshot.
async fn mutate_game<F>(
    state: &SharedState,
    change: StoreChange,
    mutate: F,
) -> Result<GameSummary, ServiceError>
where
    F: FnOnce(&mut Scoreboard) -> Result<(), ScoreboardError>,
{
    let summary = {
        let mut board = state.scoreboard().write().await;
        mutate(&mut board)?;
        persist_current_game(state, &board).await;
        GameSummary::from_scoreboard(&board, state.is_remote_available())
    };
    sse_events::broadcast_game_changed(state, &summary);
    state.notify(change);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            local_store::{LocalStore, MemoryLocalStore, SAVED_TEAMS_KEY},
            remote_store::{MemoryRemoteStore, RemoteStore},
        },
        state::{
            AppState,
            game::{Rgba, TeamSlot},
        },
    };

    fn setup() -> (SharedState, MemoryLocalStore) {
        let local = MemoryLocalStore::new();
        let state = AppState::new(AppConfig::default(), Arc::new(local.clone()));
        (state, local)
    }

    fn style(name: &str) -> TeamStyle {
        TeamStyle {
            name: name.to_string(),
            primary_color: Rgba::opaque(0.2, 0.4, 0.6),
            secondary_color: Rgba::opaque(0.8, 0.1, 0.1),
            font_color: Rgba::WHITE,
        }
    }

    fn entity(id: u128, name: &str) -> PresetEntity {
        SavedTeamPreset {
            id: Uuid::from_u128(id),
            style: style(name),
            game_type: GameType::Hockey,
        }
        .into()
    }

    #[tokio::test]
    async fn first_launch_uses_defaults() {
        let (state, _local) = setup();

        load_on_startup(&state).await;

        let summary = game_summary(&state).await;
        assert_eq!(summary.home.name, "Home");
        assert_eq!(summary.away.name, "Away");
        assert_eq!(summary.game_type, GameType::Hockey);
        assert!(get_presets(&state, None).await.is_empty());
    }

    #[tokio::test]
    async fn corrupted_game_blob_keeps_saved_presets() {
        let (state, local) = setup();
        local
            .set("current_game", b"{ not json".to_vec())
            .await
            .expect("memory write");
        local_store::save_presets(&local, &[entity(1, "Sharks")])
            .await
            .expect("memory write");

        load_on_startup(&state).await;

        assert_eq!(game_summary(&state).await.home.name, "Home");
        let presets = get_presets(&state, Some(GameType::Hockey)).await;
        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].style.name, "Sharks");
    }

    #[tokio::test]
    async fn team_edits_are_autosaved() {
        let (state, local) = setup();

        update_team(&state, TeamSlot::Away, style("Tigers"))
            .await
            .expect("update succeeds");
        set_game_type(&state, GameType::Soccer)
            .await
            .expect("game type set");

        let stored = local_store::load_current_game(&local)
            .await
            .expect("snapshot stored");
        assert_eq!(stored.away.name, "Tigers");
        assert_eq!(stored.game_type, GameType::Soccer);
    }

    #[tokio::test]
    async fn saved_team_round_trips_through_presets() {
        let (state, local) = setup();
        let remote = MemoryRemoteStore::new();
        state.install_remote_store(Arc::new(remote.clone())).await;
        update_team(&state, TeamSlot::Home, style("Sharks"))
            .await
            .expect("update succeeds");

        let saved = save_team(&state, TeamSlot::Home, Some(GameType::Basketball))
            .await
            .expect("save succeeds");

        let listed = get_presets(&state, Some(GameType::Basketball)).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, saved.id);
        assert_eq!(TeamStyle::from(listed[0].style.clone()), style("Sharks"));
        assert!(!has_unsaved_changes(&state, TeamSlot::Home).await);

        let stored = local_store::load_presets(&local).await.expect("stored");
        assert_eq!(stored.len(), 1);
        assert_eq!(remote.record().map(|r| r.len()), Some(1));
    }

    #[tokio::test]
    async fn rejected_push_keeps_local_copy() {
        let (state, local) = setup();
        let remote = MemoryRemoteStore::new();
        remote.set_reject_writes(true);
        state.install_remote_store(Arc::new(remote.clone())).await;

        save_team(&state, TeamSlot::Away, None)
            .await
            .expect("local save still succeeds");

        assert!(remote.record().is_none());
        let stored = local.get(SAVED_TEAMS_KEY).await.expect("memory read");
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn refresh_merges_remote_over_local() {
        let (state, local) = setup();
        local_store::save_presets(&local, &[entity(1, "A"), entity(2, "B")])
            .await
            .expect("memory write");
        load_on_startup(&state).await;

        let remote = MemoryRemoteStore::new();
        remote
            .save_presets(vec![entity(2, "B'"), entity(3, "C")])
            .await
            .expect("seed remote");
        state.install_remote_store(Arc::new(remote)).await;

        refresh_from_remote(&state).await;

        let names: Vec<_> = get_presets(&state, Some(GameType::Hockey))
            .await
            .into_iter()
            .map(|p| p.style.name)
            .collect();
        assert_eq!(names, ["A", "B'", "C"]);
        let stored = local_store::load_presets(&local).await.expect("stored");
        assert_eq!(stored.len(), 3);
    }

    #[tokio::test]
    async fn refresh_without_remote_is_a_no_op() {
        let (state, _local) = setup();
        save_team(&state, TeamSlot::Home, None)
            .await
            .expect("save succeeds");

        refresh_from_remote(&state).await;

        assert_eq!(get_presets(&state, None).await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_preset_is_not_found() {
        let (state, _local) = setup();

        let deleted = delete_preset(&state, Uuid::from_u128(42)).await;
        let applied = apply_preset(&state, TeamSlot::Home, Uuid::from_u128(42)).await;

        assert!(matches!(deleted, Err(ServiceError::NotFound(_))));
        assert!(matches!(applied, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn new_game_and_swap_touch_only_bindings_and_scores() {
        let (state, _local) = setup();
        {
            let mut board = state.scoreboard().write().await;
            board.increment(TeamSlot::Home, 3);
        }

        let swapped = swap_teams(&state).await.expect("swap succeeds");
        assert_eq!(swapped.away.name, "Home");
        assert_eq!(swapped.away.score, 3);

        let fresh = new_game(&state).await.expect("new game succeeds");
        assert_eq!(fresh.home.score, 0);
        assert_eq!(fresh.away.score, 0);
        assert_eq!(fresh.away.name, "Home");
    }

    #[tokio::test]
    async fn failed_local_write_leaves_presets_untouched() {
        let (state, local) = setup();
        save_team(&state, TeamSlot::Away, None)
            .await
            .expect("save succeeds");
        let kept = get_presets(&state, None).await[0].id;
        local.set_reject_writes(true);

        let saved = save_team(&state, TeamSlot::Home, None).await;
        let updated = update_preset(&state, kept, style("Renamed"), GameType::Hockey).await;
        let deleted = delete_preset(&state, kept).await;

        assert!(matches!(saved, Err(ServiceError::Unavailable(_))));
        assert!(matches!(updated, Err(ServiceError::Unavailable(_))));
        assert!(matches!(deleted, Err(ServiceError::Unavailable(_))));

        let board = state.scoreboard().read().await;
        assert_eq!(board.presets_for(GameType::Hockey).len(), 1);
        assert_eq!(board.preset(kept).map(|p| p.style.name.as_str()), Some("Away"));
        assert_eq!(board.team(TeamSlot::Away).saved_preset_id, Some(kept));
        assert_eq!(board.team(TeamSlot::Home).saved_preset_id, None);
        assert!(board.has_unsaved_changes(TeamSlot::Home));
        drop(board);

        local.set_reject_writes(false);
        delete_preset(&state, kept).await.expect("retried delete succeeds");
        assert!(get_presets(&state, None).await.is_empty());
    }
}
