pub mod feedback;
pub mod game;
pub mod gesture;
pub mod live_activity;
pub mod scoreboard;
mod sse;

use std::sync::Arc;

use dashmap::{DashMap, mapref::one::RefMut};
use tokio::sync::{Mutex, RwLock, broadcast, watch};

use crate::{
    config::AppConfig,
    dao::{local_store::LocalStore, remote_store::RemoteStore},
    services::feedback_service::SseFeedbackSink,
};

pub use self::sse::SseHub;
use self::{
    feedback::{FeedbackSink, PulseChain},
    game::PanelSide,
    gesture::{GestureEngine, PanelLayout},
    live_activity::LiveActivity,
    scoreboard::{Scoreboard, StoreChange},
    sse::SseState,
};

pub type SharedState = Arc<AppState>;

/// Gesture state owned by one score panel.
#[derive(Debug, Default)]
pub struct PanelState {
    /// Gesture state machine.
    pub engine: GestureEngine,
    /// Geometry reported by the client.
    pub layout: PanelLayout,
    /// Haptic pulse timing, never reset between gestures.
    pub pulses: PulseChain,
}

impl PanelState {
    fn with_layout(layout: PanelLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }
}

/// Central application state: the scoreboard, its stores, the panels and the
/// SSE fan-out.
pub struct AppState {
    config: AppConfig,
    scoreboard: RwLock<Scoreboard>,
    local_store: Arc<dyn LocalStore>,
    remote_store: RwLock<Option<Arc<dyn RemoteStore>>>,
    remote_available: watch::Sender<bool>,
    panels: DashMap<PanelSide, PanelState>,
    live_activity: Mutex<LiveActivity>,
    changes: broadcast::Sender<StoreChange>,
    sse: SseState,
    feedback: Arc<dyn FeedbackSink>,
}

impl AppState {
    /// Construct the state with feedback published on the feedback SSE stream.
    ///
    /// The application starts local-only until a remote store is installed.
    pub fn new(config: AppConfig, local_store: Arc<dyn LocalStore>) -> SharedState {
        let sse = SseState::new(32, 64);
        let sink = Arc::new(SseFeedbackSink::new(sse.feedback().clone()));
        Self::build(config, local_store, sse, sink)
    }

    /// Construct the state with a custom feedback destination.
    pub fn with_feedback_sink(
        config: AppConfig,
        local_store: Arc<dyn LocalStore>,
        sink: Arc<dyn FeedbackSink>,
    ) -> SharedState {
        Self::build(config, local_store, SseState::new(32, 64), sink)
    }

    fn build(
        config: AppConfig,
        local_store: Arc<dyn LocalStore>,
        sse: SseState,
        feedback: Arc<dyn FeedbackSink>,
    ) -> SharedState {
        let (remote_available, _rx) = watch::channel(false);
        let (changes, _rx) = broadcast::channel(32);

        let panels = DashMap::new();
        for side in [PanelSide::Left, PanelSide::Right] {
            panels.insert(side, PanelState::with_layout(config.panel_layout()));
        }

        Arc::new(Self {
            scoreboard: RwLock::new(Scoreboard::new(config.team_defaults())),
            live_activity: Mutex::new(LiveActivity::new(config.live_activities_enabled)),
            config,
            local_store,
            remote_store: RwLock::new(None),
            remote_available,
            panels,
            changes,
            sse,
            feedback,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Live teams and presets. Mutations take the write guard.
    pub fn scoreboard(&self) -> &RwLock<Scoreboard> {
        &self.scoreboard
    }

    /// Always-available local persistence.
    pub fn local_store(&self) -> &dyn LocalStore {
        self.local_store.as_ref()
    }

    /// Obtain a handle to the remote store, if one is installed.
    pub async fn remote_store(&self) -> Option<Arc<dyn RemoteStore>> {
        let guard = self.remote_store.read().await;
        guard.as_ref().cloned()
    }

    /// Install a remote store and mark sync as available.
    pub async fn install_remote_store(&self, store: Arc<dyn RemoteStore>) {
        {
            let mut guard = self.remote_store.write().await;
            *guard = Some(store);
        }
        self.remote_available.send_if_modified(|available| {
            let changed = !*available;
            *available = true;
            changed
        });
    }

    /// Remove the remote store and fall back to local-only operation.
    pub async fn clear_remote_store(&self) {
        {
            let mut guard = self.remote_store.write().await;
            guard.take();
        }
        self.remote_available.send_if_modified(|available| {
            let changed = *available;
            *available = false;
            changed
        });
    }

    /// Whether presets are currently mirrored remotely.
    pub fn is_remote_available(&self) -> bool {
        *self.remote_available.borrow()
    }

    /// Exclusive access to a panel's gesture state. Do not hold across awaits.
    pub fn panel_mut(&self, side: PanelSide) -> RefMut<'_, PanelSide, PanelState> {
        self.panels
            .entry(side)
            .or_insert_with(|| PanelState::with_layout(self.config.panel_layout()))
    }

    /// Ambient display mirror.
    pub fn live_activity(&self) -> &Mutex<LiveActivity> {
        &self.live_activity
    }

    /// Announce a scoreboard mutation.
    pub fn notify(&self, change: StoreChange) {
        let _ = self.changes.send(change);
    }

    /// Subscribe to scoreboard mutations.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Broadcast hub used for the feedback SSE stream.
    pub fn feedback_sse(&self) -> &SseHub {
        self.sse.feedback()
    }

    /// Destination of haptic and visual feedback.
    pub fn feedback(&self) -> Arc<dyn FeedbackSink> {
        self.feedback.clone()
    }
}
