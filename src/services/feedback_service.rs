use std::sync::Arc;

use serde::Serialize;
use tokio::time::{Instant, sleep_until};
use tracing::warn;

use crate::{
    dto::sse::{
        HapticErrorEvent, HapticImpactEvent, PanelFlashEvent, PanelOffsetEvent, ServerEvent,
        TargetStruckEvent, TargetsHiddenEvent, TargetsShownEvent,
    },
    state::{
        SseHub,
        feedback::{
            FLASH_DURATION, FLASH_OPACITY, Feedback, FeedbackSink, PULSE_INTENSITY, PulseChain,
        },
        game::{PanelSide, Rgba},
    },
};

const EVENT_HAPTIC_IMPACT: &str = "haptic.impact";
const EVENT_HAPTIC_ERROR: &str = "haptic.error";
const EVENT_PANEL_FLASH: &str = "panel.flash";
const EVENT_PANEL_OFFSET: &str = "panel.offset";
const EVENT_TARGETS_SHOWN: &str = "targets.shown";
const EVENT_TARGETS_STRUCK: &str = "targets.struck";
const EVENT_TARGETS_HIDDEN: &str = "targets.hidden";

/// Publishes panel feedback on the feedback SSE stream.
pub struct SseFeedbackSink {
    hub: SseHub,
}

impl SseFeedbackSink {
    /// Sink writing to `hub`.
    pub fn new(hub: SseHub) -> Self {
        Self { hub }
    }

    fn send(&self, event: &str, payload: &impl Serialize) {
        match ServerEvent::json(Some(event.to_string()), payload) {
            Ok(event) => self.hub.broadcast(event),
            Err(err) => warn!(event, error = %err, "failed to serialize feedback SSE payload"),
        }
    }
}

impl FeedbackSink for SseFeedbackSink {
    fn emit(&self, side: PanelSide, feedback: Feedback) {
        match feedback {
            Feedback::Impact { intensity } => {
                self.send(EVENT_HAPTIC_IMPACT, &HapticImpactEvent { side, intensity })
            }
            Feedback::Error => self.send(EVENT_HAPTIC_ERROR, &HapticErrorEvent { side }),
            Feedback::Flash { color, duration } => self.send(
                EVENT_PANEL_FLASH,
                &PanelFlashEvent {
                    side,
                    color: color.into(),
                    duration_ms: duration.as_millis() as u64,
                },
            ),
            Feedback::Offset(offset) => {
                self.send(EVENT_PANEL_OFFSET, &PanelOffsetEvent { side, offset })
            }
            Feedback::TargetsShown {
                two_point,
                three_point,
            } => self.send(
                EVENT_TARGETS_SHOWN,
                &TargetsShownEvent {
                    side,
                    two_point: two_point.into(),
                    three_point: three_point.into(),
                },
            ),
            Feedback::TargetStruck(target) => {
                self.send(EVENT_TARGETS_STRUCK, &TargetStruckEvent { side, target })
            }
            Feedback::TargetsHidden { fade } => self.send(
                EVENT_TARGETS_HIDDEN,
                &TargetsHiddenEvent {
                    side,
                    fade_ms: fade.as_millis() as u64,
                },
            ),
        }
    }
}

/// Queue `count` impact pulses on the panel's chain. Each pulse is a one-shot
/// timer task; none of them is ever cancelled.
pub fn schedule_pulses(
    sink: Arc<dyn FeedbackSink>,
    chain: &mut PulseChain,
    side: PanelSide,
    count: u32,
) {
    for due in chain.schedule(count, Instant::now()) {
        let sink = sink.clone();
        tokio::spawn(async move {
            sleep_until(due).await;
            sink.emit(
                side,
                Feedback::Impact {
                    intensity: PULSE_INTENSITY,
                },
            );
        });
    }
}

/// Confirmation flash in the team's secondary color.
pub fn flash(sink: &dyn FeedbackSink, side: PanelSide, secondary: Rgba) {
    sink.emit(
        side,
        Feedback::Flash {
            color: secondary.with_alpha(FLASH_OPACITY),
            duration: FLASH_DURATION,
        },
    );
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use crate::state::{
        feedback::{Feedback, FeedbackSink},
        game::PanelSide,
    };

    /// Sink keeping every signal for inspection.
    #[derive(Default)]
    pub struct RecordingSink {
        signals: Mutex<Vec<(PanelSide, Feedback)>>,
    }

    impl RecordingSink {
        pub fn take(&self) -> Vec<(PanelSide, Feedback)> {
            std::mem::take(&mut *self.signals.lock().expect("sink lock"))
        }
    }

    impl FeedbackSink for RecordingSink {
        fn emit(&self, side: PanelSide, feedback: Feedback) {
            self.signals
                .lock()
                .expect("sink lock")
                .push((side, feedback));
        }
    }
}
