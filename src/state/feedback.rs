//! Fire-and-forget feedback emitted by the score panels.

use std::time::Duration;

use tokio::time::Instant;

use crate::state::{
    game::{PanelSide, Rgba},
    gesture::{Point, TargetKind},
};

/// Gap between two consecutive haptic pulses.
pub const PULSE_SPACING: Duration = Duration::from_millis(150);
/// Intensity of a scoring pulse.
pub const PULSE_INTENSITY: f64 = 1.0;
/// Length of the confirmation flash.
pub const FLASH_DURATION: Duration = Duration::from_millis(50);
/// Opacity of the secondary color during the confirmation flash.
pub const FLASH_OPACITY: f64 = 0.4;

/// One feedback signal for a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feedback {
    /// Haptic impact pulse.
    Impact {
        /// Strength in `[0, 1]`.
        intensity: f64,
    },
    /// Error notification for a rejected action.
    Error,
    /// Short background flash confirming a score change.
    Flash {
        /// Flash color, already carrying its opacity.
        color: Rgba,
        /// How long the flash stays visible.
        duration: Duration,
    },
    /// Vertical offset of the score text.
    Offset(f64),
    /// Basketball targets revealed.
    TargetsShown {
        /// Centre of the two-point target.
        two_point: Point,
        /// Centre of the three-point target.
        three_point: Point,
    },
    /// A basketball target was struck.
    TargetStruck(TargetKind),
    /// Basketball targets fading out.
    TargetsHidden {
        /// Fade duration.
        fade: Duration,
    },
}

/// Destination for panel feedback. Implementations must not block.
pub trait FeedbackSink: Send + Sync {
    /// Deliver one signal for the given panel.
    fn emit(&self, side: PanelSide, feedback: Feedback);
}

/// Keeps haptic pulses evenly spaced, including across consecutive scoring
/// calls: each pulse is due [`PULSE_SPACING`] after the previously scheduled
/// one, or immediately when that moment has already passed.
///
/// The chain is never reset, so pulses of a quick follow-up gesture queue
/// behind those still pending from the previous one.
#[derive(Debug, Default)]
pub struct PulseChain {
    last: Option<Instant>,
}

impl PulseChain {
    /// Empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `count` pulse slots and return when each one is due.
    pub fn schedule(&mut self, count: u32, now: Instant) -> Vec<Instant> {
        (0..count)
            .map(|_| {
                let due = match self.last {
                    Some(previous) => (previous + PULSE_SPACING).max(now),
                    None => now,
                };
                self.last = Some(due);
                due
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulses_of_one_call_are_evenly_spaced() {
        let now = Instant::now();
        let mut chain = PulseChain::new();

        let due = chain.schedule(3, now);

        assert_eq!(due, vec![now, now + PULSE_SPACING, now + PULSE_SPACING * 2]);
    }

    #[test]
    fn consecutive_calls_chain_on_the_previous_slot() {
        let now = Instant::now();
        let mut chain = PulseChain::new();

        chain.schedule(1, now);
        let due = chain.schedule(2, now + Duration::from_millis(10));

        assert_eq!(due, vec![now + PULSE_SPACING, now + PULSE_SPACING * 2]);
    }

    #[test]
    fn idle_chain_fires_immediately() {
        let now = Instant::now();
        let mut chain = PulseChain::new();

        chain.schedule(1, now);
        let later = now + Duration::from_secs(2);

        assert_eq!(chain.schedule(1, later), vec![later]);
    }

    #[test]
    fn zero_points_schedule_nothing() {
        let mut chain = PulseChain::new();
        assert!(chain.schedule(0, Instant::now()).is_empty());
    }
}
