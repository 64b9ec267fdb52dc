//! Gesture interpretation for a single score panel.
//!
//! The engine is a pure state machine: callers feed it drag samples and taps
//! together with the panel context and apply the returned [`GestureEffect`]s.
//! Score arithmetic and the non-negative invariant live in the scoreboard, so
//! a [`GestureEffect::Decrement`] may still be rejected downstream.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::game::{GameType, PanelSide};

/// Vertical travel that commits a swipe.
pub const SWIPE_THRESHOLD: f64 = 123.0;
/// Maximum horizontal drift for a standard swipe.
pub const HORIZONTAL_TOLERANCE: f64 = 70.0;
/// Maximum horizontal drift in basketball mode, wide enough to reach the corner target.
pub const BASKETBALL_HORIZONTAL_TOLERANCE: f64 = 200.0;
/// Fraction of the vertical translation the score text follows.
pub const FOLLOW_FACTOR: f64 = 0.33;
/// Upward travel revealing the basketball targets.
pub const TARGET_REVEAL_THRESHOLD: f64 = 30.0;
/// Distance from a target centre that still counts as a hit.
pub const TARGET_HIT_RADIUS: f64 = 50.0;
/// Duration of the target fade-out after the gesture ends.
pub const TARGET_FADE: Duration = Duration::from_millis(200);

const TARGET_ROW: f64 = 0.15;
const CORNER_INSET: f64 = 0.15;
const GLYPH_WIDTH_RATIO: f64 = 0.6;
const KERN: f64 = 2.0;

/// Position inside a panel, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Point {
    /// Build a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Cumulative movement since the gesture started; negative height means upwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    /// Horizontal travel.
    pub width: f64,
    /// Vertical travel.
    pub height: f64,
}

/// Phase carried by each drag sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    /// The pointer moved.
    Changed,
    /// The pointer was lifted.
    Ended,
}

/// One sample from the gesture source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    /// Pointer position relative to the panel.
    pub location: Point,
    /// Travel since the gesture started.
    pub translation: Translation,
    /// Sample phase.
    pub phase: GesturePhase,
}

/// Rendered size of a score panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    /// Panel width.
    pub width: f64,
    /// Panel height.
    pub height: f64,
    /// Point size of the score digits.
    pub font_size: f64,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 800.0,
            font_size: 175.0,
        }
    }
}

/// Everything the engine needs to know about the panel for one input.
#[derive(Debug, Clone, Copy)]
pub struct PanelContext {
    /// Current layout.
    pub layout: PanelLayout,
    /// Which side of the screen the panel is on.
    pub side: PanelSide,
    /// Active sport, selecting standard or basketball behaviour.
    pub game_type: GameType,
    /// Score currently displayed, sizing the touch zone.
    pub score: u32,
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub min: Point,
    /// Bottom-right corner.
    pub max: Point,
}

impl Rect {
    /// Whether the point lies inside or on the border.
    pub fn contains(&self, point: Point) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }
}

/// Region around the rendered score that a gesture must visit before it may score.
///
/// The text box is estimated from the digit count and font size, then grown by
/// half the font size on every side.
pub fn touch_zone(layout: &PanelLayout, score: u32) -> Rect {
    let digits = score.to_string().len() as f64;
    let text_width = digits * layout.font_size * GLYPH_WIDTH_RATIO + (digits - 1.0) * KERN;
    let text_height = layout.font_size;
    let margin = layout.font_size / 2.0;

    let centre = Point::new(layout.width / 2.0, layout.height / 2.0);
    let half_width = text_width / 2.0 + margin;
    let half_height = text_height / 2.0 + margin;

    Rect {
        min: Point::new(centre.x - half_width, centre.y - half_height),
        max: Point::new(centre.x + half_width, centre.y + half_height),
    }
}

/// Basketball hit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Centre target.
    TwoPoint,
    /// Corner target on the outer side of the panel.
    ThreePoint,
}

impl TargetKind {
    /// Points a hit is worth in total.
    pub fn points(self) -> u32 {
        match self {
            TargetKind::TwoPoint => 2,
            TargetKind::ThreePoint => 3,
        }
    }

    /// Centre of the target for the given panel.
    pub fn position(self, layout: &PanelLayout, side: PanelSide) -> Point {
        let y = layout.height * TARGET_ROW;
        let x = match (self, side) {
            (TargetKind::TwoPoint, _) => layout.width / 2.0,
            (TargetKind::ThreePoint, PanelSide::Left) => layout.width * CORNER_INSET,
            (TargetKind::ThreePoint, PanelSide::Right) => layout.width * (1.0 - CORNER_INSET),
        };
        Point::new(x, y)
    }
}

/// Basketball overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BasketballPhase {
    /// No upward swipe in progress.
    #[default]
    Inactive,
    /// Targets are visible and armed.
    WaitingForTarget,
    /// A target was struck; the gesture is finished.
    TargetHit,
}

/// Instruction produced by the engine for the caller to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEffect {
    /// Move the score text vertically by this offset.
    Offset(f64),
    /// Award points; one haptic pulse per point.
    Increment {
        /// Points to add.
        points: u32,
    },
    /// Remove one point, rejected when the score is already zero.
    Decrement,
    /// Show both targets and start pulsing them.
    TargetsShown {
        /// Centre of the two-point target.
        two_point: Point,
        /// Centre of the three-point target.
        three_point: Point,
    },
    /// Highlight a struck target.
    TargetStruck(TargetKind),
    /// Fade the targets out.
    TargetsHidden {
        /// Fade duration.
        fade: Duration,
    },
}

#[derive(Debug, Clone, Copy, Default)]
struct BasketballRound {
    phase: BasketballPhase,
    targets_visible: bool,
    two_point_hit: bool,
    three_point_hit: bool,
    base_point_scored: bool,
}

/// Per-panel gesture state machine.
#[derive(Debug, Clone, Default)]
pub struct GestureEngine {
    offset: f64,
    locked: bool,
    entered_zone: bool,
    round: BasketballRound,
}

impl GestureEngine {
    /// Engine waiting for its first gesture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current visual offset of the score text.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Whether the current gesture already committed its effect.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Basketball overlay phase.
    pub fn basketball_phase(&self) -> BasketballPhase {
        self.round.phase
    }

    /// Dispatch a drag sample according to its phase.
    pub fn handle_sample(
        &mut self,
        sample: &GestureSample,
        ctx: &PanelContext,
    ) -> Vec<GestureEffect> {
        match sample.phase {
            GesturePhase::Changed => self.on_changed(sample, ctx),
            GesturePhase::Ended => self.on_ended(),
        }
    }

    /// Tap recognised at gesture end with near-zero travel.
    pub fn on_tap(&mut self, location: Point, ctx: &PanelContext) -> Vec<GestureEffect> {
        if touch_zone(&ctx.layout, ctx.score).contains(location) {
            vec![GestureEffect::Increment { points: 1 }]
        } else {
            Vec::new()
        }
    }

    /// Pointer moved.
    pub fn on_changed(&mut self, sample: &GestureSample, ctx: &PanelContext) -> Vec<GestureEffect> {
        if self.locked {
            return Vec::new();
        }

        if touch_zone(&ctx.layout, ctx.score).contains(sample.location) {
            self.entered_zone = true;
        }

        let mut effects = Vec::new();
        if ctx.game_type.uses_targets() {
            self.basketball_drag(sample, ctx, &mut effects);
        } else {
            self.standard_drag(sample, &mut effects);
        }
        effects
    }

    /// Pointer lifted: spring back and clear every per-gesture flag.
    pub fn on_ended(&mut self) -> Vec<GestureEffect> {
        let mut effects = vec![GestureEffect::Offset(0.0)];
        if self.round.targets_visible {
            effects.push(GestureEffect::TargetsHidden { fade: TARGET_FADE });
        }

        self.offset = 0.0;
        self.locked = false;
        self.entered_zone = false;
        self.round = BasketballRound::default();
        effects
    }

    fn standard_drag(&mut self, sample: &GestureSample, effects: &mut Vec<GestureEffect>) {
        let Translation { width, height } = sample.translation;
        if width.abs() >= HORIZONTAL_TOLERANCE {
            return;
        }

        self.follow(height, effects);
        if !self.entered_zone {
            return;
        }

        if height < -SWIPE_THRESHOLD {
            effects.push(GestureEffect::Increment { points: 1 });
            self.lock(effects);
        } else if height > SWIPE_THRESHOLD {
            effects.push(GestureEffect::Decrement);
            self.lock(effects);
        }
    }

    fn basketball_drag(
        &mut self,
        sample: &GestureSample,
        ctx: &PanelContext,
        effects: &mut Vec<GestureEffect>,
    ) {
        let Translation { width, height } = sample.translation;
        if width.abs() >= BASKETBALL_HORIZONTAL_TOLERANCE {
            return;
        }

        self.follow(height, effects);
        if !self.entered_zone {
            return;
        }

        if height < -TARGET_REVEAL_THRESHOLD && self.round.phase == BasketballPhase::Inactive {
            self.round.phase = BasketballPhase::WaitingForTarget;
            self.round.targets_visible = true;
            effects.push(GestureEffect::TargetsShown {
                two_point: TargetKind::TwoPoint.position(&ctx.layout, ctx.side),
                three_point: TargetKind::ThreePoint.position(&ctx.layout, ctx.side),
            });
        }

        // Targets take priority over the base point of the same sample.
        if self.round.phase == BasketballPhase::WaitingForTarget {
            if let Some(target) = self.hit_target(sample.location, ctx) {
                self.strike(target, effects);
                return;
            }

            if height < -SWIPE_THRESHOLD && !self.round.base_point_scored {
                self.round.base_point_scored = true;
                effects.push(GestureEffect::Increment { points: 1 });
            }
        }

        if height > SWIPE_THRESHOLD && self.round.phase == BasketballPhase::Inactive {
            effects.push(GestureEffect::Decrement);
            self.lock(effects);
        }
    }

    /// First target within the hit radius, two-point checked first.
    fn hit_target(&self, location: Point, ctx: &PanelContext) -> Option<TargetKind> {
        if self.round.two_point_hit || self.round.three_point_hit {
            return None;
        }

        [TargetKind::TwoPoint, TargetKind::ThreePoint]
            .into_iter()
            .find(|target| {
                location.distance_to(target.position(&ctx.layout, ctx.side)) <= TARGET_HIT_RADIUS
            })
    }

    fn strike(&mut self, target: TargetKind, effects: &mut Vec<GestureEffect>) {
        self.round.phase = BasketballPhase::TargetHit;
        match target {
            TargetKind::TwoPoint => self.round.two_point_hit = true,
            TargetKind::ThreePoint => self.round.three_point_hit = true,
        }

        let already = u32::from(self.round.base_point_scored);
        self.round.base_point_scored = true;

        effects.push(GestureEffect::TargetStruck(target));
        effects.push(GestureEffect::Increment {
            points: target.points() - already,
        });
        self.locked = true;
    }

    fn follow(&mut self, height: f64, effects: &mut Vec<GestureEffect>) {
        self.offset = height * FOLLOW_FACTOR;
        effects.push(GestureEffect::Offset(self.offset));
    }

    fn lock(&mut self, effects: &mut Vec<GestureEffect>) {
        self.locked = true;
        self.offset = 0.0;
        effects.push(GestureEffect::Offset(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTRE: Point = Point::new(200.0, 400.0);

    fn ctx(game_type: GameType) -> PanelContext {
        PanelContext {
            layout: PanelLayout::default(),
            side: PanelSide::Left,
            game_type,
            score: 0,
        }
    }

    /// Drag sample starting at the panel centre.
    fn drag(dx: f64, dy: f64) -> GestureSample {
        drag_from(CENTRE, dx, dy)
    }

    fn drag_from(start: Point, dx: f64, dy: f64) -> GestureSample {
        GestureSample {
            location: Point::new(start.x + dx, start.y + dy),
            translation: Translation {
                width: dx,
                height: dy,
            },
            phase: GesturePhase::Changed,
        }
    }

    /// Sample landing exactly on `target` for a gesture started at the centre.
    fn drag_to(target: Point) -> GestureSample {
        drag(target.x - CENTRE.x, target.y - CENTRE.y)
    }

    fn assert_near(actual: Point, expected: Point) {
        assert!(
            actual.distance_to(expected) < 1e-9,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn points(effects: &[GestureEffect]) -> i64 {
        effects
            .iter()
            .map(|effect| match effect {
                GestureEffect::Increment { points } => i64::from(*points),
                GestureEffect::Decrement => -1,
                _ => 0,
            })
            .sum()
    }

    fn run(
        engine: &mut GestureEngine,
        ctx: &PanelContext,
        samples: &[GestureSample],
    ) -> Vec<GestureEffect> {
        samples
            .iter()
            .flat_map(|sample| engine.on_changed(sample, ctx))
            .collect()
    }

    #[test]
    fn zone_is_centred_and_padded_by_half_the_font_size() {
        let zone = touch_zone(&PanelLayout::default(), 7);
        // One digit: 105 wide, 175 tall, plus 87.5 on each side.
        assert_near(zone.min, Point::new(60.0, 225.0));
        assert_near(zone.max, Point::new(340.0, 575.0));
        assert!(zone.contains(CENTRE));
        assert!(!zone.contains(Point::new(20.0, 400.0)));
    }

    #[test]
    fn zone_widens_with_more_digits() {
        let one = touch_zone(&PanelLayout::default(), 9);
        let two = touch_zone(&PanelLayout::default(), 10);
        assert!(two.max.x - two.min.x > one.max.x - one.min.x);
        assert_eq!(two.max.y - two.min.y, one.max.y - one.min.y);
    }

    #[test]
    fn upward_swipe_scores_once_and_locks() {
        let ctx = ctx(GameType::Hockey);
        let mut engine = GestureEngine::new();

        let effects = run(
            &mut engine,
            &ctx,
            &[drag(0.0, -20.0), drag(0.0, -130.0), drag(0.0, -200.0), drag(0.0, 200.0)],
        );

        assert_eq!(points(&effects), 1);
        assert!(engine.is_locked());
        assert_eq!(engine.offset(), 0.0);
    }

    #[test]
    fn visual_follow_is_a_third_of_the_travel() {
        let ctx = ctx(GameType::Soccer);
        let mut engine = GestureEngine::new();
        let effects = engine.on_changed(&drag(0.0, -100.0), &ctx);
        assert_eq!(effects.len(), 1);
        assert!((engine.offset() + 33.0).abs() < 1e-9);
    }

    #[test]
    fn downward_swipe_requests_a_decrement() {
        let ctx = ctx(GameType::TableTennis);
        let mut engine = GestureEngine::new();
        let effects = run(&mut engine, &ctx, &[drag(0.0, 124.0)]);
        assert!(effects.contains(&GestureEffect::Decrement));
        assert!(engine.is_locked());
    }

    #[test]
    fn wide_horizontal_drift_is_ignored() {
        let ctx = ctx(GameType::Hockey);
        let mut engine = GestureEngine::new();
        let effects = run(&mut engine, &ctx, &[drag(0.0, -10.0), drag(80.0, -150.0)]);
        assert_eq!(points(&effects), 0);
        assert!(!engine.is_locked());
    }

    #[test]
    fn gesture_outside_the_zone_never_scores() {
        let outside = Point::new(20.0, 780.0);
        for game_type in GameType::ALL {
            let ctx = ctx(game_type);
            let mut engine = GestureEngine::new();
            let effects = run(
                &mut engine,
                &ctx,
                &[
                    drag_from(outside, 0.0, -10.0),
                    drag_from(outside, 0.0, -150.0),
                    drag_from(outside, 0.0, -600.0),
                ],
            );
            assert_eq!(points(&effects), 0, "{game_type:?}");
        }
    }

    #[test]
    fn zone_flag_resets_when_the_gesture_ends() {
        let ctx = ctx(GameType::Hockey);
        let outside = Point::new(20.0, 780.0);
        let mut engine = GestureEngine::new();

        engine.on_changed(&drag(0.0, -10.0), &ctx);
        engine.on_ended();

        let effects = run(&mut engine, &ctx, &[drag_from(outside, 0.0, -150.0)]);
        assert_eq!(points(&effects), 0);
    }

    #[test]
    fn ending_unlocks_for_the_next_gesture() {
        let ctx = ctx(GameType::Hockey);
        let mut engine = GestureEngine::new();

        run(&mut engine, &ctx, &[drag(0.0, -130.0)]);
        assert_eq!(engine.on_ended(), vec![GestureEffect::Offset(0.0)]);
        let effects = run(&mut engine, &ctx, &[drag(0.0, -130.0)]);
        assert_eq!(points(&effects), 1);
    }

    #[test]
    fn tap_scores_only_inside_the_zone() {
        let ctx = ctx(GameType::Hockey);
        let mut engine = GestureEngine::new();
        assert_eq!(points(&engine.on_tap(CENTRE, &ctx)), 1);
        assert_eq!(points(&engine.on_tap(Point::new(5.0, 5.0), &ctx)), 0);
    }

    #[test]
    fn targets_appear_after_a_short_upward_swipe() {
        let ctx = ctx(GameType::Basketball);
        let mut engine = GestureEngine::new();

        let effects = engine.on_changed(&drag(0.0, -40.0), &ctx);

        assert_eq!(engine.basketball_phase(), BasketballPhase::WaitingForTarget);
        let Some(GestureEffect::TargetsShown {
            two_point,
            three_point,
        }) = effects.last().copied()
        else {
            panic!("targets not shown: {effects:?}");
        };
        assert_near(two_point, Point::new(200.0, 120.0));
        assert_near(three_point, Point::new(60.0, 120.0));
    }

    #[test]
    fn three_point_target_sits_in_the_outer_corner() {
        let layout = PanelLayout::default();
        assert_near(
            TargetKind::ThreePoint.position(&layout, PanelSide::Right),
            Point::new(340.0, 120.0),
        );
    }

    #[test]
    fn target_first_three_pointer_awards_three() {
        let ctx = ctx(GameType::Basketball);
        let mut engine = GestureEngine::new();
        let three = TargetKind::ThreePoint.position(&ctx.layout, ctx.side);

        let effects = run(&mut engine, &ctx, &[drag(0.0, -40.0), drag_to(three)]);

        assert_eq!(points(&effects), 3);
        assert!(effects.contains(&GestureEffect::TargetStruck(TargetKind::ThreePoint)));
        assert!(effects.contains(&GestureEffect::Increment { points: 3 }));
        assert_eq!(engine.basketball_phase(), BasketballPhase::TargetHit);
        assert!(engine.is_locked());
    }

    #[test]
    fn base_point_then_two_pointer_totals_two() {
        let ctx = ctx(GameType::Basketball);
        let mut engine = GestureEngine::new();
        let two = TargetKind::TwoPoint.position(&ctx.layout, ctx.side);

        let effects = run(
            &mut engine,
            &ctx,
            &[drag(0.0, -40.0), drag(0.0, -130.0), drag(0.0, -150.0), drag_to(two)],
        );

        assert_eq!(points(&effects), 2);
        assert!(effects.contains(&GestureEffect::Increment { points: 1 }));
        assert!(effects.contains(&GestureEffect::TargetStruck(TargetKind::TwoPoint)));
    }

    #[test]
    fn base_point_then_three_pointer_totals_three() {
        let ctx = ctx(GameType::Basketball);
        let mut engine = GestureEngine::new();
        let three = TargetKind::ThreePoint.position(&ctx.layout, ctx.side);

        let effects = run(
            &mut engine,
            &ctx,
            &[drag(0.0, -40.0), drag(0.0, -130.0), drag_to(three)],
        );

        assert_eq!(points(&effects), 3);
    }

    #[test]
    fn target_hit_locks_the_gesture() {
        let ctx = ctx(GameType::Basketball);
        let mut engine = GestureEngine::new();
        let two = TargetKind::TwoPoint.position(&ctx.layout, ctx.side);
        let three = TargetKind::ThreePoint.position(&ctx.layout, ctx.side);

        let effects = run(
            &mut engine,
            &ctx,
            &[drag(0.0, -40.0), drag_to(two), drag_to(three), drag(0.0, 300.0)],
        );

        assert_eq!(points(&effects), 2);
    }

    #[test]
    fn miss_just_outside_the_radius_keeps_waiting() {
        let ctx = ctx(GameType::Basketball);
        let mut engine = GestureEngine::new();
        let two = TargetKind::TwoPoint.position(&ctx.layout, ctx.side);

        run(&mut engine, &ctx, &[drag(0.0, -40.0)]);
        let effects = engine.on_changed(&drag_to(Point::new(two.x, two.y + 51.0)), &ctx);

        assert_eq!(points(&effects), 1, "only the base point");
        assert_eq!(engine.basketball_phase(), BasketballPhase::WaitingForTarget);
    }

    #[test]
    fn basketball_downward_swipe_decrements_when_inactive() {
        let ctx = ctx(GameType::Basketball);
        let mut engine = GestureEngine::new();
        let effects = run(&mut engine, &ctx, &[drag(0.0, 20.0), drag(0.0, 130.0)]);
        assert!(effects.contains(&GestureEffect::Decrement));
    }

    #[test]
    fn basketball_ignores_downward_swipe_once_targets_are_armed() {
        let ctx = ctx(GameType::Basketball);
        let mut engine = GestureEngine::new();
        let effects = run(&mut engine, &ctx, &[drag(0.0, -40.0), drag(0.0, 130.0)]);
        assert!(!effects.contains(&GestureEffect::Decrement));
    }

    #[test]
    fn basketball_tolerates_wider_horizontal_drift() {
        let ctx = ctx(GameType::Basketball);
        let mut engine = GestureEngine::new();
        let effects = run(&mut engine, &ctx, &[drag(0.0, -10.0), drag(150.0, -40.0)]);
        assert!(matches!(
            effects.last(),
            Some(GestureEffect::TargetsShown { .. })
        ));
    }

    #[test]
    fn ending_hides_targets_and_resets_the_round() {
        let ctx = ctx(GameType::Basketball);
        let mut engine = GestureEngine::new();
        run(&mut engine, &ctx, &[drag(0.0, -40.0), drag(0.0, -130.0)]);

        let effects = engine.on_ended();

        assert!(effects.contains(&GestureEffect::TargetsHidden { fade: TARGET_FADE }));
        assert_eq!(engine.basketball_phase(), BasketballPhase::Inactive);
        let effects = run(&mut engine, &ctx, &[drag(0.0, -40.0), drag(0.0, -130.0)]);
        assert_eq!(points(&effects), 1, "base point is available again");
    }
}
