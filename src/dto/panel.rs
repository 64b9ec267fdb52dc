use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::{
    game::PanelSide,
    gesture::{BasketballPhase, GesturePhase, GestureSample, PanelLayout, Point, Translation},
};

/// Position inside a panel, origin top-left.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PointDto {
    pub x: f64,
    pub y: f64,
}

impl From<PointDto> for Point {
    fn from(value: PointDto) -> Self {
        Point::new(value.x, value.y)
    }
}

impl From<Point> for PointDto {
    fn from(value: Point) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

/// Cumulative travel since the gesture began; negative height is upwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct TranslationDto {
    pub width: f64,
    pub height: f64,
}

/// One drag sample.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct GestureSampleRequest {
    pub location: PointDto,
    pub translation: TranslationDto,
    pub phase: GesturePhase,
}

impl From<GestureSampleRequest> for GestureSample {
    fn from(value: GestureSampleRequest) -> Self {
        Self {
            location: value.location.into(),
            translation: Translation {
                width: value.translation.width,
                height: value.translation.height,
            },
            phase: value.phase,
        }
    }
}

/// Tap recognised by the client.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct TapRequest {
    pub location: PointDto,
}

/// Rendered panel geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, Validate)]
pub struct LayoutDto {
    #[validate(range(exclusive_min = 0.0))]
    pub width: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub height: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub font_size: f64,
}

impl From<LayoutDto> for PanelLayout {
    fn from(value: LayoutDto) -> Self {
        Self {
            width: value.width,
            height: value.height,
            font_size: value.font_size,
        }
    }
}

impl From<PanelLayout> for LayoutDto {
    fn from(value: PanelLayout) -> Self {
        Self {
            width: value.width,
            height: value.height,
            font_size: value.font_size,
        }
    }
}

/// Panel state after an input was processed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PanelSummary {
    pub side: PanelSide,
    pub score: u32,
    /// Vertical offset of the score text.
    pub offset: f64,
    /// The current gesture already committed its effect.
    pub locked: bool,
    pub basketball_phase: BasketballPhase,
    pub layout: LayoutDto,
}
