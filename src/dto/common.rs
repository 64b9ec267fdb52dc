use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::game::{Rgba, TeamStyle};

/// RGBA color exchanged with clients, every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct ColorDto {
    #[validate(range(min = 0.0, max = 1.0))]
    pub red: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub green: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub blue: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "opaque")]
    pub alpha: f64,
}

fn opaque() -> f64 {
    1.0
}

impl From<Rgba> for ColorDto {
    fn from(value: Rgba) -> Self {
        Self {
            red: value.red,
            green: value.green,
            blue: value.blue,
            alpha: value.alpha,
        }
    }
}

impl From<ColorDto> for Rgba {
    fn from(value: ColorDto) -> Self {
        Rgba {
            red: value.red,
            green: value.green,
            blue: value.blue,
            alpha: value.alpha,
        }
    }
}

/// Name and colors shared by live teams and presets.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct TeamStyleDto {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(nested)]
    pub primary_color: ColorDto,
    #[validate(nested)]
    pub secondary_color: ColorDto,
    #[validate(nested)]
    pub font_color: ColorDto,
}

impl From<TeamStyle> for TeamStyleDto {
    fn from(value: TeamStyle) -> Self {
        Self {
            name: value.name,
            primary_color: value.primary_color.into(),
            secondary_color: value.secondary_color.into(),
            font_color: value.font_color.into(),
        }
    }
}

impl From<TeamStyleDto> for TeamStyle {
    fn from(value: TeamStyleDto) -> Self {
        Self {
            name: value.name,
            primary_color: value.primary_color.into(),
            secondary_color: value.secondary_color.into(),
            font_color: value.font_color.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(red: f64) -> ColorDto {
        ColorDto {
            red,
            green: 0.0,
            blue: 0.0,
            alpha: 1.0,
        }
    }

    #[test]
    fn channels_outside_unit_range_are_rejected() {
        assert!(color(0.5).validate().is_ok());
        assert!(color(1.2).validate().is_err());
        assert!(color(-0.1).validate().is_err());
    }

    #[test]
    fn blank_team_name_is_rejected() {
        let style = TeamStyleDto {
            name: String::new(),
            primary_color: color(1.0),
            secondary_color: color(0.0),
            font_color: color(1.0),
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn alpha_defaults_to_opaque() {
        let parsed: ColorDto =
            serde_json::from_str(r#"{"red":0.1,"green":0.2,"blue":0.3}"#).expect("valid color");
        assert_eq!(parsed.alpha, 1.0);
    }
}
