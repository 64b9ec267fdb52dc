//! Application-level configuration loading: storage location, slot defaults
//! and panel geometry.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{
    game::{Rgba, TeamStyle},
    gesture::PanelLayout,
    scoreboard::TeamDefaults,
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_BACK_CONFIG_PATH";
/// Directory holding the local store blobs when none is configured.
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Directory of the file-backed local store.
    pub data_dir: PathBuf,
    defaults: TeamDefaults,
    panel: PanelLayout,
    /// Whether ambient score displays may be started.
    pub live_activities_enabled: bool,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        data_dir = %app_config.data_dir.display(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Styles used on first launch and for new teams.
    pub fn team_defaults(&self) -> TeamDefaults {
        self.defaults.clone()
    }

    /// Panel geometry assumed until a client reports its own.
    pub fn panel_layout(&self) -> PanelLayout {
        self.panel
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            defaults: TeamDefaults::default(),
            panel: PanelLayout::default(),
            live_activities_enabled: true,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file; every field is optional.
struct RawConfig {
    data_dir: Option<PathBuf>,
    home: Option<RawTeam>,
    away: Option<RawTeam>,
    panel: Option<RawPanel>,
    live_activities_enabled: Option<bool>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let fallback = AppConfig::default();
        let defaults = TeamDefaults {
            home: value
                .home
                .map(|raw| raw.into_style(&fallback.defaults.home))
                .unwrap_or_else(|| fallback.defaults.home.clone()),
            away: value
                .away
                .map(|raw| raw.into_style(&fallback.defaults.away))
                .unwrap_or_else(|| fallback.defaults.away.clone()),
        };
        let panel = value
            .panel
            .map(|raw| PanelLayout {
                width: positive_or(raw.width, fallback.panel.width),
                height: positive_or(raw.height, fallback.panel.height),
                font_size: positive_or(raw.font_size, fallback.panel.font_size),
            })
            .unwrap_or(fallback.panel);

        Self {
            data_dir: value.data_dir.unwrap_or(fallback.data_dir),
            defaults,
            panel,
            live_activities_enabled: value
                .live_activities_enabled
                .unwrap_or(fallback.live_activities_enabled),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    name: Option<String>,
    primary_color: Option<RawColor>,
    secondary_color: Option<RawColor>,
    font_color: Option<RawColor>,
}

impl RawTeam {
    fn into_style(self, fallback: &TeamStyle) -> TeamStyle {
        TeamStyle {
            name: self.name.unwrap_or_else(|| fallback.name.clone()),
            primary_color: self
                .primary_color
                .map_or(fallback.primary_color, Rgba::from),
            secondary_color: self
                .secondary_color
                .map_or(fallback.secondary_color, Rgba::from),
            font_color: self.font_color.map_or(fallback.font_color, Rgba::from),
        }
    }
}

#[derive(Debug, Deserialize)]
/// RGBA entry; alpha defaults to opaque.
struct RawColor {
    red: f64,
    green: f64,
    blue: f64,
    #[serde(default = "opaque")]
    alpha: f64,
}

fn opaque() -> f64 {
    1.0
}

impl From<RawColor> for Rgba {
    fn from(value: RawColor) -> Self {
        let channel = |value: f64| value.clamp(0.0, 1.0);
        Rgba::opaque(channel(value.red), channel(value.green), channel(value.blue))
            .with_alpha(channel(value.alpha))
    }
}

#[derive(Debug, Deserialize)]
struct RawPanel {
    width: Option<f64>,
    height: Option<f64>,
    font_size: Option<f64>,
}

/// Panel dimensions must be strictly positive for the touch zone to exist.
fn positive_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(value) if value > 0.0 => value,
        Some(value) => {
            warn!(value, fallback, "ignoring non-positive panel dimension");
            fallback
        }
        None => fallback,
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "data_dir": "/var/lib/scoreboard",
                "home": { "name": "Sharks", "primary_color": { "red": 0, "green": 0.5, "blue": 1 } },
                "panel": { "font_size": 120 }
            }"#,
        )
        .expect("valid config");

        let config = AppConfig::from(raw);

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/scoreboard"));
        let defaults = config.team_defaults();
        assert_eq!(defaults.home.name, "Sharks");
        assert_eq!(defaults.home.primary_color, Rgba::opaque(0.0, 0.5, 1.0));
        assert_eq!(defaults.home.font_color, Rgba::WHITE);
        assert_eq!(defaults.away, TeamDefaults::default().away);
        assert_eq!(config.panel_layout().font_size, 120.0);
        assert_eq!(config.panel_layout().width, PanelLayout::default().width);
        assert!(config.live_activities_enabled);
    }

    #[test]
    fn out_of_range_values_fall_back_or_clamp() {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "away": { "secondary_color": { "red": 1.5, "green": -0.2, "blue": 0.5, "alpha": 3 } },
                "panel": { "width": 0, "font_size": -10 }
            }"#,
        )
        .expect("valid config");

        let config = AppConfig::from(raw);

        let layout = config.panel_layout();
        assert_eq!(layout.width, PanelLayout::default().width);
        assert_eq!(layout.font_size, PanelLayout::default().font_size);
        assert_eq!(
            config.team_defaults().away.secondary_color,
            Rgba::opaque(1.0, 0.0, 0.5)
        );
    }
}
