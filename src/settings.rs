use std::sync::OnceLock;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "tilenav.toml";
const ENV_PREFIX: &str = "TILENAV";

static SETTINGS: OnceLock<Result<Settings, ConfigError>> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: i32,
    pub height: i32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        WindowSettings {
            title: "Tilenav".to_string(),
            width: 1280,
            height: 736,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Edge length of a tile (px).
    pub tile_size: f32,
}

impl Default for MapSettings {
    fn default() -> Self {
        MapSettings { tile_size: 32.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Pixels per tick.
    pub speed: f32,
    pub start_x: f32,
    pub start_y: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        AgentSettings {
            speed: 7.0,
            start_x: 60.0,
            start_y: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavSettings {
    pub tick_hz: u32,
    /// Capacity of the frontend -> nav task command topic.
    pub command_capacity: usize,
}

impl Default for NavSettings {
    fn default() -> Self {
        NavSettings {
            tick_hz: 60,
            command_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub map: MapSettings,
    pub agent: AgentSettings,
    pub nav: NavSettings,
}

impl Settings {
    /// Interval between navigation ticks.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.nav.tick_hz.max(1)))
    }
}

/// Loads settings from `tilenav.toml` (optional) and `TILENAV_*` environment
/// variables, e.g. `TILENAV_AGENT__SPEED=4`.
pub fn load_settings() -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!(?settings, "Successfully loaded configuration");
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// The settings read by [`load_settings`], loaded on first use and shared by
/// the window setup and the app.
///
/// The first call happens in `window_conf`, before the subscriber exists, so
/// the caller in `run` is the one that reports a failure.
pub fn shared_settings() -> &'static Result<Settings, ConfigError> {
    SETTINGS.get_or_init(load_settings)
}

/// Logs settings that load fine but will behave oddly.
pub fn check(settings: &Settings) {
    // The agent then stops on every waypoint center
    if settings.agent.speed >= settings.map.tile_size {
        warn!(
            speed = settings.agent.speed,
            tile_size = settings.map.tile_size,
            "Agent speed is not below the tile size, motion will hop between tile centers"
        );
    }
    if settings.nav.tick_hz == 0 {
        warn!("nav.tick_hz is 0, ticking at 1 Hz instead");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(s: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(s, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_match_demo() {
        let settings = Settings::default();
        assert_eq!(settings.window.width, 1280);
        assert_eq!(settings.window.height, 736);
        assert_eq!(settings.map.tile_size, 32.0);
        assert_eq!(settings.agent.speed, 7.0);
        assert_eq!((settings.agent.start_x, settings.agent.start_y), (60.0, 60.0));
        assert_eq!(settings.nav.tick_hz, 60);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let settings = from_toml(
            r#"
            [agent]
            speed = 3.5

            [nav]
            tick_hz = 30
            "#,
        )
        .unwrap();
        assert_eq!(settings.agent.speed, 3.5);
        assert_eq!(settings.agent.start_x, 60.0);
        assert_eq!(settings.nav.tick_hz, 30);
        assert_eq!(settings.nav.command_capacity, 64);
        assert_eq!(settings.window, WindowSettings::default());
    }

    #[test]
    fn test_bad_type_is_an_error() {
        assert!(from_toml("[nav]\ntick_hz = \"fast\"").is_err());
    }

    #[test]
    fn test_shared_settings_load_once() {
        let first = shared_settings();
        let second = shared_settings();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.is_ok(), second.is_ok());
    }

    #[test]
    fn test_tick_period() {
        let mut settings = Settings::default();
        settings.nav.tick_hz = 50;
        assert_eq!(settings.tick_period(), Duration::from_millis(20));

        settings.nav.tick_hz = 0;
        assert_eq!(settings.tick_period(), Duration::from_secs(1));
    }
}
