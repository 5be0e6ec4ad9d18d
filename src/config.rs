use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_DISPLAY_TIMEZONE, DEFAULT_TIMER_COLOR, FALLBACK_ALARM_SOUND};

fn default_database_path() -> PathBuf {
    PathBuf::from("timerfreak.sqlite")
}

fn default_port() -> u16 {
    8080
}

fn default_timer_color() -> String {
    DEFAULT_TIMER_COLOR.to_string()
}

fn default_fallback_sound() -> String {
    FALLBACK_ALARM_SOUND.to_string()
}

fn default_display_timezone() -> String {
    DEFAULT_DISPLAY_TIMEZONE.to_string()
}

/// Application configuration file structure (TOML).
///
/// Everything here used to be a process-wide constant; it is carried explicitly
/// so the store and the log viewer receive their defaults at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Path of the SQLite database file (default: timerfreak.sqlite)
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Port for the HTTP server (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Color applied to timers submitted without one
    #[serde(default = "default_timer_color")]
    pub default_timer_color: String,
    /// Alarm sound filename used when no registry row is flagged as default
    #[serde(default = "default_fallback_sound")]
    pub fallback_alarm_sound: String,
    /// IANA zone identifier used when presenting log timestamps
    #[serde(default = "default_display_timezone")]
    pub display_timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            port: default_port(),
            default_timer_color: default_timer_color(),
            fallback_alarm_sound: default_fallback_sound(),
            display_timezone: default_display_timezone(),
        }
    }
}

impl AppConfig {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        let config: AppConfig = toml::from_str(&raw)?;
        config.display_zone()?;
        Ok(config)
    }

    /// The parsed display timezone
    pub fn display_zone(&self) -> Result<chrono_tz::Tz, Box<dyn std::error::Error>> {
        crate::timestamp::parse_display_zone(&self.display_timezone).map_err(Into::into)
    }
}
