//! TOML-based application configuration.
//!
//! Stores deployment settings:
//! - Calendar provider credentials and presentation settings
//! - Cooldown windows and the sync-lock TTL
//! - Semester date overrides
//!
//! Configuration is stored at `~/.config/timetable/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::calendar::{CalendarSettings, SemesterDates, SyncOptions, TokenStore};
use crate::error::ConfigError;

/// Calendar provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// OAuth client credentials for the provider.
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_true")]
    pub format_24h: bool,
    /// Fixed UTC offset of the timetable's wall-clock times.
    #[serde(default = "default_tz_offset")]
    pub tz_offset_hours: i32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            locale: default_locale(),
            timezone: default_timezone(),
            format_24h: true,
            tz_offset_hours: default_tz_offset(),
        }
    }
}

/// Cooldown and lock windows, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownsConfig {
    #[serde(default = "default_ai_secs")]
    pub ai_secs: u64,
    #[serde(default = "default_calendar_secs")]
    pub calendar_secs: u64,
    #[serde(default = "default_calendar_secs")]
    pub lock_ttl_secs: u64,
}

impl Default for CooldownsConfig {
    fn default() -> Self {
        Self {
            ai_secs: default_ai_secs(),
            calendar_secs: default_calendar_secs(),
            lock_ttl_secs: default_calendar_secs(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timetable/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub cooldowns: CooldownsConfig,
    #[serde(default)]
    pub semester: SemesterDates,
}

// Default functions
fn default_locale() -> String {
    "ru".to_string()
}
fn default_timezone() -> String {
    "Asia/Krasnoyarsk".to_string()
}
fn default_true() -> bool {
    true
}
fn default_tz_offset() -> i32 {
    7
}
fn default_ai_secs() -> u64 {
    20
}
fn default_calendar_secs() -> u64 {
    300
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/timetable"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file does
    /// not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().map_err(|e| match e {
            ConfigError::LoadFailed { path, message } => ConfigError::SaveFailed { path, message },
            other => other,
        })?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Default location of the subscription document.
    pub fn subscriptions_path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/timetable"),
            message: e.to_string(),
        })?;
        Ok(dir.join("users.json"))
    }

    /// Token store rooted in the data directory.
    pub fn token_store(&self) -> Result<TokenStore, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/timetable"),
            message: e.to_string(),
        })?;
        Ok(TokenStore::new(
            dir.join("tokens.json"),
            self.calendar.client_id.clone(),
            self.calendar.client_secret.clone(),
        ))
    }

    /// Sync-engine options derived from this configuration.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            settings: CalendarSettings {
                format_24h: self.calendar.format_24h,
                locale: self.calendar.locale.clone(),
                timezone: self.calendar.timezone.clone(),
            },
            semester: self.semester.clone(),
            tz_offset_hours: self.calendar.tz_offset_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment_constants() {
        let config = Config::default();
        assert_eq!(config.cooldowns.ai_secs, 20);
        assert_eq!(config.cooldowns.calendar_secs, 300);
        assert_eq!(config.cooldowns.lock_ttl_secs, 300);
        assert_eq!(config.calendar.tz_offset_hours, 7);
        assert!(config.calendar.format_24h);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str("[calendar]\nlocale = \"en\"\n").unwrap();
        assert_eq!(config.calendar.locale, "en");
        assert_eq!(config.calendar.timezone, "Asia/Krasnoyarsk");
        assert_eq!(config.cooldowns.calendar_secs, 300);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.calendar.locale, config.calendar.locale);
        assert_eq!(parsed.semester.autumn_start, config.semester.autumn_start);
    }
}
