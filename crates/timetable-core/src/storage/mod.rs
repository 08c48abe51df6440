mod config;

pub use config::{CalendarConfig, Config, CooldownsConfig};

use std::path::PathBuf;

/// Returns `~/.config/timetable[-dev]/` based on TIMETABLE_ENV.
///
/// Set TIMETABLE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TIMETABLE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("timetable-dev")
    } else {
        base_dir.join("timetable")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
