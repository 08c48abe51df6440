//! Core error types for timetable-core.
//!
//! Only `InvalidState` and an unrecoverable `SyncError` surface as hard
//! failures to the user; the remaining variants degrade to a user-visible
//! message while leaving the session usable.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timetable-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session data is missing or corrupt; the user must restart the dialog.
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// A lookup query matched no group or professor.
    #[error("Nothing found for '{0}'")]
    NotFound(String),

    /// The schedule source is unavailable. Reported, not retried.
    #[error("Schedule source unavailable: {0}")]
    ExternalFetchFailure(String),

    /// A cooldown window or the per-calendar lock rejected the request.
    /// Carries the remaining wait so callers can show it.
    #[error("Throttled: retry in {wait_secs} seconds")]
    ThrottleRejected { wait_secs: u64 },

    /// Subscription store errors
    #[error("Subscription store error: {0}")]
    Store(#[from] StoreError),

    /// Calendar sync errors
    #[error("Calendar sync error: {0}")]
    Sync(#[from] SyncError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Subscription-document errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create the document or its parent directory
    #[error("Failed to initialize subscription document at {path}: {message}")]
    InitFailed { path: PathBuf, message: String },

    /// Failed to persist the document
    #[error("Failed to write subscription document at {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },
}

/// Calendar-provider errors. Any of these aborts the whole sync; the
/// keyed lock is still released on the way out.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No stored tokens for the calendar provider
    #[error("Not authenticated with the calendar provider")]
    NotAuthenticated,

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Provider API returned an error envelope or malformed payload
    #[error("Calendar API error: {0}")]
    Api(String),

    /// A lesson time range could not be parsed into start/end times
    #[error("Malformed lesson time '{0}'")]
    BadLessonTime(String),

    /// HTTP transport failure
    #[error("Calendar transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
