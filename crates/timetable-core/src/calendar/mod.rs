//! Calendar export: keyed locking, idempotent rebuild, recurrence mapping
//! and progress reporting.

mod auth;
mod client;
mod lock;
mod progress;
mod recurrence;
mod sync;

pub use auth::{OAuthTokens, TokenStore};
pub use client::{CalendarApi, CalendarSettings, GoogleCalendarClient};
pub use lock::{SyncGuard, SyncLocks, LOCK_TTL};
pub use progress::{LogProgress, NullProgress, ProgressSink};
pub use recurrence::{
    biweekly_rrule, build_events, first_occurrence, semester_window, RecurringEvent,
    SemesterDates, SemesterWindow,
};
pub use sync::{SyncEngine, SyncOptions};
