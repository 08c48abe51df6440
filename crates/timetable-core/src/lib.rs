//! # Timetable Core Library
//!
//! Core business logic for the conversational timetable viewer. The chat
//! transport, the site parsers and the AI summarizer are thin wrappers in
//! other processes; everything with design weight lives here:
//!
//! - **View Engine**: per-session pagination over a two-week rotating
//!   timetable -- today-resolution, wraparound navigation, no-op signaling
//! - **Subscriptions & Notifier**: JSON-document subscription store and a
//!   best-effort change-alert fan-out with per-recipient failure isolation
//! - **Calendar Sync**: keyed-lock idempotent rebuild of an external
//!   recurring-event calendar with staged progress reporting
//! - **Schedule Model**: the aggregates all three consume
//!
//! ## Key Components
//!
//! - [`ViewState`]: pagination state machine
//! - [`SubscriptionStore`]: persistence contract (+ [`JsonSubscriptionStore`])
//! - [`ChangeNotifier`]: schedule-diff broadcast
//! - [`SyncEngine`]: locked calendar rebuild over a [`CalendarApi`] provider

pub mod calendar;
pub mod error;
pub mod model;
pub mod notify;
pub mod source;
pub mod storage;
pub mod subscriptions;
pub mod view;

pub use calendar::{CalendarApi, GoogleCalendarClient, ProgressSink, SyncEngine, SyncLocks};
pub use error::{ConfigError, CoreError, StoreError, SyncError};
pub use model::{ChangeEntry, Day, Lesson, Schedule, ScheduleKind, SourceState, Week};
pub use notify::{BroadcastReport, ChangeNotifier, DeliveryChannel};
pub use source::{CacheHint, ScheduleSource};
pub use storage::Config;
pub use subscriptions::{JsonSubscriptionStore, SubscriptionStore, UserId};
pub use view::{DayCursor, DayRelation, Tab, ViewEvent, ViewState};
