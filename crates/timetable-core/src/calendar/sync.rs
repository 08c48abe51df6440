//! The locked calendar rebuild.
//!
//! Per owner id the engine moves `Idle -> Locked -> Syncing -> Done|Failed`
//! and always returns to `Idle`: the keyed lock is released by a drop guard
//! on every path. The rebuild is a full replace -- existing events are
//! wiped before the new set is inserted -- so a retry after a mid-rebuild
//! failure converges instead of accumulating duplicates. Between the wipe
//! and a failed insert the calendar is legitimately empty until the next
//! attempt; that window is accepted, not masked.

use chrono::NaiveDate;

use super::client::{CalendarApi, CalendarSettings};
use super::lock::SyncLocks;
use super::progress::ProgressSink;
use super::recurrence::{build_events, SemesterDates};
use crate::error::{CoreError, Result};
use crate::model::Schedule;

/// Engine knobs, normally sourced from [`crate::storage::Config`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub settings: CalendarSettings,
    pub semester: SemesterDates,
    /// Fixed UTC offset of the timetable's wall-clock times.
    pub tz_offset_hours: i32,
}

impl SyncOptions {
    fn tz_default() -> i32 {
        7 // Asia/Krasnoyarsk
    }

    pub fn with_defaults() -> Self {
        Self {
            settings: CalendarSettings::default(),
            semester: SemesterDates::default(),
            tz_offset_hours: Self::tz_default(),
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::with_defaults()
    }
}

pub struct SyncEngine<A: CalendarApi> {
    api: A,
    locks: SyncLocks,
    options: SyncOptions,
}

impl<A: CalendarApi> SyncEngine<A> {
    pub fn new(api: A, options: SyncOptions) -> Self {
        Self {
            api,
            locks: SyncLocks::default(),
            options,
        }
    }

    pub fn with_locks(api: A, options: SyncOptions, locks: SyncLocks) -> Self {
        Self { api, locks, options }
    }

    /// Rebuild the external calendar for `schedule.owner_id` and return its
    /// shareable URL.
    ///
    /// The per-session cooldown is the caller's responsibility
    /// ([`crate::view::ViewState::begin_calendar_request`]); this method
    /// enforces the cross-session per-calendar lock and rejects with
    /// [`CoreError::ThrottleRejected`] while another rebuild is in flight.
    pub fn sync(
        &self,
        schedule: &Schedule,
        today: NaiveDate,
        sink: &dyn ProgressSink,
    ) -> Result<String> {
        let owner = schedule.owner_id.as_str();
        let _guard = self.locks.try_acquire(owner)?;
        tracing::info!(owner, "calendar sync started");

        let result = self.run_locked(schedule, today, sink);
        match &result {
            Ok(url) => tracing::info!(owner, url = %url, "calendar sync finished"),
            Err(e) => tracing::error!(owner, error = %e, "calendar sync failed"),
        }
        result
        // _guard drops here: the lock is released on success and failure alike.
    }

    fn run_locked(
        &self,
        schedule: &Schedule,
        today: NaiveDate,
        sink: &dyn ProgressSink,
    ) -> Result<String> {
        let owner = schedule.owner_id.as_str();

        sink.update(0.1, "Инициализация календаря...");
        self.api.connect(&self.options.settings)?;
        sink.update(0.2, "Настройка параметров...");

        sink.update(0.3, "Создание календаря...");
        let calendar_id = self
            .api
            .find_or_create_calendar(owner, &format!("Расписание {owner}"))?;

        sink.update(0.5, "Очистка старых событий...");
        let removed = self.api.clear_events(&calendar_id)?;
        tracing::debug!(owner, removed, "cleared existing events");

        sink.update(0.7, "Добавление расписания...");
        let events = build_events(
            schedule,
            today,
            self.options.tz_offset_hours,
            &self.options.semester,
        )?;
        for event in &events {
            self.api.insert_event(&calendar_id, event)?;
        }
        tracing::debug!(owner, added = events.len(), "inserted recurring events");

        self.api.publish_reader_acl(&calendar_id)?;
        sink.update(1.0, "Готово!");

        Ok(self.api.share_url(&calendar_id))
    }
}
