//! Per-session view state for schedule pagination.
//!
//! One `ViewState` exists per active user session. It owns an immutable
//! schedule snapshot and a navigation cursor over it, and is replaced
//! wholesale on every new lookup. Mutators return `Option<ViewEvent>`;
//! `None` signals a no-op so the caller can skip a redundant re-render.
//!
//! ## Cursor invariant
//!
//! `day_index` always lies in `[1, num_navigable_days]` and, when the
//! current week has any lessons at all, points at a day with lessons.
//! All public mutators preserve this; an out-of-range index can only be
//! produced by a bug here, never by user input.

mod label;
mod resolve;

pub use label::{day_relation, DayRelation};
pub use resolve::{local_today, other_week, parity_week_index, resolve_current_day, DayCursor};

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::model::{Day, Schedule};

/// Cooldown between AI summary requests from one session.
pub const AI_COOLDOWN: Duration = Duration::from_secs(20);
/// Cooldown between calendar exports from one session.
pub const CALENDAR_COOLDOWN: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Basic,
    Session,
    Consultations,
}

/// Emitted by every state mutation that requires a re-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewEvent {
    WeekSwapped { week_index: u8, day_index: usize },
    DayChanged { week_index: u8, day_index: usize },
    JumpedToToday { week_index: u8, day_index: usize },
    TabChanged { tab: Tab },
}

/// Navigation state over one schedule snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewState {
    schedule: Schedule,
    tab: Tab,
    week_index: u8,
    day_index: usize,
    num_navigable_days: usize,
    #[serde(default)]
    last_ai_request_at: Option<DateTime<Utc>>,
    #[serde(default)]
    last_calendar_request_at: Option<DateTime<Utc>>,
}

impl ViewState {
    /// Open a fresh view on `schedule`, resolved against the real ISO-week
    /// parity of `today`. The resolver's effective week is adopted wholesale,
    /// including failover to the other week when today's parity week is empty.
    pub fn open(schedule: Schedule, today: NaiveDate) -> Self {
        let cursor = resolve_current_day(&schedule, parity_week_index(today), today);
        Self {
            schedule,
            tab: Tab::Basic,
            week_index: cursor.week_index,
            day_index: cursor.day_index,
            num_navigable_days: cursor.num_navigable_days,
            last_ai_request_at: None,
            last_calendar_request_at: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn week_index(&self) -> u8 {
        self.week_index
    }

    pub fn day_index(&self) -> usize {
        self.day_index
    }

    pub fn num_navigable_days(&self) -> usize {
        self.num_navigable_days
    }

    /// The day under the cursor, `None` when the current week has no
    /// navigable days (degenerate cursor).
    pub fn current_day(&self) -> Option<&Day> {
        self.schedule
            .week(self.week_index)
            .and_then(|w| w.navigable_days().into_iter().nth(self.day_index - 1))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Toggle between the two weeks, clamping the day position into the new
    /// week's navigable range.
    pub fn swap_week(&mut self) -> Option<ViewEvent> {
        self.week_index = other_week(self.week_index);
        self.num_navigable_days = self.navigable_count_or_degenerate(self.week_index);
        self.day_index = self.day_index.min(self.num_navigable_days);
        Some(ViewEvent::WeekSwapped {
            week_index: self.week_index,
            day_index: self.day_index,
        })
    }

    /// Step one day back, wrapping to the other week's last day at the
    /// boundary. Wraparound crosses exactly one week boundary.
    pub fn prev_day(&mut self) -> Option<ViewEvent> {
        if self.day_index > 1 {
            self.day_index -= 1;
        } else {
            self.week_index = other_week(self.week_index);
            self.num_navigable_days = self.navigable_count_or_degenerate(self.week_index);
            self.day_index = self.num_navigable_days;
        }
        Some(ViewEvent::DayChanged {
            week_index: self.week_index,
            day_index: self.day_index,
        })
    }

    /// Step one day forward, wrapping to the other week's first day at the
    /// boundary.
    pub fn next_day(&mut self) -> Option<ViewEvent> {
        if self.day_index < self.num_navigable_days {
            self.day_index += 1;
        } else {
            self.week_index = other_week(self.week_index);
            self.num_navigable_days = self.navigable_count_or_degenerate(self.week_index);
            self.day_index = 1;
        }
        Some(ViewEvent::DayChanged {
            week_index: self.week_index,
            day_index: self.day_index,
        })
    }

    /// Re-resolve against today's real week parity. `None` when the cursor
    /// is already there, so the caller skips the redundant re-render.
    pub fn open_today(&mut self, today: NaiveDate) -> Option<ViewEvent> {
        let cursor = resolve_current_day(&self.schedule, parity_week_index(today), today);
        if cursor.week_index == self.week_index && cursor.day_index == self.day_index {
            self.num_navigable_days = cursor.num_navigable_days;
            return None;
        }
        self.week_index = cursor.week_index;
        self.day_index = cursor.day_index;
        self.num_navigable_days = cursor.num_navigable_days;
        Some(ViewEvent::JumpedToToday {
            week_index: self.week_index,
            day_index: self.day_index,
        })
    }

    /// Switch the active tab. Pure assignment: the day/week cursor is only
    /// meaningful for the Basic tab and is left untouched.
    pub fn set_tab(&mut self, tab: Tab) -> Option<ViewEvent> {
        if self.tab == tab {
            return None;
        }
        self.tab = tab;
        Some(ViewEvent::TabChanged { tab })
    }

    // ── Cooldowns ────────────────────────────────────────────────────

    /// Record an AI summary request, rejecting it while the 20 s window from
    /// the previous one is still open.
    pub fn begin_ai_request(&mut self, now: DateTime<Utc>) -> Result<()> {
        Self::check_cooldown(self.last_ai_request_at, now, AI_COOLDOWN)?;
        self.last_ai_request_at = Some(now);
        Ok(())
    }

    /// Record a calendar export request, rejecting it while the 300 s window
    /// from the previous one is still open. This is the per-session throttle;
    /// the sync engine additionally holds a per-calendar lock.
    pub fn begin_calendar_request(&mut self, now: DateTime<Utc>) -> Result<()> {
        Self::check_cooldown(self.last_calendar_request_at, now, CALENDAR_COOLDOWN)?;
        self.last_calendar_request_at = Some(now);
        Ok(())
    }

    fn check_cooldown(
        last: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<()> {
        if let Some(last) = last {
            let elapsed = (now - last).num_seconds().max(0) as u64;
            let window_secs = window.as_secs();
            if elapsed < window_secs {
                return Err(CoreError::ThrottleRejected {
                    wait_secs: window_secs - elapsed,
                });
            }
        }
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Navigable-day count of `week_index`, floored at 1 so the degenerate
    /// cursor for a fully empty week stays in range.
    fn navigable_count_or_degenerate(&self, week_index: u8) -> usize {
        self.schedule
            .week(week_index)
            .map(|w| w.navigable_count())
            .unwrap_or(0)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lesson, LessonAudience, ScheduleKind, SourceState, Week};
    use chrono::TimeZone;

    fn lesson() -> Lesson {
        Lesson {
            name: "физика".into(),
            time: "09:40-11:10".into(),
            place: "к / корп. \"Л\" каб. \"301\"".into(),
            lesson_type: None,
            subgroup: None,
            audience: LessonAudience::Professor("Сидоров С.С.".into()),
        }
    }

    fn day(name: &str, navigable: bool) -> Day {
        Day {
            day_name: name.into(),
            lessons: if navigable { vec![lesson()] } else { vec![] },
        }
    }

    fn schedule(week1: Vec<Day>, week2: Vec<Day>) -> Schedule {
        Schedule {
            owner_id: "БПИ22-01".into(),
            kind: ScheduleKind::Group,
            semester_label: String::new(),
            weeks: vec![
                Week {
                    week_number: 1,
                    days: week1,
                },
                Week {
                    week_number: 2,
                    days: week2,
                },
            ],
            session: vec![],
            consultations: vec![],
            source_state: SourceState::Fresh,
            changes: vec![],
        }
    }

    // Wednesday of an even ISO week (maps to week index 1).
    fn wednesday_even() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    fn three_by_two() -> Schedule {
        schedule(
            vec![
                day("Понедельник", true),
                day("Среда", true),
                day("Пятница", true),
            ],
            vec![day("Вторник", true), day("Четверг", true)],
        )
    }

    #[test]
    fn open_resolves_to_today() {
        let view = ViewState::open(three_by_two(), wednesday_even());
        assert_eq!(view.week_index(), 1);
        assert_eq!(view.day_index(), 2);
        assert_eq!(view.num_navigable_days(), 3);
        assert_eq!(view.tab(), Tab::Basic);
        assert_eq!(view.current_day().unwrap().day_name, "Среда");
    }

    #[test]
    fn swap_week_clamps_day_index() {
        let mut view = ViewState::open(three_by_two(), wednesday_even());
        view.next_day(); // day 3 of week 1
        assert!(view.swap_week().is_some());
        assert_eq!(view.week_index(), 2);
        assert_eq!(view.day_index(), 2); // clamped from 3
        assert_eq!(view.num_navigable_days(), 2);
    }

    #[test]
    fn next_day_wraps_into_other_week_once() {
        let mut view = ViewState::open(three_by_two(), wednesday_even());
        view.next_day(); // 3/3 week 1
        view.next_day(); // wraps: 1/2 week 2
        assert_eq!(view.week_index(), 2);
        assert_eq!(view.day_index(), 1);
        view.prev_day(); // wraps back: 3/3 week 1
        assert_eq!(view.week_index(), 1);
        assert_eq!(view.day_index(), 3);
    }

    #[test]
    fn wrap_into_empty_week_uses_degenerate_cursor() {
        let s = schedule(vec![day("Понедельник", true)], vec![day("Вторник", false)]);
        let mut view = ViewState::open(s, wednesday_even());
        assert_eq!(view.day_index(), 1);
        view.next_day();
        assert_eq!(view.week_index(), 2);
        assert_eq!(view.day_index(), 1);
        assert_eq!(view.num_navigable_days(), 1);
        assert!(view.current_day().is_none());
    }

    #[test]
    fn open_today_signals_noop_when_already_there() {
        let mut view = ViewState::open(three_by_two(), wednesday_even());
        assert!(view.open_today(wednesday_even()).is_none());
        view.next_day();
        assert!(view.open_today(wednesday_even()).is_some());
        assert!(view.open_today(wednesday_even()).is_none());
    }

    #[test]
    fn set_tab_same_tab_is_noop() {
        let mut view = ViewState::open(three_by_two(), wednesday_even());
        assert!(view.set_tab(Tab::Basic).is_none());
        assert_eq!(
            view.set_tab(Tab::Session),
            Some(ViewEvent::TabChanged { tab: Tab::Session })
        );
    }

    #[test]
    fn ai_cooldown_rejects_within_window() {
        let mut view = ViewState::open(three_by_two(), wednesday_even());
        let t0 = Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap();
        view.begin_ai_request(t0).unwrap();
        match view.begin_ai_request(t0 + chrono::Duration::seconds(5)) {
            Err(CoreError::ThrottleRejected { wait_secs }) => assert_eq!(wait_secs, 15),
            other => panic!("expected throttle, got {other:?}"),
        }
        assert!(view
            .begin_ai_request(t0 + chrono::Duration::seconds(21))
            .is_ok());
    }

    #[test]
    fn calendar_cooldown_is_five_minutes() {
        let mut view = ViewState::open(three_by_two(), wednesday_even());
        let t0 = Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap();
        view.begin_calendar_request(t0).unwrap();
        assert!(view
            .begin_calendar_request(t0 + chrono::Duration::seconds(299))
            .is_err());
        assert!(view
            .begin_calendar_request(t0 + chrono::Duration::seconds(300))
            .is_ok());
    }
}
