//! Mapping the two-week rotation onto recurring calendar events.
//!
//! Each lesson slot becomes a single event recurring every two weeks until
//! the semester ends, instead of two interleaved weekly series. Week "1"
//! anchors at the first matching weekday on/after the semester start; week
//! "2" starts seven days later.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::model::{capitalize_first, compact_place, weekday_from_label, Schedule};

/// Month/day boundaries of the two fixed semesters of an academic year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterDates {
    pub autumn_start: (u32, u32),
    pub autumn_end: (u32, u32),
    pub spring_start: (u32, u32),
    pub spring_end: (u32, u32),
}

impl Default for SemesterDates {
    fn default() -> Self {
        Self {
            autumn_start: (9, 1),
            autumn_end: (12, 30),
            spring_start: (2, 10),
            spring_end: (5, 31),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemesterWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// The semester window the real date falls into: months 9-12 select the
/// autumn semester of the current year, anything else the spring one.
pub fn semester_window(today: NaiveDate, dates: &SemesterDates) -> SemesterWindow {
    let year = today.year();
    let day = |(m, d): (u32, u32)| {
        NaiveDate::from_ymd_opt(year, m, d)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, m, 28).unwrap_or(today))
    };
    if (9..=12).contains(&today.month()) {
        SemesterWindow {
            start: day(dates.autumn_start),
            end: day(dates.autumn_end),
        }
    } else {
        SemesterWindow {
            start: day(dates.spring_start),
            end: day(dates.spring_end),
        }
    }
}

/// First date on/after `start` falling on `weekday`, pushed out one week
/// for source week index 2.
pub fn first_occurrence(start: NaiveDate, weekday: Weekday, source_week: u8) -> NaiveDate {
    let days_until = (weekday.num_days_from_monday() as i64
        - start.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    let mut date = start + Duration::days(days_until);
    if source_week == 2 {
        date += Duration::days(7);
    }
    date
}

/// `RRULE` repeating every two weeks until the end of the semester.
pub fn biweekly_rrule(until: NaiveDate) -> String {
    format!(
        "RRULE:FREQ=WEEKLY;INTERVAL=2;UNTIL={}T235959Z",
        until.format("%Y%m%d")
    )
}

/// One recurring event ready for the provider API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringEvent {
    pub summary: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub rrule: String,
}

/// Build the full recurring-event set for a schedule.
///
/// Days whose label is not a weekday (the source occasionally emits
/// placeholders) are skipped with a warning rather than failing the sync.
pub fn build_events(
    schedule: &Schedule,
    today: NaiveDate,
    tz_offset_hours: i32,
    dates: &SemesterDates,
) -> Result<Vec<RecurringEvent>, SyncError> {
    let window = semester_window(today, dates);
    let rrule = biweekly_rrule(window.end);
    let mut events = Vec::new();

    for week in &schedule.weeks {
        for day in &week.days {
            let Some(weekday) = weekday_from_label(&day.day_name) else {
                tracing::warn!(day = %day.day_name, "skipping day with unknown weekday label");
                continue;
            };
            let first_date = first_occurrence(window.start, weekday, week.week_number);

            for lesson in &day.lessons {
                let (start_time, end_time) = lesson.time_range()?;
                let to_utc = |t| {
                    Utc.from_utc_datetime(
                        &(first_date.and_time(t) - Duration::hours(tz_offset_hours as i64)),
                    )
                };

                let summary = match &lesson.subgroup {
                    Some(subgroup) => {
                        format!("{} ({subgroup})", capitalize_first(&lesson.name))
                    }
                    None => capitalize_first(&lesson.name),
                };

                let mut location_parts = vec![compact_place(&lesson.place)];
                if let Some(lesson_type) = &lesson.lesson_type {
                    location_parts.push(lesson_type.clone());
                }
                location_parts.push(lesson.audience.as_text());

                events.push(RecurringEvent {
                    summary,
                    location: location_parts.join(" | "),
                    start: to_utc(start_time),
                    end: to_utc(end_time),
                    rrule: rrule.clone(),
                });
            }
        }
    }

    Ok(events)
}
