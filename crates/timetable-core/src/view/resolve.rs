//! Current-day resolution over a two-week rotating timetable.
//!
//! The cursor produced here is never parked on a day with zero lessons:
//! same-week future days are preferred, then the other week, then the
//! degenerate `(1, 1)` cursor for schedules with no lessons at all.

use chrono::{Datelike, Duration, NaiveDate, Utc};

use crate::model::{weekday_label, Schedule};

/// Resolved navigation cursor: 1-based day position within the navigable-day
/// list of `week_index`, plus that list's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCursor {
    pub day_index: usize,
    pub num_navigable_days: usize,
    pub week_index: u8,
}

impl DayCursor {
    /// Degenerate cursor for a week with no navigable days. Indices stay in
    /// range; rendering layers show an empty body for it.
    pub fn degenerate(week_index: u8) -> Self {
        Self {
            day_index: 1,
            num_navigable_days: 1,
            week_index,
        }
    }
}

/// Week index the real calendar maps to: even ISO week number -> week "1",
/// odd -> week "2". Applied uniformly across the crate.
pub fn parity_week_index(date: NaiveDate) -> u8 {
    if date.iso_week().week() % 2 == 0 {
        1
    } else {
        2
    }
}

/// Toggle between the two week indices.
pub fn other_week(week_index: u8) -> u8 {
    if week_index == 1 {
        2
    } else {
        1
    }
}

/// Today's date in the deployment timezone, given its fixed UTC offset.
pub fn local_today(tz_offset_hours: i32) -> NaiveDate {
    (Utc::now() + Duration::hours(tz_offset_hours as i64)).date_naive()
}

/// Resolve the day to open for `week_index` on `today`.
///
/// 1. Build the navigable-day list for `week_index`.
/// 2. Empty list -> fail over to the other week's first navigable day, or
///    the degenerate cursor when both weeks are empty.
/// 3. Today's weekday is in the list -> its position.
/// 4. Otherwise scan the remaining weekdays of the current week in fixed
///    Mon-Sun order for the first navigable one.
/// 5. Otherwise switch to the other week's first navigable day.
/// 6. Otherwise fall back to the original week's first navigable day.
pub fn resolve_current_day(schedule: &Schedule, week_index: u8, today: NaiveDate) -> DayCursor {
    let names = navigable_names(schedule, week_index);
    if names.is_empty() {
        let switched = other_week(week_index);
        let other_names = navigable_names(schedule, switched);
        if !other_names.is_empty() {
            return DayCursor {
                day_index: 1,
                num_navigable_days: other_names.len(),
                week_index: switched,
            };
        }
        return DayCursor::degenerate(week_index);
    }

    let position = |name: &str| names.iter().position(|n| *n == name).map(|p| p + 1);

    let today_idx = today.weekday().num_days_from_monday() as usize;
    if let Some(day_index) = position(weekday_label(today.weekday())) {
        return DayCursor {
            day_index,
            num_navigable_days: names.len(),
            week_index,
        };
    }

    for wd in today_idx + 1..7 {
        if let Some(day_index) = position(crate::model::WEEKDAY_LABELS[wd]) {
            return DayCursor {
                day_index,
                num_navigable_days: names.len(),
                week_index,
            };
        }
    }

    let switched = other_week(week_index);
    let other_names = navigable_names(schedule, switched);
    if !other_names.is_empty() {
        return DayCursor {
            day_index: 1,
            num_navigable_days: other_names.len(),
            week_index: switched,
        };
    }

    DayCursor {
        day_index: 1,
        num_navigable_days: names.len(),
        week_index,
    }
}

fn navigable_names(schedule: &Schedule, week_index: u8) -> Vec<String> {
    schedule
        .week(week_index)
        .map(|w| {
            w.navigable_days()
                .iter()
                .map(|d| d.day_name.clone())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Day, Lesson, LessonAudience, ScheduleKind, SourceState, Week};

    fn lesson() -> Lesson {
        Lesson {
            name: "матанализ".into(),
            time: "08:00-09:30".into(),
            place: "к1 / корп. \"1\" каб. \"101\"".into(),
            lesson_type: None,
            subgroup: None,
            audience: LessonAudience::Professor("Петров П.П.".into()),
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

    // 2026-08-05 is a Wednesday in ISO week 32 (even -> week index 1).
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn today_present_returns_its_position() {
        let s = schedule(
            vec![
                day("Понедельник", true),
                day("Среда", true),
                day("Пятница", true),
            ],
            vec![],
        );
        let cursor = resolve_current_day(&s, 1, wednesday());
        assert_eq!(cursor.day_index, 2);
        assert_eq!(cursor.num_navigable_days, 3);
        assert_eq!(cursor.week_index, 1);
    }

    #[test]
    fn skips_forward_over_non_navigable_days() {
        let s = schedule(
            vec![
                day("Понедельник", true),
                day("Среда", false),
                day("Пятница", true),
            ],
            vec![],
        );
        // Wednesday has no lessons; Friday is the next navigable day and sits
        // at position 2 of the navigable list.
        let cursor = resolve_current_day(&s, 1, wednesday());
        assert_eq!(cursor.day_index, 2);
        assert_eq!(cursor.num_navigable_days, 2);
        assert_eq!(cursor.week_index, 1);
    }

    #[test]
    fn switches_week_when_rest_of_week_is_empty() {
        let s = schedule(
            vec![day("Понедельник", true)],
            vec![day("Вторник", true), day("Четверг", true)],
        );
        let cursor = resolve_current_day(&s, 1, wednesday());
        assert_eq!(cursor.week_index, 2);
        assert_eq!(cursor.day_index, 1);
        assert_eq!(cursor.num_navigable_days, 2);
    }

    #[test]
    fn falls_back_to_start_of_original_week() {
        let s = schedule(vec![day("Понедельник", true)], vec![day("Вторник", false)]);
        let cursor = resolve_current_day(&s, 1, wednesday());
        assert_eq!(cursor.week_index, 1);
        assert_eq!(cursor.day_index, 1);
        assert_eq!(cursor.num_navigable_days, 1);
    }

    #[test]
    fn empty_requested_week_fails_over_to_other_week() {
        let s = schedule(vec![day("Понедельник", true)], vec![day("Вторник", false)]);
        let cursor = resolve_current_day(&s, 2, wednesday());
        assert_eq!(cursor.week_index, 1);
        assert_eq!(cursor.day_index, 1);
        assert_eq!(cursor.num_navigable_days, 1);
    }

    #[test]
    fn fully_empty_schedule_yields_degenerate_cursor() {
        let s = schedule(vec![day("Понедельник", false)], vec![]);
        let cursor = resolve_current_day(&s, 1, wednesday());
        assert_eq!(cursor, DayCursor::degenerate(1));
    }

    #[test]
    fn parity_maps_even_weeks_to_first_index() {
        // ISO week 32 of 2026 is even, week 33 odd.
        assert_eq!(parity_week_index(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()), 1);
        assert_eq!(parity_week_index(NaiveDate::from_ymd_opt(2026, 8, 12).unwrap()), 2);
    }
}
