//! Shared schedule data model.
//!
//! The aggregates here are produced by the site parsers (external
//! collaborators) and consumed by the view engine, the change notifier and
//! the calendar sync engine. Snapshots serialize to JSON.
//!
//! A two-week rotating timetable is modeled as `weeks[0]` = week "1" and
//! `weeks[1]` = week "2". Days keep the order the source site lists them in;
//! a day without lessons exists in the data but is skipped by pagination.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Who the schedule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Group,
    Professor,
}

/// Where a fetched schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceState {
    Fresh,
    Cache,
    /// Fresh fetch that differs from the cached version; `changes` is populated.
    Changed,
    /// Served from the proxy cache because the source site was unreachable.
    Proxy,
}

/// Kind-specific payload on a lesson: group schedules name the professor,
/// professor schedules name the attending groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LessonAudience {
    Professor(String),
    Groups(Vec<String>),
}

impl LessonAudience {
    /// Display form: the professor name, or the groups joined with ", ".
    pub fn as_text(&self) -> String {
        match self {
            LessonAudience::Professor(name) => name.clone(),
            LessonAudience::Groups(groups) => groups.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub name: String,
    /// Start-end range as published by the source, e.g. `"08:00-09:30"`.
    pub time: String,
    /// Raw place string, e.g. `корпус "Н" / корп. "Н" каб. "207"`.
    pub place: String,
    /// Lesson type (лекция / лабораторная / практика), when the site lists one.
    #[serde(default)]
    pub lesson_type: Option<String>,
    #[serde(default)]
    pub subgroup: Option<String>,
    pub audience: LessonAudience,
}

impl Lesson {
    /// Parse the `"HH:MM-HH:MM"` range into start and end times.
    pub fn time_range(&self) -> Result<(NaiveTime, NaiveTime), SyncError> {
        let (start, end) = self
            .time
            .split_once('-')
            .ok_or_else(|| SyncError::BadLessonTime(self.time.clone()))?;
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s.trim(), "%H:%M")
                .map_err(|_| SyncError::BadLessonTime(self.time.clone()))
        };
        Ok((parse(start)?, parse(end)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Weekday label as the source prints it (`Понедельник` .. `Воскресенье`).
    pub day_name: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Day {
    /// A day is navigable only when it has at least one lesson.
    pub fn is_navigable(&self) -> bool {
        !self.lessons.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    /// 1 or 2.
    pub week_number: u8,
    pub days: Vec<Day>,
}

impl Week {
    /// Days with at least one lesson, in original order.
    pub fn navigable_days(&self) -> Vec<&Day> {
        self.days.iter().filter(|d| d.is_navigable()).collect()
    }

    pub fn navigable_count(&self) -> usize {
        self.days.iter().filter(|d| d.is_navigable()).count()
    }
}

/// A single field-level difference against the previously cached schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Absent for session-schedule entries.
    #[serde(default)]
    pub week_number: Option<u8>,
    pub day_name: String,
    pub lesson_time: String,
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

/// Root aggregate: one group's or professor's full timetable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Group name or professor name. Doubles as the subscription key and
    /// the external calendar name.
    pub owner_id: String,
    pub kind: ScheduleKind,
    /// Semester / academic-year label shown in headers.
    #[serde(default)]
    pub semester_label: String,
    /// Two alternating weeks; index 0 = week "1", index 1 = week "2".
    pub weeks: Vec<Week>,
    /// Exam-period days, when published.
    #[serde(default)]
    pub session: Vec<Day>,
    /// Consultation days (professor schedules only).
    #[serde(default)]
    pub consultations: Vec<Day>,
    pub source_state: SourceState,
    /// Populated iff `source_state == Changed`.
    #[serde(default)]
    pub changes: Vec<ChangeEntry>,
}

impl Schedule {
    /// Checked 1-based week accessor.
    pub fn week(&self, week_index: u8) -> Option<&Week> {
        match week_index {
            1 | 2 => self.weeks.get(week_index as usize - 1),
            _ => None,
        }
    }
}

/// Weekday labels in the source's fixed Mon-Sun order.
pub const WEEKDAY_LABELS: [&str; 7] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
    "Воскресенье",
];

/// Label for a chrono weekday.
pub fn weekday_label(weekday: Weekday) -> &'static str {
    WEEKDAY_LABELS[weekday.num_days_from_monday() as usize]
}

/// Inverse of [`weekday_label`]. Case-insensitive; `None` for labels the
/// source never produces.
pub fn weekday_from_label(label: &str) -> Option<Weekday> {
    let lower = label.trim().to_lowercase();
    WEEKDAY_LABELS
        .iter()
        .position(|l| l.to_lowercase() == lower)
        .map(|i| match i {
            0 => Weekday::Mon,
            1 => Weekday::Tue,
            2 => Weekday::Wed,
            3 => Weekday::Thu,
            4 => Weekday::Fri,
            5 => Weekday::Sat,
            _ => Weekday::Sun,
        })
}

/// Compact a place string like `корп. "Н" каб. "207"` to `Н-207`.
///
/// Place strings arrive as `<campus query> / <building and room>`; only the
/// part after the slash is compacted. Anything that does not match the
/// quoted shape is returned as-is.
pub fn compact_place(place: &str) -> String {
    let detail = place.split(" / ").nth(1).unwrap_or(place);
    let parts: Vec<&str> = detail.split('"').collect();
    if parts.len() >= 4 {
        format!("{}-{}", parts[1].trim(), parts[3].trim())
    } else {
        detail.to_string()
    }
}

/// Uppercase the first character (lesson names arrive lowercased).
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
