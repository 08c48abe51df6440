//! Relative-day labeling for rendered days.
//!
//! Pure function of the real current date and the day being rendered,
//! independent of navigation state. Week-boundary wraparound counts:
//! Sunday of the current parity week followed by Monday of the other week
//! is "tomorrow", and the mirror case is "yesterday".

use chrono::{Datelike, NaiveDate, Weekday};

use super::resolve::{other_week, parity_week_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRelation {
    Today,
    Tomorrow,
    Yesterday,
    Other,
}

impl DayRelation {
    /// Suffix appended to the day header, empty for `Other`.
    pub fn suffix(self) -> &'static str {
        match self {
            DayRelation::Today => " (Сегодня)",
            DayRelation::Tomorrow => " (Завтра)",
            DayRelation::Yesterday => " (Вчера)",
            DayRelation::Other => "",
        }
    }
}

/// Relation of a rendered `(weekday, week_index)` slot to `today`.
pub fn day_relation(today: NaiveDate, rendered: Weekday, rendered_week_index: u8) -> DayRelation {
    let today_week = parity_week_index(today);
    let same_week = rendered_week_index == today_week;
    let other = rendered_week_index == other_week(today_week);
    let wd = today.weekday().num_days_from_monday();
    let rd = rendered.num_days_from_monday();

    if same_week && rd == wd {
        return DayRelation::Today;
    }

    let tomorrow = if wd < 6 {
        same_week && rd == wd + 1
    } else {
        other && rd == 0
    };
    if tomorrow {
        return DayRelation::Tomorrow;
    }

    let yesterday = if wd > 0 {
        same_week && rd + 1 == wd
    } else {
        other && rd == 6
    };
    if yesterday {
        return DayRelation::Yesterday;
    }

    DayRelation::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-08-05: Wednesday, ISO week 32 (even -> week index 1).
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    // 2026-08-09: Sunday of the same even week.
    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 9).unwrap()
    }

    // 2026-08-10: Monday, ISO week 33 (odd -> week index 2).
    fn monday_next() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
    }

    #[test]
    fn plain_neighbors_in_same_week() {
        assert_eq!(day_relation(wednesday(), Weekday::Wed, 1), DayRelation::Today);
        assert_eq!(
            day_relation(wednesday(), Weekday::Thu, 1),
            DayRelation::Tomorrow
        );
        assert_eq!(
            day_relation(wednesday(), Weekday::Tue, 1),
            DayRelation::Yesterday
        );
        assert_eq!(day_relation(wednesday(), Weekday::Fri, 1), DayRelation::Other);
    }

    #[test]
    fn same_weekday_on_other_week_is_not_today() {
        assert_eq!(day_relation(wednesday(), Weekday::Wed, 2), DayRelation::Other);
    }

    #[test]
    fn sunday_to_monday_crosses_week_boundary() {
        assert_eq!(
            day_relation(sunday(), Weekday::Mon, 2),
            DayRelation::Tomorrow
        );
        // Monday of the *same* parity week is a week away, not tomorrow.
        assert_eq!(day_relation(sunday(), Weekday::Mon, 1), DayRelation::Other);
    }

    #[test]
    fn monday_to_sunday_crosses_week_boundary_backwards() {
        assert_eq!(
            day_relation(monday_next(), Weekday::Sun, 1),
            DayRelation::Yesterday
        );
        assert_eq!(day_relation(monday_next(), Weekday::Sun, 2), DayRelation::Other);
    }
}
