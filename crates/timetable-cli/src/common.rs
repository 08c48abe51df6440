//! Shared helpers: snapshot loading and text rendering of a view state.

use std::path::Path;

use chrono::NaiveDate;
use timetable_core::model::{
    capitalize_first, compact_place, weekday_from_label, Day, Schedule, SourceState,
};
use timetable_core::view::{day_relation, Tab, ViewState};
use timetable_core::{CacheHint, CoreError, ScheduleSource};

/// Schedule source backed by JSON snapshot files; the query is the path.
pub struct JsonFileSource;

impl ScheduleSource for JsonFileSource {
    fn fetch(&self, query: &str, _hint: CacheHint) -> Result<Schedule, CoreError> {
        let path = Path::new(query);
        if !path.exists() {
            return Err(CoreError::NotFound(query.to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CoreError::ExternalFetchFailure(format!("snapshot {query}: {e}")))
    }
}

pub fn load_schedule(path: &Path) -> Result<Schedule, CoreError> {
    JsonFileSource.fetch(&path.to_string_lossy(), CacheHint::AllowCache)
}

fn render_lessons(day: &Day, out: &mut Vec<String>) {
    for lesson in &day.lessons {
        let mut line = format!("  {} {}", lesson.time, capitalize_first(&lesson.name));
        if let Some(t) = &lesson.lesson_type {
            line.push_str(&format!("  |  {t}"));
        }
        if let Some(s) = &lesson.subgroup {
            line.push_str(&format!("  |  {s}"));
        }
        out.push(line);
        out.push(format!(
            "    {}  {}",
            compact_place(&lesson.place),
            lesson.audience.as_text()
        ));
    }
}

/// Text rendering of the current view, one line per display row.
pub fn render_view(view: &ViewState, today: NaiveDate) -> String {
    let schedule = view.schedule();
    let mut out = vec![format!("{} {}", schedule.owner_id, schedule.semester_label)];
    if schedule.source_state == SourceState::Proxy {
        out.push("(расписание загружено из кэша)".to_string());
    }
    out.push(String::new());

    match view.tab() {
        Tab::Basic => match view.current_day() {
            Some(day) => {
                let suffix = weekday_from_label(&day.day_name)
                    .map(|wd| day_relation(today, wd, view.week_index()).suffix())
                    .unwrap_or("");
                out.push(format!(
                    "{}{} - {} Неделя  [день {}/{}]",
                    day.day_name,
                    suffix,
                    view.week_index(),
                    view.day_index(),
                    view.num_navigable_days()
                ));
                render_lessons(day, &mut out);
            }
            None => out.push("Расписание занятий отсутствует".to_string()),
        },
        Tab::Session => {
            if schedule.session.is_empty() {
                out.push("Расписание сессии отсутствует".to_string());
            } else {
                out.push("Расписание сессии:".to_string());
                for day in &schedule.session {
                    out.push(format!("{}:", day.day_name));
                    render_lessons(day, &mut out);
                }
            }
        }
        Tab::Consultations => {
            if schedule.consultations.is_empty() {
                out.push("Расписание консультаций отсутствует".to_string());
            } else {
                out.push("Расписание консультаций:".to_string());
                for day in &schedule.consultations {
                    out.push(format!("{}:", day.day_name));
                    render_lessons(day, &mut out);
                }
            }
        }
    }

    out.join("\n")
}
