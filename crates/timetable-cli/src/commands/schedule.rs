//! Schedule subcommand: open a snapshot and navigate it.

use std::path::PathBuf;

use clap::Subcommand;
use timetable_core::view::{local_today, Tab, ViewState};
use timetable_core::Config;

use crate::common::{load_schedule, render_view};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show the snapshot opened at the resolved current day
    Show {
        /// Path to a schedule snapshot (JSON)
        snapshot: PathBuf,
    },
    /// Apply a navigation script and print the state after every step
    Browse {
        /// Path to a schedule snapshot (JSON)
        snapshot: PathBuf,
        /// Comma-separated steps: next, prev, swap, today, basic, session, consultations
        #[arg(long, default_value = "today")]
        steps: String,
    },
}

/// Run the schedule command.
pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let today = local_today(config.calendar.tz_offset_hours);

    match action {
        ScheduleAction::Show { snapshot } => {
            let view = ViewState::open(load_schedule(&snapshot)?, today);
            println!("{}", render_view(&view, today));
        }
        ScheduleAction::Browse { snapshot, steps } => {
            let mut view = ViewState::open(load_schedule(&snapshot)?, today);
            println!("{}", render_view(&view, today));

            for step in steps.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let event = match step {
                    "next" => view.next_day(),
                    "prev" => view.prev_day(),
                    "swap" => view.swap_week(),
                    "today" => view.open_today(today),
                    "basic" => view.set_tab(Tab::Basic),
                    "session" => view.set_tab(Tab::Session),
                    "consultations" => view.set_tab(Tab::Consultations),
                    other => {
                        return Err(format!(
                            "Unknown step: {other}. Valid steps: next, prev, swap, today, basic, session, consultations"
                        )
                        .into());
                    }
                };

                println!("\n== {step} ==");
                // A no-op means the transport would skip the re-render too.
                match event {
                    Some(_) => println!("{}", render_view(&view, today)),
                    None => println!("(no change, render skipped)"),
                }
            }
        }
    }

    Ok(())
}
