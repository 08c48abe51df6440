//! Calendar subcommand: rebuild the owner's public calendar from a snapshot.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Subcommand;
use indoc::formatdoc;
use rand::seq::SliceRandom;
use timetable_core::calendar::{GoogleCalendarClient, ProgressSink, SyncLocks};
use timetable_core::view::local_today;
use timetable_core::{Config, CoreError, SyncEngine};

use crate::common::load_schedule;

const PROGRESS_EMOJIS: [&str; 16] = [
    "🎓", "📚", "✏️", "📝", "📖", "🎯", "💡", "⭐️", "📊", "🔍", "📌", "📎", "🎨", "🎬", "🎮",
    "🎲",
];
const PROGRESS_BAR_LENGTH: usize = 10;

/// Redraws one terminal line per update (the transport edits one message
/// in place the same way).
struct EmojiProgress;

impl ProgressSink for EmojiProgress {
    fn update(&self, fraction: f64, status: &str) {
        let filled = ((fraction * PROGRESS_BAR_LENGTH as f64) as usize).min(PROGRESS_BAR_LENGTH);
        let mut rng = rand::thread_rng();
        let mut bar = String::new();
        for _ in 0..filled {
            bar.push_str(PROGRESS_EMOJIS.choose(&mut rng).unwrap_or(&"📚"));
        }
        bar.push_str(&"⬜️".repeat(PROGRESS_BAR_LENGTH - filled));
        print!("\r[{bar}] {status}          ");
        let _ = std::io::stdout().flush();
    }
}

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Rebuild and publish the calendar for a snapshot's owner
    Export {
        /// Path to a schedule snapshot (JSON)
        snapshot: PathBuf,
    },
}

/// Run the calendar command.
pub fn run(action: CalendarAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CalendarAction::Export { snapshot } => {
            let config = Config::load()?;
            let schedule = load_schedule(&snapshot)?;
            let today = local_today(config.calendar.tz_offset_hours);

            let engine = SyncEngine::with_locks(
                GoogleCalendarClient::new(config.token_store()?),
                config.sync_options(),
                SyncLocks::new(Duration::from_secs(config.cooldowns.lock_ttl_secs)),
            );

            match engine.sync(&schedule, today, &EmojiProgress) {
                Ok(url) => {
                    println!();
                    println!(
                        "{}",
                        formatdoc! {"
                            ✅ Календарь успешно создан!

                            Ссылка на календарь: {url}

                            Инструкция:
                            1. Откройте ссылку
                            2. Нажмите '+ Добавить календарь'
                            3. Календарь появится в вашем списке

                            Чтобы обновить календарь, запустите экспорт еще раз"
                        }
                    );
                }
                Err(CoreError::ThrottleRejected { wait_secs }) => {
                    println!();
                    println!(
                        "Календарь уже создается. Подождите {wait_secs} секунд и попробуйте снова."
                    );
                }
                Err(e) => {
                    println!();
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
