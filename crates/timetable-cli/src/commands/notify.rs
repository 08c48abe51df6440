//! Notify subcommand: broadcast schedule changes to subscribers.

use std::path::PathBuf;

use clap::Subcommand;
use timetable_core::notify::{render_change_report, telegram::TelegramChannel};
use timetable_core::{ChangeNotifier, Config, JsonSubscriptionStore, SubscriptionStore};

use crate::common::load_schedule;

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Deliver the change report of a snapshot to every subscriber
    Broadcast {
        /// Path to a changed schedule snapshot (JSON)
        snapshot: PathBuf,
        /// Render the report and count recipients without sending
        #[arg(long)]
        dry_run: bool,
    },
}

/// Run the notify command.
pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        NotifyAction::Broadcast { snapshot, dry_run } => {
            let schedule = load_schedule(&snapshot)?;
            let store = JsonSubscriptionStore::open(Config::subscriptions_path()?)?;

            if dry_run {
                match render_change_report(&schedule) {
                    Some(text) => {
                        let subscribers = store.subscribers(&schedule.owner_id)?;
                        println!("{text}");
                        println!();
                        println!("Would notify {} subscriber(s).", subscribers.len());
                    }
                    None => println!("Snapshot carries no changes."),
                }
                return Ok(());
            }

            let channel = TelegramChannel::from_env()
                .ok_or("TIMETABLE_BOT_TOKEN not set; use --dry-run to preview")?;
            let report = ChangeNotifier::new(&store, &channel).broadcast(&schedule)?;
            println!(
                "Delivered to {} subscriber(s), {} failed.",
                report.delivered,
                report.failed.len()
            );
        }
    }

    Ok(())
}
