use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "timetable-cli", version, about = "Timetable bot CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule viewing and navigation
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Subscription management
    Subscription {
        #[command(subcommand)]
        action: commands::subscription::SubscriptionAction,
    },
    /// Change-notification broadcast
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Calendar export
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Blocking HTTP sections in the core resolve the ambient runtime handle.
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let _guard = runtime.enter();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Subscription { action } => commands::subscription::run(action),
        Commands::Notify { action } => commands::notify::run(action),
        Commands::Calendar { action } => commands::calendar::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
