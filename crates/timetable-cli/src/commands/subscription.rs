//! Subscription subcommand over the shared JSON document.

use clap::Subcommand;
use timetable_core::{Config, JsonSubscriptionStore, SubscriptionStore};

#[derive(Subcommand)]
pub enum SubscriptionAction {
    /// Subscribe a user to a schedule owner
    Add {
        /// Chat/user id
        user: u64,
        /// Group or professor name
        owner: String,
    },
    /// Remove a subscription
    Remove {
        user: u64,
        owner: String,
    },
    /// List a user's subscriptions
    List {
        user: u64,
    },
    /// List subscribers of a schedule owner
    Subscribers {
        owner: String,
    },
}

/// Run the subscription command.
pub fn run(action: SubscriptionAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonSubscriptionStore::open(Config::subscriptions_path()?)?;

    match action {
        SubscriptionAction::Add { user, owner } => {
            if store.subscribe(user, &owner)? {
                println!("Subscribed {user} to '{owner}'");
            } else {
                println!("{user} is already subscribed to '{owner}'");
            }
        }
        SubscriptionAction::Remove { user, owner } => {
            if store.unsubscribe(user, &owner)? {
                println!("Unsubscribed {user} from '{owner}'");
            } else {
                println!("{user} was not subscribed to '{owner}'");
            }
        }
        SubscriptionAction::List { user } => {
            let owners = store.subscriptions(user)?;
            if owners.is_empty() {
                println!("No subscriptions for {user}");
            } else {
                for owner in owners {
                    println!("{owner}");
                }
            }
        }
        SubscriptionAction::Subscribers { owner } => {
            let users = store.subscribers(&owner)?;
            if users.is_empty() {
                println!("No subscribers for '{owner}'");
            } else {
                for user in users {
                    println!("{user}");
                }
            }
        }
    }

    Ok(())
}
