//! Schedule-change notifications: diff rendering and best-effort fan-out.
//!
//! A `Changed` schedule carries field-level change entries; the notifier
//! renders them into one message and delivers it to every subscriber of the
//! schedule's owner. Deliveries are independent: a failed recipient is
//! logged and counted, and never aborts the rest of the broadcast.

pub mod telegram;

use crate::error::{CoreError, Result};
use crate::model::{Schedule, ScheduleKind, SourceState};
use crate::subscriptions::{SubscriptionStore, UserId};

/// Outbound message transport. One method: deliver text to a user.
///
/// Implementations live at the edges (Telegram, tests); failures are
/// per-recipient and surfaced as boxed errors, matching the at-most-once
/// best-effort contract of the broadcast.
pub trait DeliveryChannel: Send + Sync {
    fn deliver(
        &self,
        user: UserId,
        text: &str,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: Vec<UserId>,
}

/// Render the change set into the notification body, or `None` when the
/// schedule carries no changes.
///
/// Weekly entries come first, labeled with their week number; session
/// entries follow under the session label. Each entry renders as
/// `<label>, <day>, <time>:` with the field diff indented below.
pub fn render_change_report(schedule: &Schedule) -> Option<String> {
    if schedule.changes.is_empty() {
        return None;
    }

    let subject = match schedule.kind {
        ScheduleKind::Group => "группы",
        ScheduleKind::Professor => "преподавателя",
    };
    let mut lines = vec![format!(
        "🔔 Обнаружены изменения в расписании {subject} {}:",
        schedule.owner_id
    )];

    let (weekly, session): (Vec<_>, Vec<_>) = schedule
        .changes
        .iter()
        .partition(|c| c.week_number.is_some());

    for change in weekly.iter().chain(session.iter()) {
        let label = match change.week_number {
            Some(n) => format!("Неделя {n}"),
            None => "Расписание сессии".to_string(),
        };
        lines.push(String::new());
        lines.push(format!(
            "{label}, {}, {}:\n  {}: {} -> {}",
            change.day_name, change.lesson_time, change.field, change.old_value, change.new_value
        ));
    }

    Some(lines.join("\n"))
}

/// Fan-out of change notifications to subscribers.
pub struct ChangeNotifier<'a> {
    store: &'a dyn SubscriptionStore,
    channel: &'a dyn DeliveryChannel,
}

impl<'a> ChangeNotifier<'a> {
    pub fn new(store: &'a dyn SubscriptionStore, channel: &'a dyn DeliveryChannel) -> Self {
        Self { store, channel }
    }

    /// Deliver the rendered change report to every subscriber of the
    /// schedule's owner. Returns how many deliveries succeeded and which
    /// recipients failed; per-recipient failures never propagate.
    pub fn broadcast(&self, schedule: &Schedule) -> Result<BroadcastReport> {
        if schedule.source_state != SourceState::Changed {
            return Err(CoreError::InvalidState(format!(
                "schedule for '{}' carries no change set",
                schedule.owner_id
            )));
        }
        let Some(text) = render_change_report(schedule) else {
            return Err(CoreError::InvalidState(format!(
                "changed schedule for '{}' has an empty change set",
                schedule.owner_id
            )));
        };

        let subscribers = self.store.subscribers(&schedule.owner_id)?;
        let mut report = BroadcastReport {
            delivered: 0,
            failed: Vec::new(),
        };
        for user in subscribers {
            match self.channel.deliver(user, &text) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(user, owner = %schedule.owner_id, error = %e,
                        "change notification delivery failed");
                    report.failed.push(user);
                }
            }
        }
        tracing::info!(owner = %schedule.owner_id, delivered = report.delivered,
            failed = report.failed.len(), "change broadcast finished");
        Ok(report)
    }
}
