//! Calendar provider access.
//!
//! `CalendarApi` is the narrow contract the sync engine needs; the Google
//! implementation talks to the Calendar v3 REST API with bearer tokens.
//! Calendar and event ids are opaque strings minted by the provider.

use std::sync::Mutex;

use reqwest::Client;
use serde_json::json;

use super::auth::TokenStore;
use super::recurrence::RecurringEvent;
use crate::error::SyncError;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Client-side presentation settings applied when connecting.
#[derive(Debug, Clone)]
pub struct CalendarSettings {
    pub format_24h: bool,
    pub locale: String,
    /// IANA timezone name events are anchored to.
    pub timezone: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            format_24h: true,
            locale: "ru".into(),
            timezone: "Asia/Krasnoyarsk".into(),
        }
    }
}

/// Provider operations the sync engine relies on.
pub trait CalendarApi: Send + Sync {
    /// Validate connectivity and apply presentation settings.
    fn connect(&self, settings: &CalendarSettings) -> Result<(), SyncError>;

    /// Find the calendar named `name`, creating it when absent. Returns the
    /// provider's opaque calendar id.
    fn find_or_create_calendar(&self, name: &str, description: &str) -> Result<String, SyncError>;

    /// Delete every event on the calendar. Returns how many were removed.
    fn clear_events(&self, calendar_id: &str) -> Result<usize, SyncError>;

    fn insert_event(&self, calendar_id: &str, event: &RecurringEvent) -> Result<(), SyncError>;

    /// Grant public read access (default scope, reader role).
    fn publish_reader_acl(&self, calendar_id: &str) -> Result<(), SyncError>;

    /// Shareable URL users add the calendar from.
    fn share_url(&self, calendar_id: &str) -> String {
        format!(
            "https://calendar.google.com/calendar/u/0/r?cid={}",
            calendar_id
        )
    }
}

/// Google Calendar v3 implementation.
pub struct GoogleCalendarClient {
    auth: TokenStore,
    /// Settings captured by `connect`, used when building event payloads.
    settings: Mutex<CalendarSettings>,
}

impl GoogleCalendarClient {
    pub fn new(auth: TokenStore) -> Self {
        Self {
            auth,
            settings: Mutex::new(CalendarSettings::default()),
        }
    }

    fn get(&self, url: &str) -> Result<serde_json::Value, SyncError> {
        let token = self.auth.access_token()?;
        let resp: serde_json::Value = tokio::runtime::Handle::current().block_on(async {
            Client::new()
                .get(url)
                .bearer_auth(&token)
                .send()
                .await?
                .json()
                .await
        })?;
        Self::check_envelope(resp)
    }

    fn post(&self, url: &str, body: serde_json::Value) -> Result<serde_json::Value, SyncError> {
        let token = self.auth.access_token()?;
        let resp: serde_json::Value = tokio::runtime::Handle::current().block_on(async {
            Client::new()
                .post(url)
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?
                .json()
                .await
        })?;
        Self::check_envelope(resp)
    }

    fn delete(&self, url: &str) -> Result<(), SyncError> {
        let token = self.auth.access_token()?;
        let status = tokio::runtime::Handle::current().block_on(async {
            Client::new()
                .delete(url)
                .bearer_auth(&token)
                .send()
                .await
                .map(|r| r.status())
        })?;
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Api(format!("DELETE returned HTTP {status}")))
        }
    }

    fn check_envelope(resp: serde_json::Value) -> Result<serde_json::Value, SyncError> {
        if let Some(err) = resp.get("error") {
            return Err(SyncError::Api(err.to_string()));
        }
        Ok(resp)
    }

    fn timezone(&self) -> String {
        self.settings
            .lock()
            .map(|s| s.timezone.clone())
            .unwrap_or_else(|_| CalendarSettings::default().timezone)
    }
}

impl CalendarApi for GoogleCalendarClient {
    fn connect(&self, settings: &CalendarSettings) -> Result<(), SyncError> {
        if let Ok(mut guard) = self.settings.lock() {
            *guard = settings.clone();
        }
        // Cheap authenticated call to surface token problems before the
        // destructive steps start.
        self.get(&format!("{CALENDAR_API_BASE}/users/me/settings/timezone"))?;
        Ok(())
    }

    fn find_or_create_calendar(&self, name: &str, description: &str) -> Result<String, SyncError> {
        let list = self.get(&format!("{CALENDAR_API_BASE}/users/me/calendarList"))?;
        if let Some(items) = list["items"].as_array() {
            for cal in items {
                if cal["summary"].as_str() == Some(name) {
                    if let Some(id) = cal["id"].as_str() {
                        tracing::info!(calendar = name, "using existing calendar");
                        return Ok(id.to_string());
                    }
                }
            }
        }

        let created = self.post(
            &format!("{CALENDAR_API_BASE}/calendars"),
            json!({ "summary": name, "description": description }),
        )?;
        let id = created["id"]
            .as_str()
            .ok_or_else(|| SyncError::Api("missing id in created calendar".into()))?;
        tracing::info!(calendar = name, "created new calendar");
        Ok(id.to_string())
    }

    fn clear_events(&self, calendar_id: &str) -> Result<usize, SyncError> {
        let encoded = urlencoding::encode(calendar_id);
        let mut removed = 0;
        let mut page_token: Option<String> = None;

        loop {
            let mut url =
                format!("{CALENDAR_API_BASE}/calendars/{encoded}/events?maxResults=2500");
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
            }
            let page = self.get(&url)?;

            for event in page["items"].as_array().unwrap_or(&Vec::new()) {
                if let Some(event_id) = event["id"].as_str() {
                    self.delete(&format!(
                        "{CALENDAR_API_BASE}/calendars/{encoded}/events/{event_id}"
                    ))?;
                    removed += 1;
                }
            }

            page_token = page["nextPageToken"].as_str().map(String::from);
            if page_token.is_none() {
                break;
            }
        }

        Ok(removed)
    }

    fn insert_event(&self, calendar_id: &str, event: &RecurringEvent) -> Result<(), SyncError> {
        let timezone = self.timezone();
        let encoded = urlencoding::encode(calendar_id);
        self.post(
            &format!("{CALENDAR_API_BASE}/calendars/{encoded}/events"),
            json!({
                "summary": event.summary,
                "location": event.location,
                "start": { "dateTime": event.start.to_rfc3339(), "timeZone": timezone },
                "end": { "dateTime": event.end.to_rfc3339(), "timeZone": timezone },
                "recurrence": [event.rrule],
            }),
        )?;
        Ok(())
    }

    fn publish_reader_acl(&self, calendar_id: &str) -> Result<(), SyncError> {
        let encoded = urlencoding::encode(calendar_id);
        self.post(
            &format!("{CALENDAR_API_BASE}/calendars/{encoded}/acl"),
            json!({ "role": "reader", "scope": { "type": "default" } }),
        )?;
        Ok(())
    }
}
