//! Telegram Bot API delivery channel.
//!
//! Posts `sendMessage` calls over HTTPS; the user id is the chat id.

use reqwest::Client;
use serde_json::json;

use crate::subscriptions::UserId;

use super::DeliveryChannel;

const API_BASE: &str = "https://api.telegram.org";

pub struct TelegramChannel {
    bot_token: String,
}

impl TelegramChannel {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
        }
    }

    /// Read the token from `TIMETABLE_BOT_TOKEN`.
    pub fn from_env() -> Option<Self> {
        std::env::var("TIMETABLE_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(Self::new)
    }

    fn send_message(
        &self,
        chat_id: UserId,
        text: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.bot_token.is_empty() {
            return Err("Telegram bot token not configured.".into());
        }

        let url = format!("{API_BASE}/bot{}/sendMessage", self.bot_token);
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let resp: serde_json::Value = tokio::runtime::Handle::current().block_on(async {
            Client::new()
                .post(&url)
                .json(&body)
                .send()
                .await?
                .json()
                .await
        })?;

        if resp["ok"].as_bool() == Some(true) {
            Ok(())
        } else {
            let description = resp["description"].as_str().unwrap_or("unknown error");
            Err(format!("Telegram API error: {description}").into())
        }
    }
}

impl DeliveryChannel for TelegramChannel {
    fn deliver(
        &self,
        user: UserId,
        text: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.send_message(user, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_fails_without_network() {
        let channel = TelegramChannel::new("");
        assert!(channel.send_message(1, "hi").is_err());
    }
}
