//! Telegram notifier — posts operator alerts through the Bot API.
//!
//! Only `sendMessage` is used. The response body is read solely to log it
//! when Telegram refuses the message.

use secrecy::{ExposeSecret, SecretString};

use crate::config::NotificationConfig;
use crate::error::ChannelError;

const CHANNEL_NAME: &str = "telegram";

/// Sends plain-text messages to one Telegram chat.
pub struct TelegramNotifier {
    bot_token: SecretString,
    chat_id: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(
        bot_token: SecretString,
        chat_id: impl Into<String>,
        api_base: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            bot_token,
            chat_id: chat_id.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Build a notifier from a config snapshot, or `None` when the channel
    /// has no credentials.
    pub fn from_config(config: &NotificationConfig, client: reqwest::Client) -> Option<Self> {
        let (token, chat_id) = config.credentials()?;
        Some(Self::new(
            token.clone(),
            chat_id,
            config.api_base.as_str(),
            client,
        ))
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base,
            self.bot_token.expose_secret()
        )
    }

    /// Send one message. A transport failure is `SendFailed`; a non-success
    /// status from Telegram is `Rejected`.
    pub async fn send_message(&self, text: &str) -> Result<(), ChannelError> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: CHANNEL_NAME.into(),
                // reqwest errors carry the URL, which contains the token.
                reason: e.without_url().to_string(),
            })?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(chat_id = %self.chat_id, "Telegram notification sent");
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ChannelError::Rejected {
            name: CHANNEL_NAME.into(),
            status: status.as_u16(),
            body,
        })
    }
}
