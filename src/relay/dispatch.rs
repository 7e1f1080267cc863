//! Notification dispatch for a parsed inquiry.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::channels::{TelegramNotifier, format_notification};
use crate::config::NotificationConfig;
use crate::error::ChannelError;
use crate::inquiry::InquiryPayload;

/// What happened to the operator notification for one inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Telegram accepted the message.
    Delivered,
    /// Telegram answered with a non-success status. Logged and swallowed.
    Rejected { status: u16 },
    /// No credentials configured; nothing was sent.
    Skipped,
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivered => write!(f, "delivered"),
            Self::Rejected { status } => write!(f, "rejected ({status})"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Send the operator notification for `payload` using the `config` snapshot.
///
/// Returns `Err` only when the outbound call itself fails (connection, TLS,
/// etc). A non-success answer from Telegram is `Ok(Rejected)`.
pub async fn dispatch_inquiry(
    inquiry_id: Uuid,
    payload: &InquiryPayload,
    config: &NotificationConfig,
    client: &reqwest::Client,
    received_at: DateTime<Utc>,
) -> Result<DispatchOutcome, ChannelError> {
    let Some(notifier) = TelegramNotifier::from_config(config, client.clone()) else {
        tracing::info!(%inquiry_id, "Notification channel not configured, skipping dispatch");
        return Ok(DispatchOutcome::Skipped);
    };

    let text = format_notification(payload, &received_at.with_timezone(&config.timezone));

    match notifier.send_message(&text).await {
        Ok(()) => {
            tracing::info!(%inquiry_id, "Inquiry notification delivered");
            Ok(DispatchOutcome::Delivered)
        }
        Err(ChannelError::Rejected { status, body, .. }) => {
            tracing::error!(%inquiry_id, status, body = %body, "Telegram API error");
            Ok(DispatchOutcome::Rejected { status })
        }
        Err(e) => Err(e),
    }
}
