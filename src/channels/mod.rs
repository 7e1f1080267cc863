//! Outbound notification channel.

pub mod notification;
pub mod telegram;

pub use notification::{format_notification, format_timestamp};
pub use telegram::TelegramNotifier;
