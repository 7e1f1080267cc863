//! Configuration types.
//!
//! Everything is read from the environment. Notification credentials are
//! re-read for every request through [`NotificationSource`], so the handler
//! always works from an immutable snapshot.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono_tz::Tz;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Timezone used for notification timestamps unless overridden.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Seoul;

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Load from `INQUIRY_RELAY_HOST` / `INQUIRY_RELAY_PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = match std::env::var("INQUIRY_RELAY_HOST") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "INQUIRY_RELAY_HOST".into(),
                message: format!("{raw:?}: {e}"),
            })?,
            Err(_) => defaults.host,
        };

        let port = match std::env::var("INQUIRY_RELAY_PORT") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "INQUIRY_RELAY_PORT".into(),
                message: format!("{raw:?}: {e}"),
            })?,
            Err(_) => defaults.port,
        };

        Ok(Self { host, port })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Outbound notification settings. Missing credentials mean the channel is
/// simply not configured.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub bot_token: Option<SecretString>,
    pub chat_id: Option<String>,
    pub api_base: String,
    pub timezone: Tz,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl NotificationConfig {
    /// Read `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`, `TELEGRAM_API_BASE`
    /// and `INQUIRY_TIMEZONE`. Empty values count as absent.
    pub fn from_env() -> Self {
        let bot_token = non_empty_var("TELEGRAM_BOT_TOKEN").map(SecretString::from);
        let chat_id = non_empty_var("TELEGRAM_CHAT_ID");
        let api_base = non_empty_var("TELEGRAM_API_BASE")
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string());

        let timezone = match non_empty_var("INQUIRY_TIMEZONE") {
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(
                    timezone = %name,
                    fallback = DEFAULT_TIMEZONE.name(),
                    "Unknown timezone, using default"
                );
                DEFAULT_TIMEZONE
            }),
            None => DEFAULT_TIMEZONE,
        };

        Self {
            bot_token,
            chat_id,
            api_base,
            timezone,
        }
    }

    /// Build a configured snapshot with the given credentials.
    pub fn with_credentials(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: Some(SecretString::from(bot_token.into())),
            chat_id: Some(chat_id.into()),
            ..Default::default()
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Credentials when both token and chat id are present and non-empty.
    pub fn credentials(&self) -> Option<(&SecretString, &str)> {
        let token = self.bot_token.as_ref()?;
        let chat_id = self.chat_id.as_deref()?;
        if token.expose_secret().is_empty() || chat_id.is_empty() {
            return None;
        }
        Some((token, chat_id))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

/// Where the relay takes its notification snapshot from on each request.
#[derive(Debug, Clone)]
pub enum NotificationSource {
    /// Re-read the process environment per request.
    Env,
    /// A fixed snapshot, used by tests and embedders.
    Fixed(NotificationConfig),
}

impl NotificationSource {
    pub fn snapshot(&self) -> NotificationConfig {
        match self {
            Self::Env => NotificationConfig::from_env(),
            Self::Fixed(config) => config.clone(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
