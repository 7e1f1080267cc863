//! Error types for the inquiry relay.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::inquiry::{Field, GENERIC_FAILURE_MESSAGE, ResponseEnvelope};

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Client-side field validation errors. Never reach the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Field {field} is required")]
    MissingField { field: Field },

    #[error("Contact number {value:?} is not a valid phone number")]
    InvalidContact { value: String },
}

impl ValidationError {
    /// Text shown next to the form. Never echoes the rejected value.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField { field } => match field {
                Field::Name => "성함을 입력해 주세요.",
                Field::Contact => "연락처를 입력해 주세요.",
                Field::Location => "위치를 입력해 주세요.",
                Field::Area => "면적을 입력해 주세요.",
            },
            Self::InvalidContact { .. } => "연락처 형식을 확인해 주세요. (예: 010-0000-0000)",
        }
    }
}

/// Errors seen by the intake controller while talking to the relay.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Relay responded with status {status} and no envelope")]
    Status { status: u16 },

    #[error("Invalid response from relay: {0}")]
    InvalidResponse(String),
}

/// Outbound notification channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to send notification on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Channel {name} rejected notification with status {status}: {body}")]
    Rejected {
        name: String,
        status: u16,
        body: String,
    },
}

/// Relay handler errors. Every variant is reported to the client as the
/// generic failure envelope; details only go to the log.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Malformed inquiry body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] ChannelError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ResponseEnvelope::failure(GENERIC_FAILURE_MESSAGE)),
        )
            .into_response()
    }
}

/// Result type alias for the relay handler.
pub type Result<T> = std::result::Result<T, RelayError>;
