//! HTTP routes for the inquiry relay.

use std::any::Any;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::dispatch::{DispatchOutcome, dispatch_inquiry};
use crate::config::NotificationSource;
use crate::error::RelayError;
use crate::inquiry::{GENERIC_FAILURE_MESSAGE, InquiryPayload, ResponseEnvelope};

/// Path the intake form posts to.
pub const INQUIRY_PATH: &str = "/api/inquiry";

/// Shared state for relay routes. Holds no per-request data.
#[derive(Clone)]
pub struct RelayState {
    pub notifications: NotificationSource,
    pub client: reqwest::Client,
}

impl RelayState {
    pub fn new(notifications: NotificationSource) -> Self {
        Self {
            notifications,
            client: reqwest::Client::new(),
        }
    }
}

/// Build the relay router: the intake endpoint plus a health check.
pub fn relay_routes(state: RelayState) -> Router {
    with_middleware(
        Router::new()
            .route(INQUIRY_PATH, post(submit_inquiry))
            .route("/health", get(health))
            .with_state(state),
    )
}

/// CORS wraps the panic handler so the generic 500 still carries the
/// headers a cross-origin form needs to read it.
fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(CorsLayer::permissive())
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "inquiry-relay"
    }))
}

// ── Intake ──────────────────────────────────────────────────────────────

/// POST /api/inquiry
///
/// 200 `{success:true}` once the body parses, whatever happens to the
/// notification. 500 with the generic envelope otherwise.
async fn submit_inquiry(State(state): State<RelayState>, body: Bytes) -> Response {
    let inquiry_id = Uuid::new_v4();

    match relay_inquiry(&state, inquiry_id, &body).await {
        Ok(outcome) => {
            info!(%inquiry_id, dispatch = %outcome, "Inquiry accepted");
            Json(ResponseEnvelope::accepted()).into_response()
        }
        Err(e @ RelayError::Parse(_)) => {
            warn!(%inquiry_id, error = %e, "Rejected malformed inquiry");
            e.into_response()
        }
        Err(e) => {
            error!(%inquiry_id, error = %e, "Inquiry submission error");
            e.into_response()
        }
    }
}

async fn relay_inquiry(
    state: &RelayState,
    inquiry_id: Uuid,
    body: &[u8],
) -> crate::error::Result<DispatchOutcome> {
    let payload: InquiryPayload = serde_json::from_slice(body)?;
    let received_at = Utc::now();
    let config = state.notifications.snapshot();

    let outcome =
        dispatch_inquiry(inquiry_id, &payload, &config, &state.client, received_at).await?;
    Ok(outcome)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Inquiry handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ResponseEnvelope::failure(GENERIC_FAILURE_MESSAGE)),
    )
        .into_response()
}
