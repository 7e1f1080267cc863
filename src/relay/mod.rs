//! Inquiry relay — the server side of the intake pipeline.
//!
//! Every request is handled on its own: parse the body, take a snapshot of
//! the notification settings, dispatch at most one Telegram message, answer
//! with an envelope. Delivery failures are logged and never change the
//! envelope; only a malformed body or an unexpected failure does.

pub mod dispatch;
pub mod routes;

pub use dispatch::{DispatchOutcome, dispatch_inquiry};
pub use routes::{RelayState, relay_routes};
