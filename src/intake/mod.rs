//! Intake form controller — the client side of the inquiry pipeline.
//!
//! The controller owns the four form fields and an explicit submission
//! state machine. It hands a validated [`InquiryPayload`] to an
//! [`InquiryTransport`] and interprets the relay's envelope.
//!
//! [`InquiryPayload`]: crate::inquiry::InquiryPayload

pub mod controller;
pub mod state;
pub mod transport;

pub use controller::{IntakeController, IntakeView, RETRY_MESSAGE, SubmitOutcome};
pub use state::IntakeState;
pub use transport::{HttpTransport, InquiryTransport};
