//! Intake form controller.

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::state::IntakeState;
use super::transport::InquiryTransport;
use crate::error::ValidationError;
use crate::inquiry::{Field, InquiryPayload, filter_contact_input};

/// Shown after any failed submission. Deliberately says nothing technical.
pub const RETRY_MESSAGE: &str = "문의 접수 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.";

/// Result of one activation of the submit control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Submit was not enabled (form closed, blank field, or a request
    /// already in flight).
    Ignored,
    /// Client-side validation failed; no request was sent.
    Invalid(ValidationError),
    /// The relay accepted the inquiry. Fields are cleared.
    Accepted,
    /// The relay refused or could not be reached. Fields are kept.
    Failed,
    /// The form was closed while the request was in flight.
    Abandoned,
}

/// Read-only snapshot of the form, for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeView {
    pub state: IntakeState,
    pub fields: InquiryPayload,
    pub message: Option<String>,
    pub submit_disabled: bool,
}

#[derive(Debug)]
struct FormInner {
    state: IntakeState,
    fields: InquiryPayload,
    message: Option<String>,
    /// Bumped on every submission and on close, so a late response from an
    /// abandoned request can be recognised.
    attempt: u64,
}

impl FormInner {
    fn can_submit(&self) -> bool {
        self.state.is_open()
            && !self.state.is_submitting()
            && Field::ALL
                .iter()
                .all(|f| !self.fields.field(*f).trim().is_empty())
    }

    fn transition(&mut self, target: IntakeState) {
        debug_assert!(
            self.state.can_transition_to(target),
            "invalid intake transition {} -> {}",
            self.state,
            target
        );
        debug!(from = %self.state, to = %target, "Intake state transition");
        self.state = target;
    }
}

/// Owns the intake form fields and its submission state machine.
///
/// All methods take `&self`; the lock is never held across the network
/// call, so a second activation while a request is in flight sees
/// `Submitting` and is ignored.
pub struct IntakeController {
    inner: Mutex<FormInner>,
}

impl Default for IntakeController {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeController {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(FormInner {
                state: IntakeState::Idle,
                fields: InquiryPayload::new("", "", "", ""),
                message: None,
                attempt: 0,
            }),
        }
    }

    pub async fn view(&self) -> IntakeView {
        let inner = self.inner.lock().await;
        IntakeView {
            state: inner.state,
            fields: inner.fields.clone(),
            message: inner.message.clone(),
            submit_disabled: !inner.can_submit(),
        }
    }

    pub async fn state(&self) -> IntakeState {
        self.inner.lock().await.state
    }

    pub async fn can_submit(&self) -> bool {
        self.inner.lock().await.can_submit()
    }

    /// True while a request is in flight.
    pub async fn is_submit_disabled(&self) -> bool {
        self.inner.lock().await.state.is_submitting()
    }

    /// Show the form. Reopening after success or failure starts a new edit.
    pub async fn open(&self) {
        let mut inner = self.inner.lock().await;
        match inner.state {
            IntakeState::Idle | IntakeState::Success | IntakeState::Error => {
                inner.message = None;
                inner.transition(IntakeState::Editing);
            }
            IntakeState::Editing | IntakeState::Submitting => {}
        }
    }

    /// Hide the form. Field values are kept. An in-flight request is not
    /// cancelled, but its response will be ignored.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state.is_submitting() {
            info!("Intake closed while submitting; response will be ignored");
            inner.attempt += 1;
        }
        inner.message = None;
        inner.transition(IntakeState::Idle);
    }

    /// Clear every field and close the form.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state.is_submitting() {
            inner.attempt += 1;
        }
        inner.fields = InquiryPayload::new("", "", "", "");
        inner.message = None;
        inner.transition(IntakeState::Idle);
    }

    /// Update one field. Contact input is reduced to digits and hyphens and
    /// capped in length. Edits are ignored while the form is closed or
    /// submitting.
    pub async fn edit(&self, field: Field, value: &str) {
        let mut inner = self.inner.lock().await;
        if !inner.state.is_open() || inner.state.is_submitting() {
            debug!(state = %inner.state, %field, "Ignoring edit");
            return;
        }

        match field {
            Field::Name => inner.fields.name = value.to_string(),
            Field::Contact => inner.fields.contact = filter_contact_input(value),
            Field::Location => inner.fields.location = value.to_string(),
            Field::Area => inner.fields.area = value.to_string(),
        }

        if inner.state != IntakeState::Editing {
            inner.message = None;
            inner.transition(IntakeState::Editing);
        }
    }

    /// Activate the submit control.
    pub async fn submit(&self, transport: &dyn InquiryTransport) -> SubmitOutcome {
        let (attempt, payload) = {
            let mut inner = self.inner.lock().await;
            if !inner.can_submit() {
                return SubmitOutcome::Ignored;
            }

            let payload = inner.fields.clone();
            if let Err(e) = payload.validate() {
                debug!(error = %e, "Intake validation failed");
                inner.message = Some(e.user_message().to_string());
                if inner.state != IntakeState::Error {
                    inner.transition(IntakeState::Error);
                }
                return SubmitOutcome::Invalid(e);
            }

            inner.message = None;
            inner.attempt += 1;
            inner.transition(IntakeState::Submitting);
            (inner.attempt, payload)
        };

        let result = transport.submit(&payload).await;

        let mut inner = self.inner.lock().await;
        if inner.attempt != attempt || !inner.state.is_submitting() {
            debug!(attempt, "Dropping response for abandoned submission");
            return SubmitOutcome::Abandoned;
        }

        match result {
            Ok(envelope) if envelope.success => {
                info!("Inquiry submitted");
                inner.fields = InquiryPayload::new("", "", "", "");
                inner.transition(IntakeState::Success);
                SubmitOutcome::Accepted
            }
            Ok(envelope) => {
                warn!(error = ?envelope.error, "Relay refused inquiry");
                inner.message = Some(RETRY_MESSAGE.to_string());
                inner.transition(IntakeState::Error);
                SubmitOutcome::Failed
            }
            Err(e) => {
                warn!(error = %e, "Inquiry transport failed");
                inner.message = Some(RETRY_MESSAGE.to_string());
                inner.transition(IntakeState::Error);
                SubmitOutcome::Failed
            }
        }
    }
}
