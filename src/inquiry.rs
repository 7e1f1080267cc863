//! Inquiry payload and response envelope shared by the form and the relay.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of the contact field, hyphens included.
pub const CONTACT_MAX_LEN: usize = 13;

/// The only failure text a client ever sees from the relay.
pub const GENERIC_FAILURE_MESSAGE: &str = "문의 접수 중 오류가 발생했습니다.";

/// Optional leading 0, then three digit groups with optional hyphens
/// (010-1234-5678, 02-123-4567, 01012345678).
static CONTACT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0?\d{1,3}-?\d{3,4}-?\d{4}$").expect("contact pattern is a valid regex")
});

/// One form field of an inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Contact,
    Location,
    Area,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Contact, Field::Location, Field::Area];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Contact => "contact",
            Self::Location => "location",
            Self::Area => "area",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prospective client's inquiry, as posted to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryPayload {
    pub name: String,
    pub contact: String,
    pub location: String,
    pub area: String,
}

impl InquiryPayload {
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        location: impl Into<String>,
        area: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            location: location.into(),
            area: area.into(),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Contact => &self.contact,
            Field::Location => &self.location,
            Field::Area => &self.area,
        }
    }

    /// Client-side contract: every field is non-blank and the contact looks
    /// like a phone number. The relay does not repeat this check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in Field::ALL {
            if self.field(field).trim().is_empty() {
                return Err(ValidationError::MissingField { field });
            }
        }

        if !is_valid_contact(self.contact.trim()) {
            return Err(ValidationError::InvalidContact {
                value: self.contact.clone(),
            });
        }

        Ok(())
    }
}

/// Check a contact number against the phone shape and length cap.
pub fn is_valid_contact(contact: &str) -> bool {
    contact.chars().count() <= CONTACT_MAX_LEN && CONTACT_PATTERN.is_match(contact)
}

/// Keystroke filter for the contact field: digits and hyphens only, capped
/// at [`CONTACT_MAX_LEN`] characters.
pub fn filter_contact_input(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .take(CONTACT_MAX_LEN)
        .collect()
}

/// Response body returned by the relay. Reflects intake acceptance only,
/// never whether the operator was actually notified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    pub fn accepted() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}
