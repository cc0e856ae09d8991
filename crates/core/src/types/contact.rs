//! Contact form submissions and stored contact messages.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};
use super::id::MessageId;

/// A contact form field, used to point validation errors at the right input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    /// Maximum length in characters after trimming.
    #[must_use]
    pub const fn max_chars(self) -> usize {
        match self {
            Self::Name => 100,
            Self::Email => Email::MAX_LENGTH,
            Self::Subject => 200,
            Self::Message => 2000,
        }
    }

    /// Field name as it appears in the JSON body.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for a contact form submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    Missing(Field),

    /// A field exceeds its length limit.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// The offending field.
        field: Field,
        /// Maximum allowed length in characters.
        max: usize,
    },

    /// The email address is malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),
}

impl ContactError {
    /// The field this error refers to.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Missing(field) | Self::TooLong { field, .. } => *field,
            Self::InvalidEmail(_) => Field::Email,
        }
    }
}

/// Raw contact form body as sent by the browser.
///
/// Missing fields deserialize as empty strings so that validation, not the
/// JSON decoder, reports which field is absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// A stored contact message.
///
/// Created exactly once from a valid [`ContactSubmission`]. The only field
/// that ever changes afterwards is `read`, and only from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: MessageId,
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl ContactMessage {
    /// Validate a submission and build a new unread message.
    ///
    /// Text fields are trimmed before validation and storage.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError`] for the first field that is blank, too long,
    /// or (for `email`) malformed. Fields are checked in form order.
    pub fn from_submission(
        submission: &ContactSubmission,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ContactError> {
        let name = required(Field::Name, &submission.name)?;
        let email = required(Field::Email, &submission.email)?;
        let subject = required(Field::Subject, &submission.subject)?;
        let message = required(Field::Message, &submission.message)?;

        let email = Email::parse(email)?;

        Ok(Self {
            id: MessageId::new(),
            name: name.to_owned(),
            email,
            subject: subject.to_owned(),
            message: message.to_owned(),
            timestamp,
            read: false,
        })
    }

    /// Mark the message as read.
    ///
    /// Returns `true` if the flag changed, `false` if it was already read.
    pub const fn mark_read(&mut self) -> bool {
        let changed = !self.read;
        self.read = true;
        changed
    }
}

/// Trim a field and enforce presence and maximum length.
fn required(field: Field, value: &str) -> Result<&str, ContactError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContactError::Missing(field));
    }
    let max = field.max_chars();
    if trimmed.chars().count() > max {
        return Err(ContactError::TooLong { field, max });
    }
    Ok(trimmed)
}
