use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{email_address::EmailAddress, macros::nutype_string};

/// Raw contact form input, exactly as typed by the user.
///
/// Fields missing from a request payload deserialize to empty strings, so they
/// are rejected by [`ContactSubmission::validate`] like any other empty field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

impl ContactField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];
}

impl ContactSubmission {
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Subject => &self.subject,
            ContactField::Message => &self.message,
        }
    }

    pub fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Subject => &mut self.subject,
            ContactField::Message => &mut self.message,
        }
    }

    /// Checks the fields in a fixed order and stops at the first violation.
    pub fn validate(self) -> Result<ContactMessage, ContactValidationError> {
        let name = ContactMessageAuthorName::try_new(self.name)
            .map_err(|_| ContactValidationError::NameRequired)?;

        if self.email.trim().is_empty() {
            return Err(ContactValidationError::EmailRequired);
        }
        let email = EmailAddress::try_new(self.email)
            .map_err(|_| ContactValidationError::InvalidEmail)?;

        let subject = ContactMessageSubject::try_new(self.subject)
            .map_err(|_| ContactValidationError::SubjectRequired)?;

        if self.message.trim().is_empty() {
            return Err(ContactValidationError::MessageRequired);
        }
        let content = ContactMessageContent::try_new(self.message)
            .map_err(|_| ContactValidationError::MessageTooShort)?;

        Ok(ContactMessage {
            author: ContactMessageAuthor { name, email },
            subject,
            content,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Subject is required")]
    SubjectRequired,
    #[error("Message is required")]
    MessageRequired,
    #[error("Message must be at least 10 characters")]
    MessageTooShort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub subject: ContactMessageSubject,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: EmailAddress,
}

nutype_string!(ContactMessageAuthorName(validate(predicate = |x| !x.trim().is_empty())));

nutype_string!(ContactMessageSubject(validate(predicate = |x| !x.trim().is_empty())));

nutype_string!(ContactMessageContent(validate(
    predicate = |x| !x.trim().is_empty(),
    len_char_min = ContactMessageContent::MIN_LENGTH
)));
impl ContactMessageContent {
    pub const MIN_LENGTH: usize = 10;
}

pub const SUBMISSION_SENT_MESSAGE: &str =
    "Message sent successfully! I'll get back to you within 24 hours.";
pub const SUBMISSION_SEND_FAILED_MESSAGE: &str = "Failed to send email. Please try again later.";
pub const SUBMISSION_SERVER_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Outcome of a contact form submission as reported back to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SubmissionErrorKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionErrorKind {
    ValidationError,
    SendError,
    ServerError,
}

impl SubmissionResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: SUBMISSION_SENT_MESSAGE.into(),
            error: None,
        }
    }

    pub fn invalid(err: ContactValidationError) -> Self {
        Self::failure(SubmissionErrorKind::ValidationError, err.to_string())
    }

    pub fn send_failed() -> Self {
        Self::failure(
            SubmissionErrorKind::SendError,
            SUBMISSION_SEND_FAILED_MESSAGE.into(),
        )
    }

    pub fn server_error() -> Self {
        Self::failure(
            SubmissionErrorKind::ServerError,
            SUBMISSION_SERVER_ERROR_MESSAGE.into(),
        )
    }

    fn failure(kind: SubmissionErrorKind, message: String) -> Self {
        Self {
            success: false,
            message,
            error: Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use portfolio_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    fn submission(name: &str, email: &str, subject: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    #[test]
    fn valid_submission() {
        // Act
        let result = submission("Jo", "jo@x.com", "Hi", "This is long enough").validate();

        // Assert
        assert_eq!(
            result.unwrap(),
            ContactMessage {
                author: ContactMessageAuthor {
                    name: "Jo".try_into().unwrap(),
                    email: "jo@x.com".parse().unwrap(),
                },
                subject: "Hi".try_into().unwrap(),
                content: "This is long enough".try_into().unwrap(),
            }
        );
    }

    #[test]
    fn each_rule_reports_its_own_error() {
        for (input, expected) in [
            (
                submission("", "jo@x.com", "Hi", "This is long enough"),
                ContactValidationError::NameRequired,
            ),
            (
                submission(" \t", "jo@x.com", "Hi", "This is long enough"),
                ContactValidationError::NameRequired,
            ),
            (
                submission("Jo", "  ", "Hi", "This is long enough"),
                ContactValidationError::EmailRequired,
            ),
            (
                submission("Jo", "jo@x", "Hi", "This is long enough"),
                ContactValidationError::InvalidEmail,
            ),
            (
                submission("Jo", "jo@x.com", "\n", "This is long enough"),
                ContactValidationError::SubjectRequired,
            ),
            (
                submission("Jo", "jo@x.com", "Hi", "           "),
                ContactValidationError::MessageRequired,
            ),
            (
                submission("Jo", "jo@x.com", "Hi", "short"),
                ContactValidationError::MessageTooShort,
            ),
        ] {
            assert_eq!(input.clone().validate(), Err(expected), "{input:?}");
        }
    }

    #[test]
    fn first_violation_wins() {
        let result = submission("", "not an email", "", "").validate();
        assert_matches!(result, Err(ContactValidationError::NameRequired));

        let result = submission("Jo", "foo@bar", "", "x").validate();
        assert_matches!(result, Err(ContactValidationError::InvalidEmail));
    }

    #[test]
    fn email_is_checked_untrimmed() {
        let result = submission("Jo", " jo@x.com", "Hi", "This is long enough").validate();
        assert_matches!(result, Err(ContactValidationError::InvalidEmail));
    }

    #[test]
    fn message_length_boundary() {
        let result = submission("Jo", "jo@x.com", "Hi", "123456789").validate();
        assert_matches!(result, Err(ContactValidationError::MessageTooShort));

        submission("Jo", "jo@x.com", "Hi", "1234567890")
            .validate()
            .unwrap();
    }

    #[test]
    fn message_length_counts_surrounding_whitespace() {
        submission("Jo", "jo@x.com", "Hi", "  hello   ")
            .validate()
            .unwrap();
    }

    #[test]
    fn validation_error_messages() {
        for (error, message) in [
            (ContactValidationError::NameRequired, "Name is required"),
            (ContactValidationError::EmailRequired, "Email is required"),
            (ContactValidationError::InvalidEmail, "Invalid email format"),
            (ContactValidationError::SubjectRequired, "Subject is required"),
            (ContactValidationError::MessageRequired, "Message is required"),
            (
                ContactValidationError::MessageTooShort,
                "Message must be at least 10 characters",
            ),
        ] {
            assert_eq!(error.to_string(), message);
        }
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let submission =
            serde_json::from_value::<ContactSubmission>(serde_json::json!({"name": "Jo"}))
                .unwrap();
        assert_eq!(submission.email, "");
        assert_matches!(
            submission.validate(),
            Err(ContactValidationError::EmailRequired)
        );
    }

    #[test]
    fn serialize_submission_result() {
        assert_eq!(
            serde_json::to_value(SubmissionResult::sent()).unwrap(),
            serde_json::json!({
                "success": true,
                "message": "Message sent successfully! I'll get back to you within 24 hours.",
            })
        );
        assert_eq!(
            serde_json::to_value(SubmissionResult::send_failed()).unwrap(),
            serde_json::json!({
                "success": false,
                "message": "Failed to send email. Please try again later.",
                "error": "SEND_ERROR",
            })
        );
        assert_eq!(
            serde_json::to_value(SubmissionResult::server_error()).unwrap()["error"],
            "SERVER_ERROR"
        );
        assert_eq!(
            serde_json::to_value(SubmissionResult::invalid(
                ContactValidationError::MessageTooShort
            ))
            .unwrap(),
            serde_json::json!({
                "success": false,
                "message": "Message must be at least 10 characters",
                "error": "VALIDATION_ERROR",
            })
        );
    }

    #[test]
    fn field_access() {
        let mut submission = ContactSubmission::default();

        submission.field_mut(ContactField::Subject).push_str("Hi");
        assert_eq!(submission.field(ContactField::Subject), "Hi");
        assert_eq!(submission.field(ContactField::Message), "");
    }
}
