use std::future::Future;

use portfolio_models::contact::{ContactSubmission, ContactValidationError, SubmissionResult};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Validate a contact form submission and forward it to the site owner.
    ///
    /// Never fails: every outcome, including unexpected errors, is reported
    /// through the returned [`SubmissionResult`].
    fn submit(&self, submission: ContactSubmission)
        -> impl Future<Output = SubmissionResult> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error(transparent)]
    Validation(#[from] ContactValidationError),
    #[error("The email provider rejected the message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ContactSubmitError> for SubmissionResult {
    fn from(value: ContactSubmitError) -> Self {
        match value {
            ContactSubmitError::Validation(err) => Self::invalid(err),
            ContactSubmitError::Send => Self::send_failed(),
            ContactSubmitError::Other(_) => Self::server_error(),
        }
    }
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_submit(mut self, submission: ContactSubmission, result: SubmissionResult) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
