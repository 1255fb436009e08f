use std::future::Future;

use portfolio_models::email_address::EmailAddress;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Hand an email over to the delivery provider.
    ///
    /// The outer error is a transport level fault (the provider could not be
    /// reached or answered garbage), the inner one is a failure explicitly
    /// reported by the provider.
    fn send(
        &self,
        email: Email,
    ) -> impl Future<Output = anyhow::Result<Result<SentEmail, EmailRejection>>> + Send;

    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddress,
    pub subject: String,
    pub body: String,
    pub content_type: ContentType,
    pub reply_to: Option<EmailAddress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name} ({status}): {message}")]
pub struct EmailRejection {
    pub status: u16,
    pub name: String,
    pub message: String,
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: Email, result: Result<SentEmail, EmailRejection>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_failure(mut self, email: Email, error: anyhow::Error) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Err(error))));
        self
    }

    pub fn with_ping(mut self, ok: bool) -> Self {
        self.expect_ping().once().return_once(move || {
            Box::pin(std::future::ready(
                ok.then_some(())
                    .ok_or_else(|| anyhow::anyhow!("email api unreachable")),
            ))
        });
        self
    }
}
