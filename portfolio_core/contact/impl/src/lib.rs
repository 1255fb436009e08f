use std::sync::Arc;

use portfolio_core_contact_contracts::{ContactService, ContactSubmitError};
use portfolio_email_contracts::{ContentType, Email, EmailService};
use portfolio_models::{
    contact::{ContactMessage, ContactSubmission, SubmissionResult},
    email_address::EmailAddress,
};
use portfolio_templates_contracts::{ContactNotificationTemplate, TemplateService};
use tracing::{debug, error, info, warn};

/// Receives contact messages when no recipient has been configured.
pub const DEFAULT_CONTACT_RECIPIENT: &str = "contact@portfolio.example";

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Email, Template> {
    email: Email,
    template: Template,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    recipient: Arc<EmailAddress>,
}

impl ContactServiceConfig {
    pub fn new(recipient_override: Option<EmailAddress>) -> Self {
        Self {
            recipient: recipient_override
                .unwrap_or_else(|| DEFAULT_CONTACT_RECIPIENT.parse().unwrap())
                .into(),
        }
    }

    pub fn recipient(&self) -> &EmailAddress {
        &self.recipient
    }
}

impl<EmailS, Template> ContactServiceImpl<EmailS, Template> {
    pub fn new(email: EmailS, template: Template, config: ContactServiceConfig) -> Self {
        Self {
            email,
            template,
            config,
        }
    }
}

impl<EmailS, Template> ContactService for ContactServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    #[tracing::instrument(skip_all)]
    async fn submit(&self, submission: ContactSubmission) -> SubmissionResult {
        match self.try_submit(submission).await {
            Ok(()) => SubmissionResult::sent(),
            Err(err) => {
                match &err {
                    ContactSubmitError::Validation(err) => debug!("rejected submission: {err}"),
                    ContactSubmitError::Send => {}
                    ContactSubmitError::Other(err) => {
                        error!("Failed to send contact message: {err:#}")
                    }
                }
                err.into()
            }
        }
    }
}

impl<EmailS, Template> ContactServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    async fn try_submit(&self, submission: ContactSubmission) -> Result<(), ContactSubmitError> {
        let message = submission.validate()?;

        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("Portfolio: {}", *message.subject),
            body: self.template.render(&notification_template(&message))?,
            content_type: ContentType::Html,
            reply_to: Some(message.author.email),
        };

        match self.email.send(email).await? {
            Ok(sent) => {
                info!(id = %sent.id, "contact message sent");
                Ok(())
            }
            Err(rejection) => {
                warn!("email provider rejected contact message: {rejection}");
                Err(ContactSubmitError::Send)
            }
        }
    }
}

fn notification_template(message: &ContactMessage) -> ContactNotificationTemplate {
    ContactNotificationTemplate {
        name: (*message.author.name).clone(),
        email: message.author.email.as_str().into(),
        subject: (*message.subject).clone(),
        message: (*message.content).clone(),
    }
}
