use std::{sync::Arc, time::Duration};

use anyhow::Context;
use portfolio_email_contracts::{ContentType, Email, EmailRejection, EmailService, SentEmail};
use portfolio_models::email_address::EmailAddressWithName;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

pub mod http;

pub const RESEND_API_URL: &str = "https://api.resend.com/";

/// Delivers emails through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    client: HttpClient,
    config: Arc<EmailServiceConfig>,
}

#[derive(Clone)]
pub struct EmailServiceConfig {
    api_url: Url,
    api_key: String,
    from: EmailAddressWithName,
}

impl std::fmt::Debug for EmailServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailServiceConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &"[redacted]")
            .field("from", &self.from)
            .finish()
    }
}

impl EmailServiceConfig {
    pub fn new(api_url_override: Option<Url>, api_key: String, from: EmailAddressWithName) -> Self {
        let mut api_url = api_url_override.unwrap_or_else(|| RESEND_API_URL.parse().unwrap());
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Self {
            api_url,
            api_key,
            from,
        }
    }
}

impl EmailServiceImpl {
    pub fn new(config: EmailServiceConfig, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: HttpClient::new(timeout)?,
            config: config.into(),
        })
    }
}

impl EmailService for EmailServiceImpl {
    #[tracing::instrument(skip_all, fields(recipient = %email.recipient))]
    async fn send(&self, email: Email) -> anyhow::Result<Result<SentEmail, EmailRejection>> {
        let from = self.config.from.to_string();
        let (html, text) = match email.content_type {
            ContentType::Html => (Some(email.body.as_str()), None),
            ContentType::Text => (None, Some(email.body.as_str())),
        };
        let request = SendEmailRequest {
            from: &from,
            to: [email.recipient.as_str()],
            subject: &email.subject,
            html,
            text,
            reply_to: email.reply_to.as_ref().map(|x| x.as_str()),
        };

        let response = self
            .client
            .post(self.config.api_url.join("emails")?)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach the email api")?;

        let status = response.status();
        debug!(%status, "email api responded");

        if status.is_success() {
            let SendEmailResponse { id } = response
                .json()
                .await
                .context("Failed to decode email api response")?;
            return Ok(Ok(SentEmail { id }));
        }

        let ErrorResponse { name, message } = response.json().await.unwrap_or_default();
        Ok(Err(EmailRejection {
            status: status.as_u16(),
            name: name.unwrap_or_else(|| "unknown_error".into()),
            message: message.unwrap_or_else(|| status.to_string()),
        }))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.client
            .head(self.config.api_url.clone())
            .send()
            .await
            .map(|_| ())
            .context("Failed to reach the email api")
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Default, Deserialize)]
struct ErrorResponse {
    name: Option<String>,
    message: Option<String>,
}
