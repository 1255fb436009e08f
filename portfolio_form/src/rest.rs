use std::sync::LazyLock;

use anyhow::Context;
use portfolio_core_contact_contracts::ContactService;
use portfolio_models::contact::{ContactSubmission, SubmissionResult};
use portfolio_utils::portfolio_version;
use tracing::error;
use url::Url;

static USER_AGENT: LazyLock<String> =
    LazyLock::new(|| format!("Portfolio Contact Form (Version {})", portfolio_version()));

/// Submits the contact form to a remote `POST /contact` endpoint.
#[derive(Debug, Clone)]
pub struct RestContactService {
    client: reqwest::Client,
    endpoint: Url,
}

impl RestContactService {
    /// `base_url` is the root of the backend, e.g. `https://api.example.com/`.
    pub fn new(base_url: &Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&*USER_AGENT)
            .build()
            .context("Failed to build http client")?;
        let endpoint = base_url
            .join("contact")
            .context("Failed to build contact endpoint url")?;

        Ok(Self { client, endpoint })
    }

    async fn try_submit(&self, submission: &ContactSubmission) -> anyhow::Result<SubmissionResult> {
        // Failed submissions come with a non-2xx status but still carry a
        // `SubmissionResult` body.
        self.client
            .post(self.endpoint.clone())
            .json(submission)
            .send()
            .await
            .context("Failed to reach the contact endpoint")?
            .json()
            .await
            .context("Failed to decode contact endpoint response")
    }
}

impl ContactService for RestContactService {
    async fn submit(&self, submission: ContactSubmission) -> SubmissionResult {
        self.try_submit(&submission).await.unwrap_or_else(|err| {
            error!("Failed to submit contact form: {err:#}");
            SubmissionResult::server_error()
        })
    }
}
