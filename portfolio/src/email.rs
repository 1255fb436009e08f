use portfolio_config::EmailConfig;
use portfolio_email_impl::{EmailServiceConfig, EmailServiceImpl};
use tracing::warn;

/// Set up the client for the email api
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    if config.api_key.is_empty() {
        warn!("No email api key configured, contact messages will be rejected");
    }

    EmailServiceImpl::new(
        EmailServiceConfig::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.from.clone(),
        ),
        *config.timeout,
    )
}
