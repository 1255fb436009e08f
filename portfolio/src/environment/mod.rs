use portfolio_api_rest::RestServerConfig;
use portfolio_config::Config;
use portfolio_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use portfolio_core_health_impl::{HealthServiceConfig, HealthServiceImpl};
use types::{Email, RestServer, Template};

pub mod types;

/// Wire up the services behind the REST server.
pub fn rest_server(config: &Config, email: Email) -> anyhow::Result<RestServer> {
    let contact = ContactServiceImpl::new(
        email.clone(),
        Template::new()?,
        ContactServiceConfig::new(config.contact.recipient.clone()),
    );
    let health = HealthServiceImpl::new(
        email,
        HealthServiceConfig {
            cache_ttl: *config.health.cache_ttl,
        },
    );
    let rest_config = RestServerConfig::new(&config.http.allowed_origins)?;

    Ok(RestServer::new(health, contact, rest_config))
}
