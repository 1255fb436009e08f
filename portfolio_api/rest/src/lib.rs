use std::net::IpAddr;

use anyhow::Context;
use axum::{http::HeaderValue, Router};
use portfolio_core_contact_contracts::ContactService;
use portfolio_core_health_contracts::HealthService;
use portfolio_utils::Apply;
use tokio::net::TcpListener;
use tracing::info;

mod errors;
mod middlewares;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone, Default)]
pub struct RestServerConfig {
    allowed_origins: Vec<HeaderValue>,
}

impl RestServerConfig {
    pub fn new(allowed_origins: &[String]) -> anyhow::Result<Self> {
        let allowed_origins = allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse()
                    .with_context(|| format!("Invalid allowed origin: {origin:?}"))
            })
            .collect::<anyhow::Result<_>>()?;

        Ok(Self { allowed_origins })
    }
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthService,
    Contact: ContactService,
{
    pub fn new(health: Health, contact: Contact, config: RestServerConfig) -> Self {
        Self {
            health,
            contact,
            config,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, router).await.map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let cors = (!self.config.allowed_origins.is_empty())
            .then(|| middlewares::cors::layer(&self.config.allowed_origins));

        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()));
        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);

        middlewares::request_id::add(router).apply_map(cors, |router, cors| router.layer(cors))
    }
}
