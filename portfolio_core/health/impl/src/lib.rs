use std::{sync::Arc, time::Duration};

use portfolio_core_health_contracts::{HealthService, HealthStatus};
use portfolio_email_contracts::EmailService;
use tokio::{sync::RwLock, time::Instant};
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthServiceImpl<Email> {
    email: Email,
    config: HealthServiceConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone, Copy)]
pub struct HealthServiceConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: Instant,
}

impl CachedStatus {
    /// A ttl too large to represent never expires.
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.timestamp
            .checked_add(ttl)
            .map_or(true, |expires| now < expires)
    }
}

impl<Email> HealthServiceImpl<Email> {
    pub fn new(email: Email, config: HealthServiceConfig) -> Self {
        Self {
            email,
            config,
            state: Default::default(),
        }
    }
}

impl<Email> HealthService for HealthServiceImpl<Email>
where
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let now = Instant::now();
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| c.is_fresh(now, self.config.cache_ttl))
        {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| c.is_fresh(now, self.config.cache_ttl))
        {
            return cached.status;
        }

        let email = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping email api: {err:#}"))
            .is_ok();

        let status = HealthStatus { email };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: now,
            })
            .status
    }
}

#[cfg(test)]
mod tests {
    use portfolio_email_contracts::MockEmailService;

    use super::*;

    const TTL: Duration = Duration::from_secs(10);

    #[tokio::test(start_paused = true)]
    async fn status_is_cached() {
        // Arrange
        let email = MockEmailService::new().with_ping(true);
        let sut = HealthServiceImpl::new(email, HealthServiceConfig { cache_ttl: TTL });

        // Act
        let first = sut.get_status().await;
        tokio::time::advance(TTL / 2).await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: true });
        assert_eq!(second, first);
    }

    #[tokio::test(start_paused = true)]
    async fn huge_ttl_never_expires() {
        // Arrange
        let email = MockEmailService::new().with_ping(true);
        let sut = HealthServiceImpl::new(
            email,
            HealthServiceConfig {
                cache_ttl: Duration::MAX,
            },
        );

        // Act
        let first = sut.get_status().await;
        tokio::time::advance(Duration::from_secs(365 * 24 * 60 * 60)).await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: true });
        assert_eq!(second, first);
    }

    #[tokio::test(start_paused = true)]
    async fn cache_expires() {
        // Arrange
        let mut email = MockEmailService::new();
        let mut calls = 0;
        email.expect_ping().times(2).returning(move || {
            calls += 1;
            let result = if calls == 1 {
                Err(anyhow::anyhow!("connection refused"))
            } else {
                Ok(())
            };
            Box::pin(std::future::ready(result))
        });
        let sut = HealthServiceImpl::new(email, HealthServiceConfig { cache_ttl: TTL });

        // Act
        let first = sut.get_status().await;
        tokio::time::advance(TTL).await;
        let second = sut.get_status().await;

        // Assert
        assert_eq!(first, HealthStatus { email: false });
        assert_eq!(second, HealthStatus { email: true });
    }
}
