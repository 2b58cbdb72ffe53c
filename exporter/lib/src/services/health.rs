use std::sync::Arc;

use crate::{
    constants::server::SERVICE_NAME,
    data::qiniu::QiniuClient,
    models::health::{ComponentHealth, DetailedHealthStatus, HealthComponents, HEALTHY, UNHEALTHY},
    services::domains::DomainService,
};

pub struct HealthService {
    client: Arc<QiniuClient>,
    domains: Arc<DomainService>,
}

impl HealthService {
    pub fn new(client: Arc<QiniuClient>, domains: Arc<DomainService>) -> Self {
        Self { client, domains }
    }

    pub async fn check_health(&self) -> DetailedHealthStatus {
        let provider_health = self.check_provider().await;
        let domains_health = self.check_domains().await;

        let overall_status = if provider_health.is_healthy() && domains_health.is_healthy() {
            HEALTHY
        } else {
            UNHEALTHY
        };

        DetailedHealthStatus {
            status: overall_status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            service: SERVICE_NAME.to_string(),
            components: HealthComponents {
                provider: provider_health,
                domains: domains_health,
            },
        }
    }

    async fn check_provider(&self) -> ComponentHealth {
        match self.client.is_reachable().await {
            true => ComponentHealth::healthy(None),
            false => ComponentHealth::unhealthy("Provider not reachable"),
        }
    }

    async fn check_domains(&self) -> ComponentHealth {
        match self.domains.snapshot().await {
            Some(domains) => ComponentHealth::healthy(Some(format!(
                "{} domains enumerated",
                domains.len()
            ))),
            None => ComponentHealth::unhealthy("Domain list not enumerated yet"),
        }
    }
}
