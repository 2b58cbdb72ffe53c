//! Services module for the Qiniu CDN exporter

pub mod cdn_stats;
pub mod domains;
pub mod health;

use std::sync::Arc;

use crate::{
    config::Config,
    data::qiniu::{AnyQiniuConnection, QiniuClient},
    window::{Clock, SystemClock},
};

#[derive(Clone)]
pub struct Services {
    pub cdn_stats: Arc<cdn_stats::CdnStatsService>,
    pub domains: Arc<domains::DomainService>,
    pub health: Arc<health::HealthService>,
    pub metrics_path: String,
}

impl Services {
    pub fn new(connection: Arc<AnyQiniuConnection>, config: &Config) -> Self {
        Self::with_clock(connection, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        connection: Arc<AnyQiniuConnection>,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let client = Arc::new(QiniuClient::new(connection));
        let domains = Arc::new(domains::DomainService::new(
            client.clone(),
            config.qiniu.domain_limit,
            config.scrape.domain_refresh,
        ));
        let cdn_stats = Arc::new(cdn_stats::CdnStatsService::new(
            client.clone(),
            domains.clone(),
            clock,
            config.window.clone(),
            config.scrape.clone(),
        ));
        let health = Arc::new(health::HealthService::new(client, domains.clone()));

        Self {
            cdn_stats,
            domains,
            health,
            metrics_path: config.metrics_path.clone(),
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
impl Services {
    /// Create services answering from the sample provider payloads
    pub async fn mocks() -> Self {
        use crate::data::qiniu::MockConnection;

        let connection = Arc::new(AnyQiniuConnection::Mock(MockConnection::sample().await));
        Self::new(connection, &Config::default())
    }
}
