//! Domain enumeration
//!
//! The domain list is the iteration key of every scrape. Depending on
//! [`DomainRefresh`] it is fetched once and reused, or fetched per scrape.
//! With [`DomainRefresh::Startup`] domains added on the provider side stay
//! invisible until the process restarts.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{config::DomainRefresh, data::qiniu::QiniuClient, error::Result};

pub struct DomainService {
    client: Arc<QiniuClient>,
    limit: u32,
    refresh: DomainRefresh,
    snapshot: RwLock<Option<Vec<String>>>,
}

impl DomainService {
    pub fn new(client: Arc<QiniuClient>, limit: u32, refresh: DomainRefresh) -> Self {
        Self {
            client,
            limit,
            refresh,
            snapshot: RwLock::new(None),
        }
    }

    pub fn refresh_policy(&self) -> DomainRefresh {
        self.refresh
    }

    /// Fetch the domain list from the provider and store it as the snapshot
    pub async fn refresh(&self) -> Result<Vec<String>> {
        let domains = self.client.list_domains(self.limit).await?;
        info!(target: "domain_service", count = domains.len(), "Enumerated CDN domains");

        *self.snapshot.write().await = Some(domains.clone());
        Ok(domains)
    }

    /// The domains to scrape, according to the refresh policy
    pub async fn domains(&self) -> Result<Vec<String>> {
        if self.refresh == DomainRefresh::Startup {
            if let Some(domains) = self.snapshot.read().await.as_ref() {
                return Ok(domains.clone());
            }
            debug!(target: "domain_service", "No domain snapshot yet, enumerating");
        }

        self.refresh().await
    }

    /// The last enumerated list, if any
    pub async fn snapshot(&self) -> Option<Vec<String>> {
        self.snapshot.read().await.clone()
    }
}
