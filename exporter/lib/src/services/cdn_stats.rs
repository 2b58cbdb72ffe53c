//! CDN statistics scrape
//!
//! One scrape computes a single time window, walks the domain list and, per
//! domain, fetches and reduces bandwidth, hit/miss and status code series in
//! sequence. Failures are handled per [`FailurePolicy`].

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::{
    config::{FailurePolicy, ScrapeConfig, WindowConfig},
    data::qiniu::QiniuClient,
    error::Result,
    models::{
        metrics::{DomainMetrics, ScrapeReport, SkippedDomain},
        provider::{BandwidthRequest, LogAnalysisRequest},
    },
    reduce,
    services::domains::DomainService,
    window::{Clock, DatePrecision, TimeWindow},
};

pub struct CdnStatsService {
    client: Arc<QiniuClient>,
    domains: Arc<DomainService>,
    clock: Arc<dyn Clock>,
    window: WindowConfig,
    scrape: ScrapeConfig,
}

impl CdnStatsService {
    pub fn new(
        client: Arc<QiniuClient>,
        domains: Arc<DomainService>,
        clock: Arc<dyn Clock>,
        window: WindowConfig,
        scrape: ScrapeConfig,
    ) -> Self {
        Self {
            client,
            domains,
            clock,
            window,
            scrape,
        }
    }

    /// Run a full fetch-and-reduce pass over every domain
    pub async fn scrape(&self) -> Result<ScrapeReport> {
        let window = TimeWindow::from_clock(
            self.clock.as_ref(),
            self.window.range_secs,
            self.window.delay_secs,
        )?;
        let domains = self.domains.domains().await?;

        debug!(
            target: "cdn_stats_service",
            start = %window.start,
            end = %window.end,
            domains = domains.len(),
            "Scrape started"
        );

        let mut report = ScrapeReport {
            window,
            domains: Vec::with_capacity(domains.len()),
            skipped: Vec::new(),
        };

        for domain in domains {
            match self.collect_domain(&domain, &window).await {
                Ok(metrics) => report.domains.push(metrics),
                Err(e) => match self.scrape.failure_policy {
                    FailurePolicy::FailScrape => {
                        error!(target: "cdn_stats_service", domain = %domain, error = %e, "Scrape failed");
                        return Err(e);
                    }
                    FailurePolicy::SkipDomain => {
                        warn!(target: "cdn_stats_service", domain = %domain, error = %e, "Skipping domain");
                        report.skipped.push(SkippedDomain { domain, error: e });
                    }
                },
            }
        }

        info!(
            target: "cdn_stats_service",
            collected = report.domains.len(),
            skipped = report.skipped.len(),
            "Scrape finished"
        );

        Ok(report)
    }

    /// Fetch and reduce the three metric families of one domain
    pub async fn collect_domain(&self, domain: &str, window: &TimeWindow) -> Result<DomainMetrics> {
        let granularity = self.window.granularity;

        let bandwidth_request =
            BandwidthRequest::new(window.format(DatePrecision::Seconds), granularity, domain);
        let bandwidth = self.client.bandwidth(&bandwidth_request).await?;

        let log_request =
            LogAnalysisRequest::new(window.format(DatePrecision::Day), granularity, domain);
        let hit_miss = self.client.hit_miss(&log_request).await?;
        let status_codes = self.client.status_codes(&log_request).await?;

        let bandwidth = reduce::bandwidth_average(&bandwidth, self.scrape.bandwidth_average);
        let ratios = reduce::hit_ratios(&hit_miss);
        let status = reduce::status_proportions(&status_codes.codes);

        if bandwidth.is_none() {
            debug!(target: "cdn_stats_service", domain = %domain, "No bandwidth samples in window");
        }
        if ratios.hit_rate.is_none() {
            debug!(target: "cdn_stats_service", domain = %domain, "No requests in window");
        }

        Ok(DomainMetrics {
            domain: domain.to_string(),
            bandwidth,
            hit_rate: ratios.hit_rate,
            byte_hit_rate: ratios.byte_hit_rate,
            status,
        })
    }
}
