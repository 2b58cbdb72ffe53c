//! Prometheus exposition of a scrape.
//!
//! Every scrape gets a fresh [`Registry`], so a domain that disappears from
//! the provider also disappears from the output. Metric families:
//!
//! - `qiniu_cdn_hit_rate{instanceId}`: request hit rate, percent
//! - `qiniu_cdn_flux_hit_rate{instanceId}`: byte hit rate, percent
//! - `qiniu_cdn_bandwidth{instanceId}`: China zone bandwidth, Mbps
//! - `qiniu_cdn_status_rate{instanceId,status}`: status code share, percent
//! - `qiniu_cdn_scrape_*`: scrape bookkeeping

use std::time::Duration;

use prometheus::{core::Collector, Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

use crate::{
    constants::metrics::{
        BANDWIDTH_SCALE, DOMAIN_LABEL, NAMESPACE, PERCENT_SCALE, STATUS_LABEL, SUBSYSTEM,
    },
    error::{Error, Result},
    models::metrics::{DomainMetrics, ScrapeReport},
};

fn opts(name: &str, help: &str) -> Opts {
    Opts::new(name, help).namespace(NAMESPACE).subsystem(SUBSYSTEM)
}

fn register<T: Collector + Clone + 'static>(metric: T, registry: &Registry) -> Result<T> {
    registry.register(Box::new(metric.clone()))?;
    Ok(metric)
}

pub struct CdnMetrics {
    pub hit_rate: GaugeVec,
    pub flux_hit_rate: GaugeVec,
    pub bandwidth: GaugeVec,
    pub status_rate: GaugeVec,
    pub scrape_duration_seconds: Gauge,
    pub scrape_domains: Gauge,
    pub scrape_skipped_domains: Gauge,
}

impl CdnMetrics {
    /// Registers all metric families with the given [`Registry`]
    pub fn register(registry: &Registry) -> Result<Self> {
        Ok(Self {
            hit_rate: register(
                GaugeVec::new(
                    opts("hit_rate", "CDN request hit rate (%)"),
                    &[DOMAIN_LABEL],
                )?,
                registry,
            )?,
            flux_hit_rate: register(
                GaugeVec::new(
                    opts("flux_hit_rate", "CDN byte hit rate (%)"),
                    &[DOMAIN_LABEL],
                )?,
                registry,
            )?,
            bandwidth: register(
                GaugeVec::new(
                    opts("bandwidth", "CDN total bandwidth (Mbps)"),
                    &[DOMAIN_LABEL],
                )?,
                registry,
            )?,
            status_rate: register(
                GaugeVec::new(
                    opts("status_rate", "CDN status code proportion (%)"),
                    &[DOMAIN_LABEL, STATUS_LABEL],
                )?,
                registry,
            )?,
            scrape_duration_seconds: register(
                Gauge::with_opts(opts(
                    "scrape_duration_seconds",
                    "Time spent collecting statistics from the provider",
                ))?,
                registry,
            )?,
            scrape_domains: register(
                Gauge::with_opts(opts("scrape_domains", "Domains collected by the scrape"))?,
                registry,
            )?,
            scrape_skipped_domains: register(
                Gauge::with_opts(opts(
                    "scrape_skipped_domains",
                    "Domains left out of the scrape after a provider failure",
                ))?,
                registry,
            )?,
        })
    }

    fn record_domain(&self, metrics: &DomainMetrics) {
        let domain = metrics.domain.as_str();

        if let Some(hit_rate) = metrics.hit_rate {
            self.hit_rate
                .with_label_values(&[domain])
                .set(hit_rate * PERCENT_SCALE);
        }
        if let Some(byte_hit_rate) = metrics.byte_hit_rate {
            self.flux_hit_rate
                .with_label_values(&[domain])
                .set(byte_hit_rate * PERCENT_SCALE);
        }
        if let Some(bandwidth) = metrics.bandwidth {
            self.bandwidth
                .with_label_values(&[domain])
                .set(bandwidth / BANDWIDTH_SCALE);
        }
        for (status, proportion) in &metrics.status {
            self.status_rate
                .with_label_values(&[domain, status.as_str()])
                .set(proportion * PERCENT_SCALE);
        }
    }

    pub fn record(&self, report: &ScrapeReport, elapsed: Duration) {
        for domain in &report.domains {
            self.record_domain(domain);
        }

        self.scrape_duration_seconds.set(elapsed.as_secs_f64());
        self.scrape_domains.set(report.domains.len() as f64);
        self.scrape_skipped_domains.set(report.skipped.len() as f64);
    }
}

/// Renders a scrape in the Prometheus text format
pub fn render(report: &ScrapeReport, elapsed: Duration) -> Result<String> {
    let registry = Registry::new();
    CdnMetrics::register(&registry)?.record(report, elapsed);

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;

    String::from_utf8(buffer).map_err(|e| Error::Exposition(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::DateTime;

    use super::*;
    use crate::{constants::test, window::TimeWindow};

    fn report(domains: Vec<DomainMetrics>) -> ScrapeReport {
        let now = DateTime::parse_from_rfc3339("2024-03-10T12:00:00+08:00").unwrap();
        ScrapeReport {
            window: TimeWindow::ending_at(now, 1800, 300).unwrap(),
            domains,
            skipped: Vec::new(),
        }
    }

    fn sample_domain() -> DomainMetrics {
        DomainMetrics {
            domain: test::domains::FIRST.to_string(),
            bandwidth: Some(2.0 * 1024.0 * 1024.0),
            hit_rate: Some(0.75),
            byte_hit_rate: Some(0.5),
            status: BTreeMap::from([("200".to_string(), 1.0), ("2xx".to_string(), 1.0)]),
        }
    }

    #[test]
    fn scales_rates_to_percent_and_bandwidth_to_mbps() {
        let text = render(&report(vec![sample_domain()]), Duration::from_millis(250)).unwrap();

        assert!(text.contains(r#"qiniu_cdn_hit_rate{instanceId="cdn.example.com"} 75"#));
        assert!(text.contains(r#"qiniu_cdn_flux_hit_rate{instanceId="cdn.example.com"} 50"#));
        assert!(text.contains(r#"qiniu_cdn_bandwidth{instanceId="cdn.example.com"} 2"#));
        assert!(text.contains(r#"qiniu_cdn_status_rate{instanceId="cdn.example.com",status="200"} 100"#));
        assert!(text.contains(r#"qiniu_cdn_status_rate{instanceId="cdn.example.com",status="2xx"} 100"#));
        assert!(text.contains("qiniu_cdn_scrape_duration_seconds 0.25"));
        assert!(text.contains("qiniu_cdn_scrape_domains 1"));
    }

    #[test]
    fn missing_values_produce_no_sample() {
        let domain = DomainMetrics {
            bandwidth: None,
            hit_rate: None,
            byte_hit_rate: None,
            status: BTreeMap::new(),
            ..sample_domain()
        };

        let text = render(&report(vec![domain]), Duration::ZERO).unwrap();

        assert!(!text.contains("qiniu_cdn_hit_rate{"));
        assert!(!text.contains("qiniu_cdn_bandwidth{"));
        assert!(!text.contains("qiniu_cdn_status_rate{"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn empty_report_exposes_only_bookkeeping() {
        let text = render(&report(Vec::new()), Duration::ZERO).unwrap();

        assert!(!text.contains("instanceId"));
        assert!(text.contains("qiniu_cdn_scrape_domains 0"));
        assert!(text.contains("qiniu_cdn_scrape_skipped_domains 0"));
    }

    #[test]
    fn each_domain_gets_its_own_series() {
        let second = DomainMetrics {
            domain: test::domains::SECOND.to_string(),
            ..sample_domain()
        };

        let text = render(&report(vec![sample_domain(), second]), Duration::ZERO).unwrap();

        assert!(text.contains(r#"qiniu_cdn_hit_rate{instanceId="cdn.example.com"}"#));
        assert!(text.contains(r#"qiniu_cdn_hit_rate{instanceId="static.example.com"}"#));
        assert_eq!(text.matches("# TYPE qiniu_cdn_hit_rate gauge").count(), 1);
    }
}
