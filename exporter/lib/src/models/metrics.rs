use std::collections::BTreeMap;

use crate::error::Error;
use crate::window::TimeWindow;

/// Reduced statistics of one domain for one scrape.
///
/// `None` means the provider returned nothing to average over; no sample is
/// exposed for that metric.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainMetrics {
    pub domain: String,
    /// China zone bandwidth average, bytes per second
    pub bandwidth: Option<f64>,
    /// Requests served from cache, fraction in [0, 1]
    pub hit_rate: Option<f64>,
    /// Bytes served from cache, fraction in [0, 1]
    pub byte_hit_rate: Option<f64>,
    /// Status token (exact code or class) to fraction in [0, 1]
    pub status: BTreeMap<String, f64>,
}

#[derive(Debug)]
pub struct SkippedDomain {
    pub domain: String,
    pub error: Error,
}

/// Everything a scrape produced
#[derive(Debug)]
pub struct ScrapeReport {
    pub window: TimeWindow,
    pub domains: Vec<DomainMetrics>,
    pub skipped: Vec<SkippedDomain>,
}
