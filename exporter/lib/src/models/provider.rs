//! Wire types of the Qiniu management and fusion APIs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::provider::SUCCESS_CODE;
use crate::error::{Error, Result};
use crate::window::Granularity;

// ==================== Domain listing ====================

#[derive(Debug, Clone, Serialize)]
pub struct DomainListQuery {
    #[serde(rename = "Limit")]
    pub limit: u32,
    #[serde(rename = "SourceTypes")]
    pub source_types: Vec<String>,
}

impl DomainListQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            source_types: vec!["domain".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainListResponse {
    #[serde(default)]
    pub domains: Vec<DomainInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DomainInfo {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub cname: String,
    #[serde(default)]
    pub geo_cover: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub protocol: String,
}

// ==================== Statistics requests ====================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandwidthRequest {
    pub start_date: String,
    pub end_date: String,
    pub granularity: Granularity,
    /// A single domain, not a list
    pub domains: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl BandwidthRequest {
    pub fn new(
        (start_date, end_date): (String, String),
        granularity: Granularity,
        domain: &str,
    ) -> Self {
        Self {
            start_date,
            end_date,
            granularity,
            domains: domain.to_string(),
            kind: "bandwidth".to_string(),
        }
    }
}

/// Body shared by the hit/miss and status code log analysis endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAnalysisRequest {
    pub start_date: String,
    pub end_date: String,
    pub freq: Granularity,
    pub domains: Vec<String>,
}

impl LogAnalysisRequest {
    pub fn new((start_date, end_date): (String, String), freq: Granularity, domain: &str) -> Self {
        Self {
            start_date,
            end_date,
            freq,
            domains: vec![domain.to_string()],
        }
    }
}

// ==================== Statistics responses ====================

/// `{code, error, data}` envelope of the fusion API
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T: Default> Envelope<T> {
    /// Returns the payload, or [`Error::Provider`] when the envelope reports a
    /// failure code. A missing `data` field is treated as an empty payload.
    pub fn into_data(self) -> Result<T> {
        match self.code {
            Some(code) if code != SUCCESS_CODE => Err(Error::Provider {
                code,
                message: self
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "no error message".to_string()),
            }),
            _ => Ok(self.data.unwrap_or_default()),
        }
    }
}

/// Bandwidth samples per zone, in bytes per second
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneSeries {
    #[serde(default)]
    pub china: Vec<i64>,
    #[serde(default)]
    pub oversea: Vec<i64>,
}

/// Keyed by the provider's per-series key. Ordered so that reductions
/// depending on iteration order are reproducible.
pub type BandwidthData = BTreeMap<String, ZoneSeries>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitMissData {
    #[serde(default)]
    pub hit: Vec<i64>,
    #[serde(default)]
    pub miss: Vec<i64>,
    #[serde(default)]
    pub traffic_hit: Vec<i64>,
    #[serde(default)]
    pub traffic_miss: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusCodeData {
    #[serde(default)]
    pub codes: BTreeMap<String, Vec<i64>>,
}
