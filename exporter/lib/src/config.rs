use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::constants::provider::{
    DEFAULT_API_HOST, DEFAULT_DOMAIN_LIMIT, DEFAULT_FUSION_HOST, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
use crate::constants::server::{DEFAULT_HOST, DEFAULT_METRICS_PATH, DEFAULT_PORT, HEALTH_PATH};
use crate::constants::window::{DEFAULT_DELAY_SECS, DEFAULT_RANGE_SECS};
use crate::error::{Error, Result};
use crate::window::{Granularity, SystemClock, TimeWindow};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub metrics_path: String,
    pub log_format: LogFormat,
    pub qiniu: ProviderConfig,
    pub window: WindowConfig,
    pub scrape: ScrapeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub access_key: String,
    pub secret_key: String,
    pub api_host: String,
    pub fusion_host: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub domain_limit: u32,
    #[cfg(feature = "mocks")]
    pub mock_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Lookback length, start = now - range_secs
    pub range_secs: i64,
    /// Trailing delay, end = now - delay_secs
    pub delay_secs: i64,
    pub granularity: Granularity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub domain_refresh: DomainRefresh,
    pub failure_policy: FailurePolicy,
    pub bandwidth_average: BandwidthAverage,
}

/// When the domain list is (re)fetched from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainRefresh {
    /// Fetch once and keep the snapshot for the lifetime of the process
    #[default]
    Startup,
    /// Fetch at the start of every scrape
    PerScrape,
}

/// What a scrape does when one domain fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole scrape
    #[default]
    FailScrape,
    /// Log the failure, leave the domain out and keep going
    SkipDomain,
}

/// Divisor used when averaging the bandwidth series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandwidthAverage {
    /// Sample count of the last entry of the response
    #[default]
    LastEntry,
    /// Sample count across every entry of the response
    AllSamples,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON when stdout is not a terminal, text otherwise
    #[default]
    Auto,
    Json,
    Text,
}

impl LogFormat {
    pub fn resolve(self) -> Self {
        match self {
            LogFormat::Auto if std::io::stdout().is_terminal() => LogFormat::Text,
            LogFormat::Auto => LogFormat::Json,
            other => other,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(LogFormat::Auto),
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            other => Err(Error::Config(format!("unknown log format `{other}`"))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
            log_format: LogFormat::default(),
            qiniu: ProviderConfig::default(),
            window: WindowConfig::default(),
            scrape: ScrapeConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            fusion_host: DEFAULT_FUSION_HOST.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            domain_limit: DEFAULT_DOMAIN_LIMIT,
            #[cfg(feature = "mocks")]
            mock_mode: false,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            range_secs: DEFAULT_RANGE_SECS,
            delay_secs: DEFAULT_DELAY_SECS,
            granularity: Granularity::default(),
        }
    }
}

impl ProviderConfig {
    #[cfg(feature = "mocks")]
    fn is_mocked(&self) -> bool {
        self.mock_mode
    }

    #[cfg(not(feature = "mocks"))]
    fn is_mocked(&self) -> bool {
        false
    }
}

impl Config {
    pub fn from_file(path: &str) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Rejects configurations that could only ever produce failed scrapes
    pub fn validate(&self) -> Result<()> {
        if !self.qiniu.is_mocked()
            && (self.qiniu.access_key.is_empty() || self.qiniu.secret_key.is_empty())
        {
            return Err(Error::Config(
                "access key and secret key are required".to_string(),
            ));
        }

        // same computation every scrape runs, against the current clock
        TimeWindow::from_clock(&SystemClock, self.window.range_secs, self.window.delay_secs)?;

        if self.window.delay_secs < 0 {
            return Err(Error::Config("delay must not be negative".to_string()));
        }

        if !self.metrics_path.starts_with('/') || self.metrics_path == "/" {
            return Err(Error::Config(format!(
                "metrics path `{}` must start with `/` and not be the root",
                self.metrics_path
            )));
        }

        if self.metrics_path == HEALTH_PATH {
            return Err(Error::Config(format!(
                "metrics path `{}` is reserved",
                self.metrics_path
            )));
        }

        Ok(())
    }
}
