//! Configuration constants for the Qiniu CDN exporter

/// Test constants for use across all exporter tests
#[cfg(any(test, feature = "mocks"))]
pub mod test;

/// Default server configuration
pub mod server {
    /// Default HTTP listening host
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Default HTTP server port
    pub const DEFAULT_PORT: u16 = 9270;

    /// Default path the metrics are exposed on
    pub const DEFAULT_METRICS_PATH: &str = "/metrics";

    /// Path of the health endpoint, not available as metrics path
    pub const HEALTH_PATH: &str = "/health";

    /// Service name reported by the health endpoint and the JSON logger
    pub const SERVICE_NAME: &str = "qiniu-cdn-exporter";
}

/// Qiniu provider API configuration
pub mod provider {
    /// Management API host, serves the domain listing
    pub const DEFAULT_API_HOST: &str = "http://api.qiniu.com";

    /// Fusion (CDN analytics) API host, serves every statistics endpoint
    pub const DEFAULT_FUSION_HOST: &str = "http://fusion.qiniuapi.com";

    /// `User-Agent` sent to the provider unless configured otherwise
    pub const DEFAULT_USER_AGENT: &str =
        concat!("qiniu-cdn-exporter/", env!("CARGO_PKG_VERSION"));

    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Page size sent to the domain listing endpoint
    pub const DEFAULT_DOMAIN_LIMIT: u32 = 50;

    /// Prefix of the `Authorization` header value
    pub const AUTHORIZATION_SCHEME: &str = "QBox";

    /// Envelope code the fusion API reports on success
    pub const SUCCESS_CODE: i64 = 200;

    /// Provider endpoint paths
    pub mod paths {
        pub const DOMAINS: &str = "/domain";
        pub const BANDWIDTH: &str = "/v2/tune/monitoring/bandwidth";
        pub const HIT_MISS: &str = "/v2/tune/loganalyze/hitmiss";
        pub const STATUS_CODE: &str = "/v2/tune/loganalyze/statuscode";
    }
}

/// Time window defaults
pub mod window {
    /// Default lookback, start = now - range
    pub const DEFAULT_RANGE_SECS: i64 = 1800;

    /// Default trailing delay, end = now - delay
    pub const DEFAULT_DELAY_SECS: i64 = 300;

    /// Query format for endpoints that take a full timestamp
    pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Query format for endpoints that take a day
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}

/// Exposed metric names and scaling
pub mod metrics {
    pub const NAMESPACE: &str = "qiniu";
    pub const SUBSYSTEM: &str = "cdn";

    /// Label carrying the domain name
    pub const DOMAIN_LABEL: &str = "instanceId";

    /// Label carrying the status token of `status_rate`
    pub const STATUS_LABEL: &str = "status";

    /// Fractions are exposed as percentages
    pub const PERCENT_SCALE: f64 = 100.0;

    /// Bandwidth averages are exposed in Mbps (bytes/s / 1024 / 1024)
    pub const BANDWIDTH_SCALE: f64 = 1024.0 * 1024.0;

    /// Content type of the Prometheus text exposition format
    pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
}
