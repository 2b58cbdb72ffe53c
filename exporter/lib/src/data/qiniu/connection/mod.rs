//! Provider connection abstraction

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::ProviderConfig;
use crate::constants::provider::{
    DEFAULT_API_HOST, DEFAULT_FUSION_HOST, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
#[cfg(any(test, feature = "mocks"))]
use crate::data::qiniu::mock_connection::MockConnection;
use crate::data::qiniu::{http_connection::HttpConnection, QiniuConnection};

pub mod error;

use error::ProviderResult;

/// Configuration for HTTP connections
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Management host, e.g. `http://api.qiniu.com`
    pub api_host: String,

    /// Fusion host, e.g. `http://fusion.qiniuapi.com`
    pub fusion_host: String,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// `User-Agent` sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            fusion_host: DEFAULT_FUSION_HOST.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&ProviderConfig> for HttpConfig {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            api_host: config.api_host.clone(),
            fusion_host: config.fusion_host.clone(),
            timeout_secs: (config.timeout_secs > 0).then_some(config.timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Enum wrapper for the real and mocked provider connections
pub enum AnyQiniuConnection {
    /// Real HTTP connection
    Real(HttpConnection),

    /// Mock connection for testing
    #[cfg(any(test, feature = "mocks"))]
    Mock(MockConnection),
}

impl Debug for AnyQiniuConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnyQiniuConnection::Real(_) => write!(f, "AnyQiniuConnection::Real(HttpConnection)"),
            #[cfg(any(test, feature = "mocks"))]
            AnyQiniuConnection::Mock(_) => write!(f, "AnyQiniuConnection::Mock(MockConnection)"),
        }
    }
}

#[async_trait]
impl QiniuConnection for AnyQiniuConnection {
    async fn get(&self, path: &str, body: Vec<u8>) -> ProviderResult<Bytes> {
        match self {
            AnyQiniuConnection::Real(conn) => conn.get(path, body).await,
            #[cfg(any(test, feature = "mocks"))]
            AnyQiniuConnection::Mock(conn) => conn.get(path, body).await,
        }
    }

    async fn post(&self, path: &str, body: Vec<u8>) -> ProviderResult<Bytes> {
        match self {
            AnyQiniuConnection::Real(conn) => conn.post(path, body).await,
            #[cfg(any(test, feature = "mocks"))]
            AnyQiniuConnection::Mock(conn) => conn.post(path, body).await,
        }
    }

    async fn is_reachable(&self) -> bool {
        match self {
            AnyQiniuConnection::Real(conn) => conn.is_reachable().await,
            #[cfg(any(test, feature = "mocks"))]
            AnyQiniuConnection::Mock(conn) => conn.is_reachable().await,
        }
    }
}
