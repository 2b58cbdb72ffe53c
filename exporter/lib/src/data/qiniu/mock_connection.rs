//! Mock provider connection for testing
//!
//! Serves canned JSON per endpoint path, records every call and can simulate
//! failures.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::{
    constants::{provider::paths, test},
    data::qiniu::{
        connection::error::{ProviderConnectionError, ProviderResult},
        QiniuConnection,
    },
};

/// Error simulation modes for testing
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorMode {
    /// No errors - all calls succeed
    None,
    /// Simulate request timeout
    Timeout,
    /// Simulate transport error
    TransportError(String),
    /// Answer every call with the given HTTP status
    HttpStatus(u16),
    /// Fail only the calls whose body mentions the given domain
    FailForDomain(String),
    /// Fail after N successful calls
    FailAfterNCalls(usize),
}

/// A call received by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

/// Most recent calls kept for inspection; older ones are dropped
pub const MAX_RECORDED_CALLS: usize = 1024;

#[derive(Debug, Default)]
struct CallLog {
    recent: VecDeque<RecordedCall>,
    total: usize,
}

impl CallLog {
    /// Records a call and returns its 1-based number since creation
    fn record(&mut self, call: RecordedCall) -> usize {
        if self.recent.len() == MAX_RECORDED_CALLS {
            self.recent.pop_front();
        }
        self.recent.push_back(call);
        self.total += 1;
        self.total
    }
}

/// Mock provider connection for testing
pub struct MockConnection {
    /// Predefined responses by endpoint path
    responses: Arc<RwLock<HashMap<String, Value>>>,
    /// Raw (possibly malformed) responses by endpoint path, preferred over `responses`
    raw_responses: Arc<RwLock<HashMap<String, Bytes>>>,
    /// Error simulation mode
    error_mode: Arc<RwLock<ErrorMode>>,
    /// Calls received, in order, bounded by [`MAX_RECORDED_CALLS`]
    calls: Arc<Mutex<CallLog>>,
}

impl MockConnection {
    /// Create a new mock connection without any response configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock connection answering every endpoint with the sample
    /// payloads of [`crate::constants::test`]
    pub async fn sample() -> Self {
        let conn = Self::new();
        conn.set_response(paths::DOMAINS, test::domains::listing())
            .await;
        conn.set_response(paths::BANDWIDTH, test::bandwidth::response())
            .await;
        conn.set_response(paths::HIT_MISS, test::hit_miss::response())
            .await;
        conn.set_response(paths::STATUS_CODE, test::status_code::response())
            .await;
        conn
    }

    /// Set a custom response for a specific endpoint path
    pub async fn set_response(&self, path: &str, response: Value) {
        let mut responses = self.responses.write().await;
        responses.insert(path.to_string(), response);
    }

    /// Set a raw body for a specific endpoint path
    pub async fn set_raw_response(&self, path: &str, body: impl Into<Bytes>) {
        let mut raw = self.raw_responses.write().await;
        raw.insert(path.to_string(), body.into());
    }

    /// Set the error simulation mode
    pub async fn set_error_mode(&self, mode: ErrorMode) {
        let mut error_mode = self.error_mode.write().await;
        *error_mode = mode;
    }

    /// The last [`MAX_RECORDED_CALLS`] calls received
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.recent.iter().cloned().collect()
    }

    /// Number of calls received since creation
    pub async fn total_calls(&self) -> usize {
        self.calls.lock().await.total
    }

    /// Number of calls received for a given path
    pub async fn call_count(&self, path: &str) -> usize {
        self.calls
            .lock()
            .await
            .recent
            .iter()
            .filter(|call| call.path == path)
            .count()
    }

    async fn handle(&self, method: &'static str, path: &str, body: Vec<u8>) -> ProviderResult<Bytes> {
        let call_number = self.calls.lock().await.record(RecordedCall {
            method,
            path: path.to_string(),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });

        self.check_error(call_number, &body).await?;

        if let Some(raw) = self.raw_responses.read().await.get(path) {
            return Ok(raw.clone());
        }

        let responses = self.responses.read().await;
        match responses.get(path) {
            Some(value) => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(|e| ProviderConnectionError::Serialization(e.to_string())),
            None => Err(ProviderConnectionError::Status {
                status: 404,
                body: format!("no mock response for {path}"),
            }),
        }
    }

    async fn check_error(&self, call_number: usize, body: &[u8]) -> ProviderResult<()> {
        let error_mode = self.error_mode.read().await.clone();

        match error_mode {
            ErrorMode::None => Ok(()),
            ErrorMode::Timeout => Err(ProviderConnectionError::Timeout),
            ErrorMode::TransportError(msg) => Err(ProviderConnectionError::Transport(msg)),
            ErrorMode::HttpStatus(status) => Err(ProviderConnectionError::Status {
                status,
                body: "simulated status".to_string(),
            }),
            ErrorMode::FailForDomain(domain) => {
                let needle = format!("\"{domain}\"");
                if String::from_utf8_lossy(body).contains(&needle) {
                    Err(ProviderConnectionError::Transport(format!(
                        "Simulated failure for {domain}"
                    )))
                } else {
                    Ok(())
                }
            }
            ErrorMode::FailAfterNCalls(n) => {
                if call_number > n {
                    Err(ProviderConnectionError::Transport(
                        "Simulated failure after N calls".to_string(),
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Default for MockConnection {
    fn default() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            raw_responses: Arc::new(RwLock::new(HashMap::new())),
            error_mode: Arc::new(RwLock::new(ErrorMode::None)),
            calls: Arc::new(Mutex::new(CallLog::default())),
        }
    }
}

#[async_trait]
impl QiniuConnection for MockConnection {
    async fn get(&self, path: &str, body: Vec<u8>) -> ProviderResult<Bytes> {
        self.handle("GET", path, body).await
    }

    async fn post(&self, path: &str, body: Vec<u8>) -> ProviderResult<Bytes> {
        self.handle("POST", path, body).await
    }

    async fn is_reachable(&self) -> bool {
        !matches!(
            *self.error_mode.read().await,
            ErrorMode::Timeout | ErrorMode::TransportError(_)
        )
    }
}
