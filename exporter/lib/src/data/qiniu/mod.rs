//! Qiniu provider access
//!
//! The connection layer moves signed bytes to and from the two provider
//! hosts; [`QiniuClient`] sits on top and speaks the typed endpoints.

use async_trait::async_trait;
use bytes::Bytes;

pub mod client;
pub mod connection;
pub mod http_connection;
#[cfg(any(test, feature = "mocks"))]
pub mod mock_connection;
pub mod signer;

pub use client::QiniuClient;
pub use connection::{
    error::{ProviderConnectionError, ProviderResult},
    AnyQiniuConnection, HttpConfig,
};
pub use http_connection::HttpConnection;
#[cfg(any(test, feature = "mocks"))]
pub use mock_connection::{ErrorMode, MockConnection, RecordedCall};
pub use signer::{QBoxSigner, RequestSigner, SigningRequest};

/// Trait for provider connections
#[async_trait]
pub trait QiniuConnection: Send + Sync {
    /// Signed GET with a JSON body against the management host
    async fn get(&self, path: &str, body: Vec<u8>) -> ProviderResult<Bytes>;

    /// Signed POST with a JSON body against the fusion host
    async fn post(&self, path: &str, body: Vec<u8>) -> ProviderResult<Bytes>;

    /// Whether the provider answers at all, whatever the status
    async fn is_reachable(&self) -> bool;
}
