//! HTTP provider connection
//!
//! Signs every request with the configured [`RequestSigner`] and sends it
//! with reqwest. Non-success statuses are errors; nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Url,
};
use tracing::debug;

use crate::constants::provider::AUTHORIZATION_SCHEME;
use crate::data::qiniu::{
    connection::{
        error::{ProviderConnectionError, ProviderResult},
        HttpConfig,
    },
    signer::{RequestSigner, SigningRequest},
    QiniuConnection,
};

const JSON_CONTENT_TYPE: &str = "application/json";

pub struct HttpConnection {
    client: Client,
    api_host: Url,
    fusion_host: Url,
    signer: Arc<dyn RequestSigner>,
}

impl HttpConnection {
    pub fn new(config: HttpConfig, signer: Arc<dyn RequestSigner>) -> ProviderResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent);
        if let Some(timeout_secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder.build().map_err(|e| {
            ProviderConnectionError::Transport(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            api_host: Self::parse_host(&config.api_host)?,
            fusion_host: Self::parse_host(&config.fusion_host)?,
            signer,
        })
    }

    fn parse_host(host: &str) -> ProviderResult<Url> {
        Url::parse(host).map_err(|e| ProviderConnectionError::InvalidUrl(format!("{host}: {e}")))
    }

    async fn send(
        &self,
        method: Method,
        host: &Url,
        path: &str,
        body: Vec<u8>,
    ) -> ProviderResult<Bytes> {
        let url = host
            .join(path)
            .map_err(|e| ProviderConnectionError::InvalidUrl(format!("{host}{path}: {e}")))?;

        let token = self.signer.sign(&SigningRequest {
            method: method.as_str(),
            url: &url,
            content_type: JSON_CONTENT_TYPE,
            body: &body,
        })?;

        debug!(target: "qiniu::http_connection", method = %method, url = %url, "Sending provider request");

        let response = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, format!("{AUTHORIZATION_SCHEME} {token}"))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderConnectionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?)
    }
}

#[async_trait]
impl QiniuConnection for HttpConnection {
    async fn get(&self, path: &str, body: Vec<u8>) -> ProviderResult<Bytes> {
        self.send(Method::GET, &self.api_host, path, body).await
    }

    async fn post(&self, path: &str, body: Vec<u8>) -> ProviderResult<Bytes> {
        self.send(Method::POST, &self.fusion_host, path, body).await
    }

    async fn is_reachable(&self) -> bool {
        match self.client.head(self.api_host.clone()).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!(target: "qiniu::http_connection", error = %e, "Provider unreachable");
                false
            }
        }
    }
}
