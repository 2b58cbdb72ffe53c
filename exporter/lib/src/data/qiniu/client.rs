//! Typed Qiniu client

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::{
    constants::provider::paths,
    data::qiniu::{AnyQiniuConnection, ProviderConnectionError, QiniuConnection},
    error::Result,
    models::provider::{
        BandwidthData, BandwidthRequest, DomainListQuery, DomainListResponse, Envelope,
        HitMissData, LogAnalysisRequest, StatusCodeData,
    },
};

/// Qiniu client that uses a [`QiniuConnection`]
pub struct QiniuClient {
    connection: Arc<AnyQiniuConnection>,
}

impl QiniuClient {
    /// Create a new QiniuClient with the given connection
    pub fn new(connection: Arc<AnyQiniuConnection>) -> Self {
        Self { connection }
    }

    pub async fn is_reachable(&self) -> bool {
        self.connection.is_reachable().await
    }

    fn encode<B: Serialize>(body: &B) -> Result<Vec<u8>> {
        serde_json::to_vec(body)
            .map_err(|e| ProviderConnectionError::Serialization(e.to_string()).into())
    }

    async fn post_envelope<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned + Default,
    {
        let bytes = self.connection.post(path, Self::encode(body)?).await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        envelope.into_data()
    }

    /// List the names of the CDN domains of the account, in provider order
    pub async fn list_domains(&self, limit: u32) -> Result<Vec<String>> {
        debug!(target: "qiniu::client::list_domains", limit, "Provider call: list_domains");

        let body = Self::encode(&DomainListQuery::new(limit))?;
        let bytes = self.connection.get(paths::DOMAINS, body).await?;
        let response: DomainListResponse = serde_json::from_slice(&bytes)?;

        Ok(response
            .domains
            .into_iter()
            .map(|domain| domain.name)
            .collect())
    }

    /// Bandwidth series of one domain
    pub async fn bandwidth(&self, request: &BandwidthRequest) -> Result<BandwidthData> {
        debug!(
            target: "qiniu::client::bandwidth",
            domain = %request.domains,
            start = %request.start_date,
            end = %request.end_date,
            "Provider call: bandwidth"
        );

        self.post_envelope(paths::BANDWIDTH, request).await
    }

    /// Cache hit/miss series of one domain
    pub async fn hit_miss(&self, request: &LogAnalysisRequest) -> Result<HitMissData> {
        debug!(
            target: "qiniu::client::hit_miss",
            domains = ?request.domains,
            start = %request.start_date,
            end = %request.end_date,
            "Provider call: hit_miss"
        );

        self.post_envelope(paths::HIT_MISS, request).await
    }

    /// Status code series of one domain
    pub async fn status_codes(&self, request: &LogAnalysisRequest) -> Result<StatusCodeData> {
        debug!(
            target: "qiniu::client::status_codes",
            domains = ?request.domains,
            start = %request.start_date,
            end = %request.end_date,
            "Provider call: status_codes"
        );

        self.post_envelope(paths::STATUS_CODE, request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        constants::test,
        data::qiniu::{ErrorMode, MockConnection},
        error::Error,
        window::Granularity,
    };

    async fn mock_client() -> (QiniuClient, Arc<AnyQiniuConnection>) {
        let conn = Arc::new(AnyQiniuConnection::Mock(MockConnection::sample().await));
        (QiniuClient::new(conn.clone()), conn)
    }

    fn mock(conn: &AnyQiniuConnection) -> &MockConnection {
        match conn {
            AnyQiniuConnection::Mock(mock) => mock,
            _ => unreachable!(),
        }
    }

    fn log_request() -> LogAnalysisRequest {
        LogAnalysisRequest::new(
            ("2024-03-10".into(), "2024-03-10".into()),
            Granularity::FiveMinutes,
            test::domains::FIRST,
        )
    }

    #[tokio::test]
    async fn list_domains_returns_names_in_order() {
        let (client, conn) = mock_client().await;

        let domains = client.list_domains(50).await.expect("able to list domains");
        assert_eq!(domains, vec![test::domains::FIRST, test::domains::SECOND]);

        let calls = mock(&conn).calls().await;
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].body, json!({"Limit": 50, "SourceTypes": ["domain"]}));
    }

    #[tokio::test]
    async fn list_domains_tolerates_no_domains() {
        let (client, conn) = mock_client().await;
        mock(&conn)
            .set_response(paths::DOMAINS, json!({"domains": []}))
            .await;

        assert!(client.list_domains(50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_domains_fails_on_malformed_json() {
        let (client, conn) = mock_client().await;
        mock(&conn)
            .set_raw_response(paths::DOMAINS, "<html>gateway</html>")
            .await;

        assert!(matches!(
            client.list_domains(50).await,
            Err(Error::Decode(_))
        ));
    }

    #[tokio::test]
    async fn bandwidth_decodes_zone_series() {
        let (client, _) = mock_client().await;
        let request = BandwidthRequest::new(
            ("2024-03-10 11:30:00".into(), "2024-03-10 11:55:00".into()),
            Granularity::FiveMinutes,
            test::domains::FIRST,
        );

        let data = client.bandwidth(&request).await.unwrap();
        let series = &data[test::domains::FIRST];
        assert_eq!(series.china, test::bandwidth::CHINA.to_vec());
        assert_eq!(series.oversea, test::bandwidth::OVERSEA.to_vec());
    }

    #[tokio::test]
    async fn hit_miss_posts_domain_list() {
        let (client, conn) = mock_client().await;

        let data = client.hit_miss(&log_request()).await.unwrap();
        assert_eq!(data.hit, test::hit_miss::HIT.to_vec());

        let calls = mock(&conn).calls().await;
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, paths::HIT_MISS);
        assert_eq!(calls[0].body["domains"], json!([test::domains::FIRST]));
        assert_eq!(calls[0].body["freq"], "5min");
    }

    #[tokio::test]
    async fn status_codes_surface_provider_errors() {
        let (client, conn) = mock_client().await;
        mock(&conn)
            .set_response(
                paths::STATUS_CODE,
                json!({"code": 400_033, "error": "domain not found", "data": null}),
            )
            .await;

        assert!(matches!(
            client.status_codes(&log_request()).await,
            Err(Error::Provider { code: 400_033, .. })
        ));
    }

    #[tokio::test]
    async fn transport_failures_propagate() {
        let (client, conn) = mock_client().await;
        mock(&conn)
            .set_error_mode(ErrorMode::TransportError("connection reset".to_string()))
            .await;

        assert!(matches!(
            client.hit_miss(&log_request()).await,
            Err(Error::Transport(_))
        ));
    }
}
