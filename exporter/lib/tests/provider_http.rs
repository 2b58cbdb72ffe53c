//! Integration tests for the signed HTTP provider connection, against a
//! mockito stand-in for the Qiniu API and fusion hosts

use std::sync::Arc;

use chrono::DateTime;
use mockito::{Matcher, Server, ServerGuard};
use qiniu_cdn_exporter_lib::{
    config::Config,
    data::qiniu::{AnyQiniuConnection, HttpConfig, HttpConnection, QBoxSigner, QiniuClient},
    services::Services,
    window::{Clock, FixedClock},
    Error,
};
use serde_json::json;

const ACCESS_KEY: &str = "test-access-key";
const SECRET_KEY: &str = "test-secret-key";
const DOMAIN: &str = "cdn.example.com";

fn connection(server: &ServerGuard) -> Arc<AnyQiniuConnection> {
    let config = HttpConfig {
        api_host: server.url(),
        fusion_host: server.url(),
        timeout_secs: Some(5),
        ..HttpConfig::default()
    };
    let signer = Arc::new(QBoxSigner::new(ACCESS_KEY, SECRET_KEY));
    let conn = HttpConnection::new(config, signer).expect("valid http config");
    Arc::new(AnyQiniuConnection::Real(conn))
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        DateTime::parse_from_rfc3339("2024-03-10T12:00:00+08:00").unwrap(),
    ))
}

async fn mock_domains(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/domain")
        .match_header("authorization", "QBox test-access-key:rB09SfY__F0rWm3axzkWybqkxGY=")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"Limit": 50, "SourceTypes": ["domain"]})))
        .with_status(200)
        .with_body(json!({"domains": [{"name": DOMAIN, "type": "normal"}]}).to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn list_domains_sends_signed_get() {
    let mut server = Server::new_async().await;
    let mock = mock_domains(&mut server).await;

    let client = QiniuClient::new(connection(&server));
    let domains = client.list_domains(50).await.unwrap();

    assert_eq!(domains, vec![DOMAIN]);
    mock.assert_async().await;
}

#[tokio::test]
async fn full_scrape_over_http() {
    let mut server = Server::new_async().await;
    let domains = mock_domains(&mut server).await;

    let bandwidth = server
        .mock("POST", "/v2/tune/monitoring/bandwidth")
        .match_header("authorization", "QBox test-access-key:wPkRJ-79t1NqlWzT0SD2DOEsMLI=")
        .match_body(Matcher::Json(json!({
            "startDate": "2024-03-10 11:30:00",
            "endDate": "2024-03-10 11:55:00",
            "granularity": "5min",
            "domains": DOMAIN,
            "type": "bandwidth"
        })))
        .with_body(
            json!({
                "code": 200,
                "data": {(DOMAIN): {"china": [1_048_576, 2_097_152, 3_145_728], "oversea": [7]}}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let hit_miss = server
        .mock("POST", "/v2/tune/loganalyze/hitmiss")
        .match_header("authorization", "QBox test-access-key:hKRrpJ6ADBs1xBZOWc8VWFjQH9Y=")
        .match_body(Matcher::PartialJson(json!({
            "domains": [DOMAIN],
            "freq": "5min",
            "startDate": "2024-03-10",
            "endDate": "2024-03-10"
        })))
        .with_body(
            json!({
                "code": 200,
                "data": {
                    "hit": [10, 20],
                    "miss": [5, 5],
                    "trafficHit": [300, 600],
                    "trafficMiss": [100, 200]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let status_code = server
        .mock("POST", "/v2/tune/loganalyze/statuscode")
        .match_header("authorization", "QBox test-access-key:B3zrwopWpFbQt10DGFEBMSetzKI=")
        .with_body(
            json!({
                "code": 200,
                "data": {"codes": {"200": [10], "404": [5], "2xx": [0]}}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let services = Services::with_clock(connection(&server), &Config::default(), clock());
    let report = services.cdn_stats.scrape().await.unwrap();

    domains.assert_async().await;
    bandwidth.assert_async().await;
    hit_miss.assert_async().await;
    status_code.assert_async().await;

    let metrics = &report.domains[0];
    assert_eq!(metrics.domain, DOMAIN);
    assert_eq!(metrics.bandwidth, Some(2_097_152.0));
    assert_eq!(metrics.hit_rate, Some(0.75));
    assert_eq!(metrics.byte_hit_rate, Some(0.75));
    assert!((metrics.status["2xx"] - 2.0 / 3.0).abs() < 1e-9);
    assert!((metrics.status["4xx"] - 1.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/domain")
        .with_status(401)
        .with_body(r#"{"error":"bad token"}"#)
        .create_async()
        .await;

    let client = QiniuClient::new(connection(&server));
    let result = client.list_domains(50).await;

    match result {
        Err(Error::Transport(message)) => assert!(message.contains("401")),
        other => panic!("expected transport error, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn envelope_error_code_is_a_provider_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v2/tune/loganalyze/hitmiss")
        .with_body(json!({"code": 400_000, "error": "invalid date range"}).to_string())
        .create_async()
        .await;

    let client = QiniuClient::new(connection(&server));
    let request = qiniu_cdn_exporter_lib::models::LogAnalysisRequest::new(
        ("2024-03-10".to_string(), "2024-03-10".to_string()),
        Default::default(),
        DOMAIN,
    );

    match client.hit_miss(&request).await {
        Err(Error::Provider { code, message }) => {
            assert_eq!(code, 400_000);
            assert_eq!(message, "invalid date range");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v2/tune/loganalyze/statuscode")
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;

    let client = QiniuClient::new(connection(&server));
    let request = qiniu_cdn_exporter_lib::models::LogAnalysisRequest::new(
        ("2024-03-10".to_string(), "2024-03-10".to_string()),
        Default::default(),
        DOMAIN,
    );

    assert!(matches!(
        client.status_codes(&request).await,
        Err(Error::Decode(_))
    ));
}
