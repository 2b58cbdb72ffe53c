use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("Invalid time window: range {range_secs}s, delay {delay_secs}s")]
    InvalidWindow { range_secs: i64, delay_secs: i64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metrics exposition error: {0}")]
    Exposition(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<prometheus::Error> for Error {
    fn from(e: prometheus::Error) -> Self {
        Error::Exposition(e.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Config(_) | Error::InvalidWindow { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Transport(_) | Error::Provider { .. } => StatusCode::BAD_GATEWAY,
            Error::Signing(_) | Error::Decode(_) | Error::Exposition(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display_carries_code() {
        let err = Error::Provider {
            code: 400_001,
            message: "invalid domain".to_string(),
        };
        assert_eq!(err.to_string(), "Provider error 400001: invalid domain");
    }

    #[test]
    fn failed_scrape_is_a_server_error() {
        let response = Error::Transport("connection refused".to_string()).into_response();
        assert!(response.status().is_server_error());

        let response = Error::Decode("expected value".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn upstream_failures_are_bad_gateway() {
        let upstream = [
            Error::Transport("connection refused".to_string()),
            Error::Provider {
                code: 400_001,
                message: "invalid domain".to_string(),
            },
        ];
        for err in upstream {
            assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
        }

        let local = [
            Error::Signing("bad key".to_string()),
            Error::Config("missing key".to_string()),
            Error::InvalidWindow {
                range_secs: 300,
                delay_secs: 1800,
            },
            Error::Exposition("duplicate".to_string()),
        ];
        for err in local {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
