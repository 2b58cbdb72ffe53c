//! Request signing
//!
//! Requests to both Qiniu hosts carry `Authorization: QBox <token>`. The
//! token is `<access_key>:<urlsafe_base64(hmac_sha1(secret_key, data))>`
//! where `data` is the request path, the query string if any, a newline and,
//! for form-encoded requests only, the body.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha1::Sha1;

use super::connection::error::{ProviderConnectionError, ProviderResult};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The parts of a request that a signature may cover
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    pub method: &'a str,
    pub url: &'a Url,
    pub content_type: &'a str,
    pub body: &'a [u8],
}

/// Computes the authorization token of a request
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: &SigningRequest<'_>) -> ProviderResult<String>;
}

pub struct QBoxSigner {
    access_key: String,
    secret_key: String,
}

impl QBoxSigner {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    fn signing_data(request: &SigningRequest<'_>) -> Vec<u8> {
        let mut data = request.url.path().as_bytes().to_vec();
        if let Some(query) = request.url.query() {
            data.push(b'?');
            data.extend_from_slice(query.as_bytes());
        }
        data.push(b'\n');

        if request.content_type == FORM_CONTENT_TYPE {
            data.extend_from_slice(request.body);
        }
        data
    }
}

impl RequestSigner for QBoxSigner {
    fn sign(&self, request: &SigningRequest<'_>) -> ProviderResult<String> {
        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(ProviderConnectionError::Signing(
                "access key and secret key must not be empty".to_string(),
            ));
        }

        let mut mac = Hmac::<Sha1>::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| ProviderConnectionError::Signing(e.to_string()))?;
        mac.update(&Self::signing_data(request));
        let digest = mac.finalize().into_bytes();

        Ok(format!("{}:{}", self.access_key, URL_SAFE.encode(digest)))
    }
}
