use std::time::Duration;

use reqwest::Client as HttpClient;
use url::Url;

use crate::error::{AppError, AppResult};

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs GET requests against the catalog.
///
/// Any status is a successful exchange; only transport failures (timeout,
/// DNS, refused connection) come back as `AppError::Network`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn get(&self, url: Url, headers: Vec<(&'static str, String)>) -> AppResult<RawResponse>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: HttpClient,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }
}

fn network_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Network("request timed out".to_string())
    } else {
        AppError::Network(e.to_string())
    }
}

#[async_trait::async_trait]
impl CatalogTransport for ReqwestTransport {
    async fn get(&self, url: Url, headers: Vec<(&'static str, String)>) -> AppResult<RawResponse> {
        let mut request = self.http_client.get(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(network_error)?;

        Ok(RawResponse { status, body })
    }
}
