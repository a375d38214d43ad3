//! HTTP transport to the memory backend.
//!
//! `HttpService` wraps a `reqwest::Client` with pre-configured headers
//! and the backend base URL. Each operation posts JSON with a bounded
//! timeout and retries transient failures with linear backoff before
//! folding the last error into an [`ApiResult`] soft failure.

use crate::{AddPayload, ApiResult, FeedbackPayload, MemoryService, SearchPayload};
use anyhow::Result;
use mcore::BridgeConfig;
use reqwest::{
    Client, StatusCode,
    header::{self, HeaderMap, HeaderValue},
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const SEARCH_PATH: &str = "/product/search";
const ADD_PATH: &str = "/product/add";
const FEEDBACK_PATH: &str = "/product/feedback";

/// Linear backoff unit between retry attempts.
const BACKOFF_MS: u64 = 500;

/// A transient transport failure, retried before being folded into an
/// [`ApiResult`] soft failure.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request failed at the HTTP layer (connect error, timeout).
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("http status {0}")]
    Status(StatusCode),

    /// The response body was not a valid result envelope.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP implementation of [`MemoryService`].
///
/// Holds a `reqwest::Client`, pre-built headers (bearer auth +
/// content-type), and the backend base URL.
#[derive(Clone)]
pub struct HttpService {
    client: Client,
    headers: HeaderMap,
    base_url: String,
    timeout: Duration,
    retries: u32,
}

impl HttpService {
    /// Create a service from configuration, with Bearer authentication
    /// when an api key is configured.
    pub fn new(client: Client, config: &BridgeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if config.has_api_key() {
            headers.insert(
                header::AUTHORIZATION,
                format!("Bearer {}", config.api_key).parse()?,
            );
        }
        Ok(Self {
            client,
            headers,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            timeout: Duration::from_millis(config.timeout_ms),
            retries: config.retries,
        })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Post a payload, retrying transient failures with linear backoff
    /// (`attempt × 500ms`). Exhausted retries fold into a code-500
    /// [`ApiResult`] rather than an error.
    async fn post(&self, path: &str, body: &impl Serialize) -> ApiResult {
        for attempt in 1..=self.retries + 1 {
            match self.try_post(path, body).await {
                Ok(result) => return result,
                Err(e) if attempt <= self.retries => {
                    tracing::debug!("{path} attempt {attempt} failed: {e}, retrying");
                    tokio::time::sleep(Duration::from_millis(BACKOFF_MS * attempt as u64)).await;
                }
                Err(e) => {
                    tracing::warn!("{path} failed after {} retries: {e}", self.retries);
                    return ApiResult::failure(format!("{path} failed: {e}"));
                }
            }
        }
        ApiResult::failure(format!("{path} failed"))
    }

    async fn try_post(&self, path: &str, body: &impl Serialize) -> Result<ApiResult, TransportError> {
        let url = format!("{}{path}", self.base_url);
        tracing::trace!("request: {}", serde_json::to_string(body)?);
        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl MemoryService for HttpService {
    async fn search(&self, payload: &SearchPayload) -> ApiResult {
        self.post(SEARCH_PATH, payload).await
    }

    async fn add(&self, payload: &AddPayload) -> ApiResult {
        self.post(ADD_PATH, payload).await
    }

    async fn feedback(&self, payload: &FeedbackPayload) -> ApiResult {
        self.post(FEEDBACK_PATH, payload).await
    }
}
