//! `ResultsFetcher` trait and the reqwest-backed `HttpFetcher`.
//! The trait is the mock seam for poller tests.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::FetchError;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Fetches the raw JSON results document for a poll.
#[async_trait]
pub trait ResultsFetcher: Send + Sync {
    async fn fetch_results(&self, poll_id: &str) -> Result<serde_json::Value, FetchError>;
}

#[async_trait]
impl<T: ResultsFetcher + ?Sized> ResultsFetcher for std::sync::Arc<T> {
    async fn fetch_results(&self, poll_id: &str) -> Result<serde_json::Value, FetchError> {
        (**self).fetch_results(poll_id).await
    }
}

/// Build `{base}/api/polls/{poll_id}/result`.
///
/// Any path already on `base` is kept as a prefix. The poll id is
/// percent-encoded as a single segment.
pub fn result_url(base: &Url, poll_id: &str) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidUrl {
            url: base.to_string(),
            detail: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(["api", "polls", poll_id, "result"]);
    Ok(url)
}

/// Real fetcher over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Create a fetcher for `base_url` with no request timeout.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, None)
    }

    /// Create a fetcher, optionally bounding each request by `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let parsed = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_string(),
            detail: e.to_string(),
        })?;
        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(FetchError::InvalidUrl {
                url: base_url.to_string(),
                detail: format!("scheme must be http or https, got \"{scheme}\""),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl ResultsFetcher for HttpFetcher {
    async fn fetch_results(&self, poll_id: &str) -> Result<serde_json::Value, FetchError> {
        let url = result_url(&self.base_url, poll_id)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::Request)?;

        // Status is not checked: error bodies are JSON too and get rendered
        // as "no results".
        tracing::debug!(%url, status = %response.status(), "poll results response");

        let body = response.bytes().await.map_err(FetchError::Body)?;
        Ok(serde_json::from_slice(&body)?)
    }
}
