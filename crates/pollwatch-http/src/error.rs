//! Error types for the poll results fetcher.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid base URL \"{url}\": {detail}")]
    InvalidUrl { url: String, detail: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request failed")]
    Request(#[source] reqwest::Error),

    #[error("failed to read response body")]
    Body(#[source] reqwest::Error),

    #[error("response is not valid JSON")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Display text followed by every source, joined with `": "`.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}
