//! Poll results poller: attaches to a page, fetches results on a fixed
//! interval and re-renders the content element.

use std::sync::Arc;

use tokio::time::{Duration, MissedTickBehavior, interval};

use pollwatch_core::{MISSING_POLL_ID, PollResultPayload, render_error, render_results};
use pollwatch_http::ResultsFetcher;

use crate::page::{CONTAINER_ID, CONTENT_ID, Element, POLL_ID_ATTR, Page};

/// Default refresh interval.
pub const DEFAULT_INTERVAL_MS: u64 = 30_000;

/// Outcome of [`PollResultsPoller::attach`].
pub enum Attach<F> {
    /// Container or content element missing. Nothing was written.
    Detached,
    /// Container has no poll id. The error placeholder was rendered and
    /// polling must not start.
    MissingPollId,
    Ready(PollResultsPoller<F>),
}

impl<F> std::fmt::Debug for Attach<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detached => f.write_str("Detached"),
            Self::MissingPollId => f.write_str("MissingPollId"),
            Self::Ready(p) => f.debug_tuple("Ready").field(&p.poll_id).finish(),
        }
    }
}

pub struct PollResultsPoller<F> {
    poll_id: String,
    content: Element,
    fetcher: Arc<F>,
}

impl<F: ResultsFetcher + 'static> PollResultsPoller<F> {
    /// Locate the container and content elements and read the poll id.
    pub async fn attach(page: &Page, fetcher: F) -> Attach<F> {
        let (Some(container), Some(content)) = (
            page.get_element_by_id(CONTAINER_ID),
            page.get_element_by_id(CONTENT_ID),
        ) else {
            return Attach::Detached;
        };

        let poll_id = match container.data(POLL_ID_ATTR) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                if let Err(e) = content.set_inner_html(MISSING_POLL_ID.to_string()).await {
                    tracing::warn!("failed to publish results markup: {e}");
                }
                return Attach::MissingPollId;
            }
        };

        Attach::Ready(Self {
            poll_id,
            content: content.clone(),
            fetcher: Arc::new(fetcher),
        })
    }

    pub fn poll_id(&self) -> &str {
        &self.poll_id
    }

    /// Fetch the latest results and overwrite the content element.
    ///
    /// Never fails: fetch and decode errors become the error placeholder,
    /// malformed payloads become "No results yet.".
    pub async fn fetch_and_render(&self) {
        let markup = match self.fetcher.fetch_results(&self.poll_id).await {
            Ok(body) => {
                let payload = self.decode(body);
                render_results(&payload)
            }
            Err(e) => {
                let detail = e.detail();
                tracing::error!(poll_id = %self.poll_id, "error fetching results: {detail}");
                render_error(&detail)
            }
        };

        if let Err(e) = self.content.set_inner_html(markup).await {
            tracing::warn!(poll_id = %self.poll_id, "failed to publish results markup: {e}");
        }
    }

    fn decode(&self, body: serde_json::Value) -> PollResultPayload {
        let payload = match PollResultPayload::from_value(body) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(poll_id = %self.poll_id, "unexpected results shape: {e}");
                return PollResultPayload::default();
            }
        };

        if let Some(ref err) = payload.error {
            tracing::warn!(poll_id = %self.poll_id, "server reported: {err}");
        } else if !payload.has_results() {
            tracing::debug!(poll_id = %self.poll_id, "no results in payload");
        } else {
            tracing::debug!(
                poll_id = %self.poll_id,
                question = payload.question.as_deref().unwrap_or(""),
                total = payload.total_votes_or_sum(),
                "results updated"
            );
        }
        payload
    }

    /// Render immediately, then every `period`, forever.
    ///
    /// Each cycle runs as its own task. A cycle slower than `period` overlaps
    /// the next one and whichever response resolves last is what stays
    /// rendered.
    pub async fn run(self, period: Duration) {
        let poller = Arc::new(self);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let cycle = Arc::clone(&poller);
            tokio::spawn(async move {
                cycle.fetch_and_render().await;
            });
        }
    }
}
