//! CLI definition using clap derive. Every option can also come from a
//! `POLLWATCH_*` environment variable.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use pollwatch_http::DEFAULT_BASE_URL;

use crate::output::{ContentTarget, FileTarget, StdoutTarget};
use crate::poller::DEFAULT_INTERVAL_MS;

#[derive(Parser, Debug)]
#[command(name = "pollwatch", about = "Live poll results poller")]
pub struct Cli {
    /// Server base URL; results are read from {base}/api/polls/{id}/result
    #[arg(long, env = "POLLWATCH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Poll to watch. Without it the missing-id placeholder is rendered and
    /// nothing is fetched.
    #[arg(long, env = "POLLWATCH_POLL_ID")]
    pub poll_id: Option<String>,

    /// Refresh interval in milliseconds
    #[arg(
        long,
        env = "POLLWATCH_INTERVAL_MS",
        default_value_t = DEFAULT_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    /// Per-request timeout in milliseconds (default: none)
    #[arg(long, env = "POLLWATCH_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Write the rendered markup to this file instead of stdout
    #[arg(long, short = 'o', env = "POLLWATCH_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Render once and exit
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Target the content element publishes to.
    pub fn target(&self) -> Arc<dyn ContentTarget> {
        match &self.output {
            Some(path) => Arc::new(FileTarget::new(path)),
            None => Arc::new(StdoutTarget),
        }
    }
}
