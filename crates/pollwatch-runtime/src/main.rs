//! pollwatch: renders live poll results from the results endpoint.

use clap::Parser;

use pollwatch_http::HttpFetcher;
use pollwatch_runtime::cli::Cli;
use pollwatch_runtime::page::results_page;
use pollwatch_runtime::poller::{Attach, PollResultsPoller};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr; stdout carries only markup.
    let filter = std::env::var("POLLWATCH_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let fetcher = HttpFetcher::with_timeout(&args.base_url, args.timeout())?;
    let page = results_page(args.poll_id.as_deref(), Some(args.target()));

    let poller = match PollResultsPoller::attach(&page, fetcher).await {
        Attach::Ready(poller) => poller,
        Attach::MissingPollId => {
            tracing::warn!("no poll id configured (--poll-id / POLLWATCH_POLL_ID)");
            return Ok(());
        }
        Attach::Detached => return Ok(()),
    };

    if args.once {
        poller.fetch_and_render().await;
        return Ok(());
    }

    tracing::info!(
        poll_id = poller.poll_id(),
        base_url = %args.base_url,
        interval_ms = args.interval_ms,
        "pollwatch starting"
    );

    tokio::select! {
        () = poller.run(args.interval()) => {}
        () = shutdown_signal() => {}
    }

    Ok(())
}

/// Resolve on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    () = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                    _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                tracing::warn!("failed to register SIGTERM handler: {e}");
                ctrl_c.await;
                tracing::info!("received ctrl-c, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        tracing::info!("received ctrl-c, shutting down");
    }
}
