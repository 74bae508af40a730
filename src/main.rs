//! CLI entry point for the celldict crawler.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};

use celldict::{Crawler, FileDownloader, HtmlFetcher, IdRange, Site, WorkerPool, shutdown_channel};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!(dir = %args.dir.display(), "celldict starting");

    let crawler = Arc::new(Crawler::new(
        Site::sogou(),
        HtmlFetcher::new(),
        FileDownloader::new(),
        args.dir.clone(),
        args.max_pages,
    ));

    let workers = args.workers.unwrap_or_else(|| {
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    });
    let pool = WorkerPool::new(workers)?;

    // Ctrl-C requests cooperative shutdown; workers finish their current
    // category and the producer stops feeding IDs.
    let (trigger, signal) = shutdown_channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, shutting down");
                trigger.trigger();
            }
            Err(e) => {
                // Keep the trigger alive: dropping it would read as shutdown.
                warn!(error = %e, "failed to listen for interrupt");
                std::future::pending::<()>().await;
            }
        }
    });

    let ids = IdRange {
        start: args.start_id,
        end: args.end_id,
    };
    let stats = pool.run(crawler, ids, signal).await;

    info!(
        categories = stats.categories(),
        failed = stats.failed(),
        downloaded = stats.downloaded(),
        skipped = stats.skipped(),
        "celldict finished"
    );

    Ok(())
}
