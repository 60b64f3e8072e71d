//! Schedule Crawler — Binary Entrypoint
//! Performs exactly one pipeline run: load config and talent directory,
//! scrape every branch page, deduplicate, publish the snapshot, exit.
//!
//! Periodic re-crawls are the scheduler's job (cron/CI), not ours.

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use holodule_crawler::crawl::{self, config::load_config_default, fetch::HttpFetcher};
use holodule_crawler::talents;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("holodule_crawler=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = load_config_default().context("loading crawl config")?;

    // No talent directory, no run: records would be unattributable.
    let (groups, index) =
        talents::load_directory(&cfg.talents_path).context("loading talent directory")?;
    tracing::info!(
        groups = groups.len(),
        keywords = index.len(),
        branches = cfg.branches.len(),
        "starting crawl"
    );

    let fetcher = HttpFetcher::new(Duration::from_secs(cfg.timeout_secs))?;
    let snapshot = crawl::crawl_and_publish(&cfg, &fetcher, &index).await?;

    tracing::info!(streams = snapshot.streams.len(), "crawl finished");
    Ok(())
}
