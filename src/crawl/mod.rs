// src/crawl/mod.rs
//! The scrape-normalize-deduplicate pipeline.
//!
//! One run: fetch every configured branch page, extract and normalize
//! its stream cards, concatenate in branch priority order, deduplicate
//! by URL, and persist the snapshot. Branch failures are isolated; only
//! configuration and snapshot-write errors abort a run.

pub mod config;
pub mod dedup;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod snapshot;
pub mod types;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use scraper::Html;

use crate::talents::TalentIndex;
use config::CrawlConfig;
use types::{Branch, PageFetcher, Snapshot, StreamRecord};

/// Scrape one branch page into normalized records, in document order.
pub fn scrape_branch(
    html: &str,
    branch_id: &str,
    index: &TalentIndex,
    now: DateTime<FixedOffset>,
) -> Vec<StreamRecord> {
    let doc = Html::parse_document(html);
    extract::extract_cards(&doc)
        .into_iter()
        .filter_map(|(date, element)| normalize::normalize_card(&date, element, branch_id, index, now))
        .collect()
}

/// Fetch and scrape all branches, then merge cross-posted records.
///
/// Branches are visited sequentially in their declared priority order;
/// a failed fetch contributes zero records and never aborts the run.
pub async fn run_once(
    fetcher: &dyn PageFetcher,
    branches: &[Branch],
    index: &TalentIndex,
    now: DateTime<FixedOffset>,
) -> Vec<StreamRecord> {
    let mut all = Vec::new();
    for branch in branches {
        let html = match fetcher.fetch(&branch.url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = ?e, branch = %branch.id, "branch fetch failed, skipping");
                continue;
            }
        };
        let records = scrape_branch(&html, &branch.id, index, now);
        tracing::info!(branch = %branch.id, records = records.len(), "branch scraped");
        all.extend(records);
    }
    dedup::dedup_streams(all)
}

/// Full pipeline run against a loaded configuration: scrape, dedup,
/// and atomically replace the snapshot artifact.
pub async fn crawl_and_publish(
    cfg: &CrawlConfig,
    fetcher: &dyn PageFetcher,
    index: &TalentIndex,
) -> Result<Snapshot> {
    let now_utc = Utc::now();
    let now = now_utc.with_timezone(&normalize::home_offset());

    let streams = run_once(fetcher, &cfg.branches, index, now).await;
    let snap = Snapshot {
        updated_at: now_utc,
        streams,
    };
    snapshot::write_snapshot(&cfg.output_path, &snap)?;
    tracing::info!(
        streams = snap.streams.len(),
        path = %cfg.output_path.display(),
        "snapshot published"
    );
    Ok(snap)
}
