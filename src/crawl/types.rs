// src/crawl/types.rs
use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Branch id of the catch-all "all lives" page, which cross-posts streams
/// already attributed to a specific branch. The deduplicator demotes
/// records carrying this id.
pub const CATCH_ALL_BRANCH: &str = "other";

/// One schedule endpoint: a branch page on the source site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    pub id: String,
    pub url: String,
}

impl Branch {
    pub fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
        }
    }
}

/// One normalized stream, the unit of the published feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreamRecord {
    /// Resolved talent id, or `talents::UNKNOWN_TALENT_ID`.
    pub talent_id: String,
    /// Resolved display name, or the raw scraped text if unresolved.
    pub talent_name: String,
    /// The matched talent's sub-group, or the source branch id as fallback.
    /// Always populated so every record is filterable by branch.
    pub group_id: String,
    /// Minute-precision start time carrying the site's home offset (+09:00).
    pub start_time: DateTime<FixedOffset>,
    /// Canonical stream page URL; non-empty, and the dedup key.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub is_live: bool,
}

/// One complete pipeline output. Fully replaces the previous snapshot;
/// no history is retained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub updated_at: DateTime<Utc>,
    pub streams: Vec<StreamRecord>,
}

/// Seam between the pipeline and the network, so tests can feed fixture
/// HTML through the same code path as production fetches.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Retrieve the raw HTML of one branch page.
    async fn fetch(&self, url: &str) -> Result<String>;
}
