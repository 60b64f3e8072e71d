// src/crawl/dedup.rs
//! Cross-source deduplication. One physical stream can appear both on a
//! branch-specific page and on the catch-all page; records are merged by
//! URL with branch-specific attribution winning the tie.

use std::collections::HashSet;

use crate::crawl::types::{StreamRecord, CATCH_ALL_BRANCH};

/// Merge records sharing a URL. Catch-all records are stable-sorted
/// behind everything else, then the first record per URL wins, so a
/// specific branch's attribution always beats the catch-all's and
/// otherwise the original endpoint order decides.
pub fn dedup_streams(mut streams: Vec<StreamRecord>) -> Vec<StreamRecord> {
    streams.sort_by_key(|s| s.group_id == CATCH_ALL_BRANCH);

    let mut seen: HashSet<String> = HashSet::with_capacity(streams.len());
    streams.retain(|s| seen.insert(s.url.clone()));
    streams
}
