// src/crawl/snapshot.rs
//! Snapshot persistence. The feed is a single JSON file that readers
//! poll, so the write must be atomic: temp file in the same directory,
//! then rename. A crash mid-write leaves the previous snapshot intact.

use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::crawl::types::Snapshot;

pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("serializing snapshot")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating snapshot directory {}", parent.display()))?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("snapshot path {} has no file name", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, json)
        .with_context(|| format!("writing snapshot temp file {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("renaming snapshot into place at {}", path.display()))?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing snapshot {}", path.display()))
}
