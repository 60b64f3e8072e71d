// src/crawl/config.rs
//! Crawler configuration. Loaded from TOML via env var override with a
//! well-known fallback path; everything has defaults matching the
//! production schedule site, so the file is optional.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::crawl::types::Branch;

const ENV_PATH: &str = "CRAWL_CONFIG_PATH";
const DEFAULT_PATH: &str = "config/crawl.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CrawlConfig {
    /// Branch endpoints in priority order. Order matters: it feeds the
    /// deduplicator's first-seen tie-break, and the catch-all page
    /// belongs last.
    #[serde(default = "default_branches")]
    pub branches: Vec<Branch>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_talents_path")]
    pub talents_path: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            branches: default_branches(),
            timeout_secs: default_timeout_secs(),
            output_path: default_output_path(),
            talents_path: default_talents_path(),
        }
    }
}

fn default_branches() -> Vec<Branch> {
    vec![
        Branch::new("hololive_jp", "https://schedule.hololive.tv/lives/hololive"),
        Branch::new("hololive_en", "https://schedule.hololive.tv/lives/english"),
        Branch::new("hololive_id", "https://schedule.hololive.tv/lives/indonesia"),
        Branch::new("holostars_jp", "https://schedule.hololive.tv/lives/holostars"),
        Branch::new(
            "holostars_en",
            "https://schedule.hololive.tv/lives/holostars_english",
        ),
        Branch::new("dev_is", "https://schedule.hololive.tv/lives/dev_is"),
        Branch::new("official", "https://schedule.hololive.tv/lives/official"),
        Branch::new("other", "https://schedule.hololive.tv/lives/all"),
    ]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_path() -> PathBuf {
    PathBuf::from("public/schedule.json")
}

fn default_talents_path() -> PathBuf {
    PathBuf::from("data/talents.json")
}

pub fn load_config_from(path: &Path) -> Result<CrawlConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading crawl config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing crawl config {}", path.display()))
}

/// Load config using env var + fallbacks:
/// 1) $CRAWL_CONFIG_PATH (must exist when set)
/// 2) config/crawl.toml
/// 3) built-in defaults
pub fn load_config_default() -> Result<CrawlConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("CRAWL_CONFIG_PATH points to non-existent path"));
        }
        return load_config_from(&pb);
    }
    let fallback = PathBuf::from(DEFAULT_PATH);
    if fallback.exists() {
        return load_config_from(&fallback);
    }
    Ok(CrawlConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn defaults_cover_all_production_branches() {
        let cfg = CrawlConfig::default();
        assert_eq!(cfg.branches.len(), 8);
        assert_eq!(cfg.branches.last().unwrap().id, "other");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: CrawlConfig = toml::from_str(
            r#"
            timeout_secs = 5

            [[branches]]
            id = "hololive_jp"
            url = "https://example.test/lives/hololive"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.branches.len(), 1);
        assert_eq!(cfg.output_path, PathBuf::from("public/schedule.json"));
    }

    #[serial_test::serial]
    #[test]
    fn env_path_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawl.toml");
        fs::write(&path, "timeout_secs = 7\n").unwrap();

        env::set_var(ENV_PATH, path.display().to_string());
        let cfg = load_config_default().unwrap();
        env::remove_var(ENV_PATH);

        assert_eq!(cfg.timeout_secs, 7);
    }

    #[serial_test::serial]
    #[test]
    fn missing_env_path_is_an_error() {
        env::set_var(ENV_PATH, "/definitely/not/here.toml");
        assert!(load_config_default().is_err());
        env::remove_var(ENV_PATH);
    }
}
