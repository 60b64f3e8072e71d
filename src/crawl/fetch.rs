// src/crawl/fetch.rs
//! HTTP page fetching. One client for the whole run, a bounded
//! per-request timeout, and non-success statuses surfaced as errors so
//! the pipeline can treat them like any other branch failure.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::crawl::types::PageFetcher;

const USER_AGENT: &str = concat!("holodule-crawler/", env!("CARGO_PKG_VERSION"));

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetching {url}"))?
            .error_for_status()
            .with_context(|| format!("non-success status from {url}"))?;
        response
            .text()
            .await
            .with_context(|| format!("reading body from {url}"))
    }
}
