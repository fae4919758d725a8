// src/services/wayback.rs

//! Wayback Machine (web.archive.org) adapter.
//!
//! Primary service in the chain. The save endpoint is slow and aggressively
//! rate-limited, hence the long per-request timeout and internal retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::models::{ArchiveConfig, AttemptResult};
use crate::services::{classify_status, describe_transport_error, submit_with_retry, ArchiveService};

const TAG: &str = "wayback";
const SAVE_ENDPOINT: &str = "https://web.archive.org/save/";
const REPLAY_ENDPOINT: &str = "https://web.archive.org/web/";

pub struct Wayback {
    client: Client,
    config: ArchiveConfig,
}

impl Wayback {
    pub fn new(client: Client, config: ArchiveConfig) -> Self {
        Self { client, config }
    }

    /// One save request. The Wayback Machine takes the target URL as a
    /// path segment; no transform is needed, the canonical URL archives fine.
    async fn attempt(&self, url: &str) -> AttemptResult {
        let save_url = format!("{SAVE_ENDPOINT}{url}");
        let response = match self
            .client
            .get(&save_url)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => return AttemptResult::Error(describe_transport_error(&error)),
        };

        match response.status().as_u16() {
            200 => AttemptResult::Success {
                archived_url: format!("{REPLAY_ENDPOINT}{url}"),
                service: TAG,
            },
            status => classify_status(&self.config, status),
        }
    }
}

#[async_trait]
impl ArchiveService for Wayback {
    fn tag(&self) -> &'static str {
        TAG
    }

    async fn submit(&self, url: &str) -> AttemptResult {
        submit_with_retry(&self.config, TAG, || self.attempt(url)).await
    }
}
