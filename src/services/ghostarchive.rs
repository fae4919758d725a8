// src/services/ghostarchive.rs

//! Ghostarchive (ghostarchive.org) adapter: last resort in the chain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::models::{ArchiveConfig, AttemptResult};
use crate::services::{classify_status, describe_transport_error, submit_with_retry, ArchiveService};

const TAG: &str = "ghostarchive";
const SUBMIT_ENDPOINT: &str = "https://ghostarchive.org/archive2";

pub struct Ghostarchive {
    client: Client,
    config: ArchiveConfig,
}

impl Ghostarchive {
    pub fn new(client: Client, config: ArchiveConfig) -> Self {
        Self { client, config }
    }

    /// One submission: the target URL goes in an `archive` form field.
    /// A successful submit redirects to the snapshot; otherwise keep the
    /// final response URL as the best available pointer.
    async fn attempt(&self, url: &str) -> AttemptResult {
        let response = match self
            .client
            .post(SUBMIT_ENDPOINT)
            .form(&[("archive", url)])
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => return AttemptResult::Error(describe_transport_error(&error)),
        };

        match response.status().as_u16() {
            200 => AttemptResult::Success {
                archived_url: response.url().to_string(),
                service: TAG,
            },
            status => classify_status(&self.config, status),
        }
    }
}

#[async_trait]
impl ArchiveService for Ghostarchive {
    fn tag(&self) -> &'static str {
        TAG
    }

    async fn submit(&self, url: &str) -> AttemptResult {
        submit_with_retry(&self.config, TAG, || self.attempt(url)).await
    }
}
