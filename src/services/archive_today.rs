// src/services/archive_today.rs

//! archive.today (archive.ph) adapter.
//!
//! Submits through the old.reddit.com mirror: the service snapshots the
//! rendered page, and new reddit is a JavaScript shell that archives as a
//! blank page. The ledger still stores the canonical URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::models::{ArchiveConfig, AttemptResult};
use crate::services::{classify_status, describe_transport_error, submit_with_retry, ArchiveService};
use crate::utils::url::{from_old_reddit, to_old_reddit};

const TAG: &str = "archive_today";
const SUBMIT_ENDPOINT: &str = "https://archive.ph/submit/";

pub struct ArchiveToday {
    client: Client,
    config: ArchiveConfig,
}

impl ArchiveToday {
    pub fn new(client: Client, config: ArchiveConfig) -> Self {
        Self { client, config }
    }

    async fn attempt(&self, url: &str) -> AttemptResult {
        let mirror_url = to_old_reddit(url);
        let response = match self
            .client
            .get(SUBMIT_ENDPOINT)
            .query(&[("url", mirror_url.as_str())])
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => return AttemptResult::Error(describe_transport_error(&error)),
        };

        match response.status().as_u16() {
            200 => AttemptResult::Success {
                archived_url: Self::archived_url(&response, &mirror_url),
                service: TAG,
            },
            status => classify_status(&self.config, status),
        }
    }

    /// A successful submit redirects to the snapshot page; if the final
    /// URL is still the submit endpoint, fall back to the newest-snapshot
    /// lookup instead.
    fn archived_url(response: &reqwest::Response, mirror_url: &str) -> String {
        let final_url = response.url().as_str();
        if final_url.starts_with(SUBMIT_ENDPOINT) {
            newest_snapshot_url(mirror_url)
        } else {
            final_url.to_string()
        }
    }
}

/// Newest-snapshot lookup for a submitted URL. The submission went out on
/// the mirror host, so the reverse transform recovers the canonical URL
/// before building the lookup.
fn newest_snapshot_url(mirror_url: &str) -> String {
    format!("https://archive.ph/newest/{}", from_old_reddit(mirror_url))
}

#[async_trait]
impl ArchiveService for ArchiveToday {
    fn tag(&self) -> &'static str {
        TAG
    }

    async fn submit(&self, url: &str) -> AttemptResult {
        submit_with_retry(&self.config, TAG, || self.attempt(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_snapshot_lookup_recovers_canonical_url() {
        let mirror = to_old_reddit("https://www.reddit.com/r/rust/comments/abc/post/");
        assert_eq!(
            newest_snapshot_url(&mirror),
            "https://archive.ph/newest/https://www.reddit.com/r/rust/comments/abc/post/"
        );
    }

    #[test]
    fn newest_snapshot_lookup_passes_non_reddit_urls_through() {
        assert_eq!(
            newest_snapshot_url("https://example.com/page"),
            "https://archive.ph/newest/https://example.com/page"
        );
    }
}
