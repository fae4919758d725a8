// src/pipeline/chain.rs

//! Sequential fallback over the configured archive services.
//!
//! Deliberately not parallel: archiving services throttle by origin IP,
//! and racing them from one host mostly produces correlated 429s. A short
//! cooldown between adapters softens that further.

use std::time::Duration;

use crate::models::{ArchiveConfig, AttemptResult, ChainOutcome, Config};
use crate::services::{ArchiveService, ArchiveToday, Ghostarchive, Wayback};

/// Ordered chain of archive services, tried until one succeeds.
pub struct ArchiveChain {
    services: Vec<Box<dyn ArchiveService>>,
    cooldown: Duration,
}

impl ArchiveChain {
    pub fn new(services: Vec<Box<dyn ArchiveService>>, cooldown: Duration) -> Self {
        Self { services, cooldown }
    }

    /// Build the default priority chain: Wayback first (canonical snapshot
    /// host), then archive.today, then Ghostarchive.
    pub fn from_config(config: &Config, client: &reqwest::Client) -> Self {
        let archive: &ArchiveConfig = &config.archive;
        let services: Vec<Box<dyn ArchiveService>> = vec![
            Box::new(Wayback::new(client.clone(), archive.clone())),
            Box::new(ArchiveToday::new(client.clone(), archive.clone())),
            Box::new(Ghostarchive::new(client.clone(), archive.clone())),
        ];
        Self::new(services, Duration::from_secs(archive.chain_cooldown_secs))
    }

    /// Try each service in priority order; first success wins.
    ///
    /// On exhaustion the outcome carries one `tag:status` token per
    /// adapter, pipe-delimited, for the failure log.
    pub async fn archive(&self, url: &str) -> ChainOutcome {
        let mut diagnostics: Vec<String> = Vec::new();

        for (position, service) in self.services.iter().enumerate() {
            // Cooldown between adapters, not between retries within one
            if position > 0 && !self.cooldown.is_zero() {
                tokio::time::sleep(self.cooldown).await;
            }

            match service.submit(url).await {
                AttemptResult::Success {
                    archived_url,
                    service: tag,
                } => {
                    return ChainOutcome {
                        success: true,
                        service: Some(tag),
                        archived_url: Some(archived_url),
                        diagnostics: diagnostics.join("|"),
                    };
                }
                failure => {
                    log::warn!(
                        "{} failed for {}: {}",
                        service.tag(),
                        url,
                        failure.status_label()
                    );
                    diagnostics.push(format!("{}:{}", service.tag(), failure.status_label()));
                }
            }
        }

        ChainOutcome {
            success: false,
            service: None,
            archived_url: None,
            diagnostics: diagnostics.join("|"),
        }
    }
}
