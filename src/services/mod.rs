// src/services/mod.rs

//! External service integrations: the feed source and one adapter per
//! archiving service.
//!
//! Adapters are polymorphic over [`ArchiveService`]; the fallback chain
//! never branches on a concrete service type. Adding a service means
//! adding an implementation here.

pub mod archive_today;
pub mod feed;
pub mod ghostarchive;
pub mod wayback;

pub use archive_today::ArchiveToday;
pub use feed::FeedFetcher;
pub use ghostarchive::Ghostarchive;
pub use wayback::Wayback;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::models::{ArchiveConfig, AttemptResult};

/// One external archiving service.
#[async_trait]
pub trait ArchiveService: Send + Sync {
    /// Short identifier used in diagnostics and ledger records.
    fn tag(&self) -> &'static str;

    /// Submit a canonical URL for archiving. Retries internally on
    /// transient outcomes; the returned result is final for this adapter.
    async fn submit(&self, url: &str) -> AttemptResult;
}

/// Classify a non-200 response status.
pub(crate) fn classify_status(config: &ArchiveConfig, status: u16) -> AttemptResult {
    if config.is_retryable(status) {
        AttemptResult::Retryable(status)
    } else {
        // Includes origin-side 52x: retrying locally will not fix those,
        // so the chain advances to the next service immediately.
        AttemptResult::Permanent(status)
    }
}

/// Short description of a transport failure, truncated for log hygiene.
pub(crate) fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return "timeout".to_string();
    }
    let message = error.to_string();
    if message.chars().count() > 100 {
        let truncated: String = message.chars().take(100).collect();
        format!("{truncated}...")
    } else {
        message
    }
}

/// Run `attempt` up to `max_retries` times, sleeping with exponential
/// backoff plus jitter after each transient outcome.
///
/// `Success` and `Permanent` return immediately; the final attempt's
/// outcome is returned verbatim with no further retry.
pub(crate) async fn submit_with_retry<F, Fut>(
    config: &ArchiveConfig,
    tag: &'static str,
    attempt_fn: F,
) -> AttemptResult
where
    F: Fn() -> Fut,
    Fut: Future<Output = AttemptResult> + Send,
{
    let mut last = AttemptResult::Error("no attempts made".to_string());
    for attempt in 0..config.max_retries {
        let result = attempt_fn().await;
        match &result {
            AttemptResult::Success { .. } | AttemptResult::Permanent(_) => return result,
            AttemptResult::Retryable(code) => {
                if attempt + 1 < config.max_retries {
                    let wait = backoff_wait(config, attempt);
                    log::info!(
                        "{}: status {}, waiting {:.1}s before retry {}/{}",
                        tag,
                        code,
                        wait.as_secs_f64(),
                        attempt + 2,
                        config.max_retries
                    );
                    tokio::time::sleep(wait).await;
                }
            }
            AttemptResult::Error(message) => {
                if attempt + 1 < config.max_retries {
                    let wait = backoff_wait(config, attempt);
                    log::warn!(
                        "{}: {}, waiting {:.1}s before retry {}/{}",
                        tag,
                        message,
                        wait.as_secs_f64(),
                        attempt + 2,
                        config.max_retries
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
        last = result;
    }
    last
}

/// Backoff wait for the given zero-based attempt:
/// `base * 2^attempt + uniform(0, jitter)`, capped.
fn backoff_wait(config: &ArchiveConfig, attempt: u32) -> Duration {
    let base = config
        .backoff_base_secs
        .saturating_mul(1u64 << attempt.min(16));
    let jitter = if config.backoff_jitter_secs > 0 {
        rand::thread_rng().gen_range(0.0..config.backoff_jitter_secs as f64)
    } else {
        0.0
    };
    let wait = (base as f64 + jitter).min(config.backoff_cap_secs as f64);
    Duration::from_secs_f64(wait)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_retries: u32) -> ArchiveConfig {
        ArchiveConfig {
            max_retries,
            backoff_base_secs: 0,
            backoff_jitter_secs: 0,
            backoff_cap_secs: 0,
            ..ArchiveConfig::default()
        }
    }

    #[test]
    fn classify_respects_configured_codes() {
        let config = ArchiveConfig::default();
        assert_eq!(classify_status(&config, 429), AttemptResult::Retryable(429));
        assert_eq!(classify_status(&config, 503), AttemptResult::Retryable(503));
        assert_eq!(classify_status(&config, 404), AttemptResult::Permanent(404));
        assert_eq!(classify_status(&config, 523), AttemptResult::Permanent(523));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let config = ArchiveConfig {
            backoff_base_secs: 10,
            backoff_jitter_secs: 0,
            backoff_cap_secs: 25,
            ..ArchiveConfig::default()
        };
        assert_eq!(backoff_wait(&config, 0), Duration::from_secs(10));
        assert_eq!(backoff_wait(&config, 1), Duration::from_secs(20));
        assert_eq!(backoff_wait(&config, 2), Duration::from_secs(25)); // capped
    }

    #[tokio::test]
    async fn retry_stops_on_permanent() {
        let calls = AtomicU32::new(0);
        let result = submit_with_retry(&fast_config(3), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { AttemptResult::Permanent(404) }
        })
        .await;

        assert_eq!(result, AttemptResult::Permanent(404));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_exhausts_on_retryable() {
        let calls = AtomicU32::new(0);
        let result = submit_with_retry(&fast_config(3), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { AttemptResult::Retryable(429) }
        })
        .await;

        assert_eq!(result, AttemptResult::Retryable(429));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_returns_first_success() {
        let calls = AtomicU32::new(0);
        let result = submit_with_retry(&fast_config(3), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    AttemptResult::Retryable(429)
                } else {
                    AttemptResult::Success {
                        archived_url: "https://archive.example/1".to_string(),
                        service: "test",
                    }
                }
            }
        })
        .await;

        assert!(result.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
