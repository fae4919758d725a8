// src/pipeline/run.rs

//! Archiver run controller.
//!
//! One run: fetch the feed, walk its entries in order, push each unseen
//! URL through the fallback chain, and record the outcome. Stops early on
//! the per-run quota or an open circuit breaker; both are normal
//! completions. Only configuration and feed failures are fatal.

use std::time::Duration;

use rand::Rng;

use crate::error::Result;
use crate::models::{Config, FailureRecord, FeedEntry, RunOutcome, RunReport, RunStats, SeenRecord};
use crate::pipeline::chain::ArchiveChain;
use crate::pipeline::circuit_breaker::CircuitBreaker;
use crate::services::FeedFetcher;
use crate::storage::{FailureLog, Ledger};
use crate::utils::{http, url};

/// Run the archiver once, end to end.
pub async fn run_archiver(config: &Config) -> Result<RunReport> {
    log::info!("Starting archiver for r/{}", config.feed.subreddit);

    let client = http::create_client(&config.http)?;

    log::info!("Fetching feed: {}", config.feed_url());
    let fetcher = FeedFetcher::new(client.clone(), config);
    let entries = fetcher.fetch().await?;

    if entries.is_empty() {
        log::info!("No posts found in feed. Nothing to archive.");
        return Ok(RunReport {
            stats: RunStats::default(),
            outcome: RunOutcome::Completed,
        });
    }
    log::info!("Found {} posts in feed", entries.len());

    let mut ledger = Ledger::load(config.storage.seen_path(), config.storage.max_seen_entries).await;
    log::info!("Loaded {} previously archived URLs", ledger.len());

    let failures = FailureLog::new(config.storage.failed_path());
    let chain = ArchiveChain::from_config(config, &client);

    process_entries(config, &entries, &chain, &mut ledger, &failures).await
}

/// Walk the feed entries and drive the fallback chain for each unseen URL.
///
/// Separated from [`run_archiver`] so tests can inject a scripted chain
/// and a temp-dir ledger.
pub async fn process_entries(
    config: &Config,
    entries: &[FeedEntry],
    chain: &ArchiveChain,
    ledger: &mut Ledger,
    failures: &FailureLog,
) -> Result<RunReport> {
    let mut stats = RunStats::default();
    let mut breaker = CircuitBreaker::with_threshold(config.run.failure_threshold);
    let mut outcome = RunOutcome::Completed;

    for entry in entries {
        let canonical = url::canonicalize(&entry.url);

        if ledger.contains(&canonical) {
            stats.skipped += 1;
            continue;
        }

        if stats.processed >= config.run.max_posts_per_run {
            log::info!(
                "Per-run quota of {} reached; deferring remaining entries",
                config.run.max_posts_per_run
            );
            break;
        }

        if breaker.is_open() {
            log::warn!(
                "Circuit breaker open after {} consecutive failures; stopping early",
                breaker.consecutive_failures()
            );
            outcome = RunOutcome::CircuitBreakerStop;
            break;
        }

        log::info!("Processing: {}", canonical);
        stats.processed += 1;

        let result = chain.archive(&canonical).await;
        if result.success {
            let service = result.service.unwrap_or("unknown");
            let archived_url = result.archived_url.unwrap_or_default();
            log::info!("Archived via {}: {}", service, archived_url);

            // Durable before moving on; a crash after this point cannot
            // lose the dedup entry
            ledger
                .record(&SeenRecord::new(&canonical, archived_url, service))
                .await?;
            breaker.record_success();
            stats.archived += 1;
        } else {
            let count = breaker.record_failure();
            log::warn!(
                "All services failed for {} ({}); consecutive failures: {}",
                canonical,
                result.diagnostics,
                count
            );
            failures
                .record(&FailureRecord::new(&canonical, &result.diagnostics))
                .await;
            stats.failed += 1;
        }

        politeness_sleep(config).await;
    }

    log::info!("Run finished");
    log::info!("    archived: {}", stats.archived);
    log::info!("    failed:   {}", stats.failed);
    log::info!("    skipped:  {}", stats.skipped);
    log::info!("    ledger:   {} URLs", ledger.len());

    Ok(RunReport { stats, outcome })
}

/// Pause between entries regardless of outcome, with jitter, to bound the
/// outbound request rate.
async fn politeness_sleep(config: &Config) {
    let jitter = if config.run.politeness_jitter_secs > 0 {
        rand::thread_rng().gen_range(0.0..config.run.politeness_jitter_secs as f64)
    } else {
        0.0
    };
    let wait = config.run.politeness_secs as f64 + jitter;
    if wait > 0.0 {
        tokio::time::sleep(Duration::from_secs_f64(wait)).await;
    }
}
