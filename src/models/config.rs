//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Name of the environment variable that overrides `[feed].subreddit`.
pub const SUBREDDIT_ENV: &str = "SUBREDDIT";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Feed source settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Archive service submission settings
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Per-run behavior settings
    #[serde(default)]
    pub run: RunConfig,

    /// Persistent state settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    /// Apply environment variable overrides (currently only `SUBREDDIT`).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var(SUBREDDIT_ENV) {
            if !name.trim().is_empty() {
                self.feed.subreddit = name.trim().to_string();
            }
        }
    }

    /// Validate configuration values for basic sanity.
    ///
    /// Runs once at startup, before any network activity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.subreddit.trim().is_empty() {
            return Err(AppError::validation(
                "feed.subreddit is empty (set it in config or via SUBREDDIT)",
            ));
        }
        let pattern = regex::Regex::new(r"^[A-Za-z0-9_]{3,21}$")
            .map_err(|e| AppError::validation(format!("subreddit pattern: {e}")))?;
        if !pattern.is_match(&self.feed.subreddit) {
            return Err(AppError::validation(format!(
                "feed.subreddit '{}' is not a valid subreddit name",
                self.feed.subreddit
            )));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.archive.timeout_secs == 0 {
            return Err(AppError::validation("archive.timeout_secs must be > 0"));
        }
        if self.archive.max_retries == 0 {
            return Err(AppError::validation("archive.max_retries must be > 0"));
        }
        if self.archive.retryable_status_codes.is_empty() {
            return Err(AppError::validation(
                "archive.retryable_status_codes is empty",
            ));
        }
        if self.run.max_posts_per_run == 0 {
            return Err(AppError::validation("run.max_posts_per_run must be > 0"));
        }
        if self.run.failure_threshold == 0 {
            return Err(AppError::validation("run.failure_threshold must be > 0"));
        }
        if self.storage.max_seen_entries == 0 {
            return Err(AppError::validation("storage.max_seen_entries must be > 0"));
        }
        Ok(())
    }

    /// URL of the subreddit's Atom feed.
    pub fn feed_url(&self) -> String {
        format!("https://www.reddit.com/r/{}/new/.rss", self.feed.subreddit)
    }
}

/// Feed source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Subreddit whose new-posts feed is archived
    #[serde(default)]
    pub subreddit: String,

    /// Feed request timeout in seconds
    #[serde(default = "defaults::feed_timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            subreddit: String::new(),
            timeout_secs: defaults::feed_timeout(),
        }
    }
}

/// HTTP client settings shared by the feed and all archive services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for outbound requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
        }
    }
}

/// Archive service submission and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Per-submission request timeout in seconds (archiving services are slow)
    #[serde(default = "defaults::archive_timeout")]
    pub timeout_secs: u64,

    /// Maximum attempts per adapter invocation
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Exponential backoff base in seconds
    #[serde(default = "defaults::backoff_base")]
    pub backoff_base_secs: u64,

    /// Upper bound of the uniform jitter added to each backoff wait
    #[serde(default = "defaults::backoff_jitter")]
    pub backoff_jitter_secs: u64,

    /// Cap on any single backoff wait in seconds
    #[serde(default = "defaults::backoff_cap")]
    pub backoff_cap_secs: u64,

    /// Status codes worth retrying within one adapter
    #[serde(default = "defaults::retryable_status_codes")]
    pub retryable_status_codes: Vec<u16>,

    /// Pause between adapters in the fallback chain, in seconds
    #[serde(default = "defaults::chain_cooldown")]
    pub chain_cooldown_secs: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::archive_timeout(),
            max_retries: defaults::max_retries(),
            backoff_base_secs: defaults::backoff_base(),
            backoff_jitter_secs: defaults::backoff_jitter(),
            backoff_cap_secs: defaults::backoff_cap(),
            retryable_status_codes: defaults::retryable_status_codes(),
            chain_cooldown_secs: defaults::chain_cooldown(),
        }
    }
}

impl ArchiveConfig {
    /// Whether a status code should be retried within one adapter.
    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }
}

/// Per-run behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum entries attempted per run; the rest wait for the next run
    #[serde(default = "defaults::max_posts_per_run")]
    pub max_posts_per_run: usize,

    /// Consecutive all-service failures before the circuit breaker opens
    #[serde(default = "defaults::failure_threshold")]
    pub failure_threshold: u32,

    /// Politeness pause between processed entries, in seconds
    #[serde(default = "defaults::politeness")]
    pub politeness_secs: u64,

    /// Upper bound of the uniform jitter added to the politeness pause
    #[serde(default = "defaults::politeness_jitter")]
    pub politeness_jitter_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_posts_per_run: defaults::max_posts_per_run(),
            failure_threshold: defaults::failure_threshold(),
            politeness_secs: defaults::politeness(),
            politeness_jitter_secs: defaults::politeness_jitter(),
        }
    }
}

/// Persistent state settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding seen.txt and failed.txt
    #[serde(default = "defaults::data_dir")]
    pub data_dir: PathBuf,

    /// Ledger size cap; oldest lines are dropped beyond this
    #[serde(default = "defaults::max_seen_entries")]
    pub max_seen_entries: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
            max_seen_entries: defaults::max_seen_entries(),
        }
    }
}

impl StorageConfig {
    /// Path of the dedup ledger file.
    pub fn seen_path(&self) -> PathBuf {
        self.data_dir.join("seen.txt")
    }

    /// Path of the advisory failure log file.
    pub fn failed_path(&self) -> PathBuf {
        self.data_dir.join("failed.txt")
    }
}

mod defaults {
    use std::path::PathBuf;

    // Feed defaults
    pub fn feed_timeout() -> u64 {
        20
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; FeedArchiver/1.0; +https://github.com/)".into()
    }

    // Archive defaults (tuned for the slow Wayback save endpoint)
    pub fn archive_timeout() -> u64 {
        90
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn backoff_base() -> u64 {
        10
    }
    pub fn backoff_jitter() -> u64 {
        5
    }
    pub fn backoff_cap() -> u64 {
        120
    }
    pub fn retryable_status_codes() -> Vec<u16> {
        vec![429, 500, 502, 503, 504]
    }
    pub fn chain_cooldown() -> u64 {
        5
    }

    // Run defaults
    pub fn max_posts_per_run() -> usize {
        25
    }
    pub fn failure_threshold() -> u32 {
        5
    }
    pub fn politeness() -> u64 {
        12
    }
    pub fn politeness_jitter() -> u64 {
        3
    }

    // Storage defaults
    pub fn data_dir() -> PathBuf {
        PathBuf::from("data")
    }
    pub fn max_seen_entries() -> usize {
        10_000
    }
}
