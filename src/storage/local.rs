//! File-backed dedup ledger and failure log.
//!
//! Reads fail open: an unreadable ledger is treated as empty so a corrupt
//! or missing file never blocks a run. The cost is a possible duplicate
//! archive submission, which the services tolerate.
//!
//! Single-threaded access assumed; runs are scheduled non-overlapping.

use std::collections::HashSet;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{FailureRecord, SeenRecord};

/// Durable set of canonical URLs already archived.
pub struct Ledger {
    path: PathBuf,
    seen: HashSet<String>,
}

impl Ledger {
    /// Load the ledger from disk, trimming it to `max_entries` lines
    /// (most recent kept) when it has grown past the cap.
    ///
    /// Any read error yields an empty ledger.
    pub async fn load(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        let path = path.into();

        let mut lines: Vec<String> = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!(
                    "Ledger read failed from {}: {}. Treating as empty.",
                    path.display(),
                    e
                );
                Vec::new()
            }
        };

        if lines.len() > max_entries {
            log::info!(
                "Trimming ledger from {} to {} entries",
                lines.len(),
                max_entries
            );
            lines.drain(..lines.len() - max_entries);
            if let Err(e) = Self::rewrite(&path, &lines).await {
                log::warn!("Ledger trim rewrite failed: {}. Continuing in memory.", e);
            }
        }

        let seen = lines
            .iter()
            .filter_map(|line| SeenRecord::url_from_line(line))
            .map(str::to_string)
            .collect();

        Self { path, seen }
    }

    /// Exact-match membership check against the canonical URL.
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Append one record and make it durable before returning.
    pub async fn record(&mut self, record: &SeenRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", record.to_line()).as_bytes())
            .await?;
        file.flush().await?;
        file.sync_all().await?;

        self.seen.insert(record.url.clone());
        Ok(())
    }

    /// Rewrite the whole file atomically (write to temp, then rename).
    async fn rewrite(path: &PathBuf, lines: &[String]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        for line in lines {
            file.write_all(format!("{line}\n").as_bytes()).await?;
        }
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Append-only log of URLs every service failed for. Advisory: errors
/// while writing it are logged, never fatal.
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Record one failed URL.
    pub async fn record(&self, record: &FailureRecord) {
        if let Err(e) = self.append(record).await {
            log::warn!(
                "Failure log append failed for {}: {}",
                self.path.display(),
                e
            );
        }
    }

    /// Number of recorded failures (missing file counts as zero).
    pub async fn count(&self) -> usize {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content.lines().filter(|l| !l.trim().is_empty()).count(),
            Err(_) => 0,
        }
    }

    async fn append(&self, record: &FailureRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", record.to_line()).as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn record_then_contains() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen.txt");

        let mut ledger = Ledger::load(&path, 100).await;
        assert!(ledger.is_empty());

        let record = SeenRecord::new(
            "https://www.reddit.com/r/rust/comments/abc/post/",
            "https://web.archive.org/web/https://www.reddit.com/r/rust/comments/abc/post/",
            "wayback",
        );
        ledger.record(&record).await.unwrap();

        assert!(ledger.contains("https://www.reddit.com/r/rust/comments/abc/post/"));
        assert!(!ledger.contains("https://www.reddit.com/r/rust/comments/xyz/other/"));

        // Reloaded ledger sees the same record
        let reloaded = Ledger::load(&path, 100).await;
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains("https://www.reddit.com/r/rust/comments/abc/post/"));
    }

    #[tokio::test]
    async fn missing_file_is_empty_ledger() {
        let tmp = TempDir::new().unwrap();
        let ledger = Ledger::load(tmp.path().join("nope.txt"), 100).await;
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn legacy_lines_still_parse() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen.txt");
        tokio::fs::write(
            &path,
            "https://example.com/bare\n2024-01-01 00:00:00|https://example.com/two-field\n",
        )
        .await
        .unwrap();

        let ledger = Ledger::load(&path, 100).await;
        assert!(ledger.contains("https://example.com/bare"));
        assert!(ledger.contains("https://example.com/two-field"));
    }

    #[tokio::test]
    async fn oversized_ledger_is_trimmed_to_recent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("seen.txt");

        let lines: String = (0..10)
            .map(|i| format!("2024-01-01 00:00:00|https://example.com/{i}\n"))
            .collect();
        tokio::fs::write(&path, lines).await.unwrap();

        let ledger = Ledger::load(&path, 4).await;
        assert_eq!(ledger.len(), 4);
        assert!(!ledger.contains("https://example.com/0"));
        assert!(ledger.contains("https://example.com/9"));

        // The file itself was rewritten, not just the in-memory set
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(content.contains("https://example.com/6"));
        assert!(!content.contains("https://example.com/5\n"));
    }

    #[tokio::test]
    async fn failure_log_appends_and_counts() {
        let tmp = TempDir::new().unwrap();
        let log = FailureLog::new(tmp.path().join("failed.txt"));
        assert_eq!(log.count().await, 0);

        log.record(&FailureRecord::new("https://example.com/a", "wayback:429"))
            .await;
        log.record(&FailureRecord::new("https://example.com/b", "wayback:523"))
            .await;

        assert_eq!(log.count().await, 2);
    }
}
