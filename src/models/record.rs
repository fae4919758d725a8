//! Persisted record formats for the ledger and the failure log.
//!
//! Both files are append-only, pipe-delimited text logs: one complete
//! record per line. The ledger format has grown over time, so parsing
//! accepts the older layouts still found in deployed files.

use chrono::{DateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One successfully archived URL.
///
/// Current line layout: `timestamp|url|service|archived_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRecord {
    /// Canonical post URL (the dedup key)
    pub url: String,

    /// Snapshot URL returned by the archiving service
    pub archived_url: String,

    /// Tag of the service that produced the snapshot
    pub service: String,

    /// When the archive succeeded
    pub timestamp: DateTime<Utc>,
}

impl SeenRecord {
    pub fn new(
        url: impl Into<String>,
        archived_url: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            archived_url: archived_url.into(),
            service: service.into(),
            timestamp: Utc::now(),
        }
    }

    /// Serialize to one ledger line (without trailing newline).
    pub fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.url,
            self.service,
            self.archived_url
        )
    }

    /// Extract the dedup URL from a ledger line.
    ///
    /// Accepts three layouts:
    /// - `timestamp|url|service|archived_url` (current)
    /// - `timestamp|url` (older deployments)
    /// - `url` (oldest)
    ///
    /// Returns `None` for blank lines.
    pub fn url_from_line(line: &str) -> Option<&str> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let mut parts = line.split('|');
        let first = parts.next()?;
        match parts.next() {
            Some(url) => Some(url),
            None => Some(first),
        }
    }
}

/// One URL every service in the chain failed to archive. Advisory only;
/// never consulted for dedup.
///
/// Line layout: `timestamp|url|reason`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub url: String,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl FailureRecord {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }

    /// Serialize to one failure-log line (without trailing newline).
    pub fn to_line(&self) -> String {
        format!(
            "{}|{}|{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.url,
            self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seen_line_round_trip_url() {
        let record = SeenRecord::new(
            "https://www.reddit.com/r/rust/comments/abc/post/",
            "https://web.archive.org/web/https://www.reddit.com/r/rust/comments/abc/post/",
            "wayback",
        );
        let line = record.to_line();
        assert_eq!(
            SeenRecord::url_from_line(&line),
            Some("https://www.reddit.com/r/rust/comments/abc/post/")
        );
    }

    #[test]
    fn legacy_two_field_line_parses() {
        assert_eq!(
            SeenRecord::url_from_line("2024-01-01 00:00:00|https://example.com/a"),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn legacy_bare_url_line_parses() {
        assert_eq!(
            SeenRecord::url_from_line("https://example.com/a"),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn blank_line_yields_none() {
        assert_eq!(SeenRecord::url_from_line("   "), None);
        assert_eq!(SeenRecord::url_from_line(""), None);
    }

    #[test]
    fn failure_line_layout() {
        let record = FailureRecord::new("https://example.com/a", "wayback:429|archive_today:523");
        let line = record.to_line();
        let parts: Vec<&str> = line.split('|').collect();
        assert_eq!(parts[1], "https://example.com/a");
        assert_eq!(parts[2], "wayback:429");
        assert_eq!(parts[3], "archive_today:523");
    }
}
