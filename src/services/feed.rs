// src/services/feed.rs

//! Subreddit Atom feed retrieval and parsing.
//!
//! Feed failures are fatal: a non-200 status or transport error aborts the
//! run before anything is processed. A 200 with zero entries is advisory —
//! the subreddit simply has no new posts.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Config, FeedEntry};

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
}

/// Pulls the newest posts of one subreddit.
pub struct FeedFetcher {
    client: Client,
    feed_url: String,
    timeout: Duration,
}

impl FeedFetcher {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            feed_url: config.feed_url(),
            timeout: Duration::from_secs(config.feed.timeout_secs),
        }
    }

    /// Fetch the feed and return its entries in feed order.
    pub async fn fetch(&self) -> Result<Vec<FeedEntry>> {
        let response = self
            .client
            .get(&self.feed_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::feed(&self.feed_url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::feed(&self.feed_url, e))?;
        entries_from_response(&self.feed_url, status, &body)
    }
}

/// Classify a feed response: any non-200 status is fatal (the source is
/// unreachable or rate limiting), a 200 body parses as Atom.
pub fn entries_from_response(feed_url: &str, status: u16, body: &str) -> Result<Vec<FeedEntry>> {
    if status != 200 {
        return Err(AppError::feed(
            feed_url,
            format!("unexpected status {status} (rate limit or invalid subreddit?)"),
        ));
    }
    parse_atom(body)
}

/// Parse an Atom document into feed entries. Entries without a link are
/// dropped; an entry without an id falls back to its URL.
pub fn parse_atom(xml: &str) -> Result<Vec<FeedEntry>> {
    let feed: AtomFeed = quick_xml::de::from_str(xml).map_err(AppError::feed_parse)?;

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let url = entry.links.into_iter().find_map(|link| link.href)?;
            let id = entry.id.unwrap_or_else(|| url.clone());
            Some(FeedEntry::new(id, url))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>newest submissions : rust</title>
  <entry>
    <id>t3_abc123</id>
    <title>First post</title>
    <link href="https://www.reddit.com/r/rust/comments/abc123/first_post/" />
  </entry>
  <entry>
    <id>t3_def456</id>
    <title>Second post</title>
    <link href="https://www.reddit.com/r/rust/comments/def456/second_post/" />
  </entry>
  <entry>
    <id>t3_nolink</id>
    <title>Entry without a link</title>
  </entry>
</feed>"#;

    #[test]
    fn parses_entries_in_feed_order() {
        let entries = parse_atom(FIXTURE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "t3_abc123");
        assert_eq!(
            entries[0].url,
            "https://www.reddit.com/r/rust/comments/abc123/first_post/"
        );
        assert_eq!(entries[1].id, "t3_def456");
    }

    #[test]
    fn entry_without_link_is_skipped() {
        let entries = parse_atom(FIXTURE).unwrap();
        assert!(entries.iter().all(|e| e.id != "t3_nolink"));
    }

    #[test]
    fn empty_feed_is_ok() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>empty</title></feed>"#;
        assert!(parse_atom(xml).unwrap().is_empty());
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_atom("this is not xml <<<").is_err());
    }

    #[test]
    fn non_200_status_is_fatal() {
        let feed_url = "https://www.reddit.com/r/rust/new/.rss";
        let result = entries_from_response(feed_url, 403, "Forbidden");
        assert!(matches!(result, Err(AppError::Feed { .. })));
    }

    #[test]
    fn status_200_parses_the_body() {
        let entries =
            entries_from_response("https://www.reddit.com/r/rust/new/.rss", 200, FIXTURE).unwrap();
        assert_eq!(entries.len(), 2);
    }
}
