// src/utils/url.rs

//! Bidirectional URL canonicalization.
//!
//! Each archive service that needs a host rewrite (e.g. submitting through
//! the old.reddit.com mirror) uses a pure transform from this module plus
//! its inverse, instead of chained string replacements. Every transform is
//! idempotent: `transform(transform(u)) == transform(u)`.

use url::Url;

/// Reddit host aliases that all serve the same post.
const REDDIT_HOSTS: &[&str] = &[
    "reddit.com",
    "www.reddit.com",
    "old.reddit.com",
    "new.reddit.com",
    "np.reddit.com",
    "m.reddit.com",
];

/// Canonical form of a feed URL: fragment stripped, reddit host aliases
/// folded into `www.reddit.com`. This is the ledger dedup key.
///
/// Unparseable input is returned trimmed but otherwise untouched.
///
/// # Examples
/// ```
/// use archiver::utils::url::canonicalize;
///
/// assert_eq!(
///     canonicalize("https://old.reddit.com/r/rust/comments/abc/post/"),
///     "https://www.reddit.com/r/rust/comments/abc/post/"
/// );
/// ```
pub fn canonicalize(raw: &str) -> String {
    let raw = raw.trim();
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };
    parsed.set_fragment(None);
    if is_reddit_host(&parsed) {
        // Host is known-valid, set_host cannot fail here
        let _ = parsed.set_host(Some("www.reddit.com"));
    }
    parsed.to_string()
}

/// Rewrite a reddit URL to the old.reddit.com mirror, which renders
/// without JavaScript and archives far more reliably. Non-reddit URLs
/// pass through canonicalized.
///
/// # Examples
/// ```
/// use archiver::utils::url::to_old_reddit;
///
/// assert_eq!(
///     to_old_reddit("https://www.reddit.com/r/rust/comments/abc/post/"),
///     "https://old.reddit.com/r/rust/comments/abc/post/"
/// );
/// ```
pub fn to_old_reddit(raw: &str) -> String {
    let canonical = canonicalize(raw);
    let Ok(mut parsed) = Url::parse(&canonical) else {
        return canonical;
    };
    if is_reddit_host(&parsed) {
        let _ = parsed.set_host(Some("old.reddit.com"));
    }
    parsed.to_string()
}

/// Inverse of [`to_old_reddit`]: recover the canonical URL after a
/// mirror submission.
pub fn from_old_reddit(raw: &str) -> String {
    canonicalize(raw)
}

fn is_reddit_host(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|host| REDDIT_HOSTS.contains(&host))
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "https://www.reddit.com/r/rust/comments/abc123/some_post/";

    #[test]
    fn canonicalize_folds_reddit_hosts() {
        for host in ["reddit.com", "old.reddit.com", "np.reddit.com", "m.reddit.com"] {
            let input = format!("https://{host}/r/rust/comments/abc123/some_post/");
            assert_eq!(canonicalize(&input), POST);
        }
    }

    #[test]
    fn canonicalize_strips_fragment() {
        assert_eq!(
            canonicalize("https://www.reddit.com/r/rust/comments/abc123/some_post/#top"),
            POST
        );
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let once = canonicalize(POST);
        assert_eq!(canonicalize(&once), once);
    }

    #[test]
    fn canonicalize_leaves_non_reddit_urls() {
        assert_eq!(
            canonicalize("https://example.com/page"),
            "https://example.com/page"
        );
    }

    #[test]
    fn canonicalize_passes_through_garbage() {
        assert_eq!(canonicalize("  not a url "), "not a url");
    }

    #[test]
    fn to_old_reddit_rewrites_host() {
        assert_eq!(
            to_old_reddit(POST),
            "https://old.reddit.com/r/rust/comments/abc123/some_post/"
        );
    }

    #[test]
    fn to_old_reddit_is_idempotent() {
        let once = to_old_reddit(POST);
        assert_eq!(to_old_reddit(&once), once);
    }

    #[test]
    fn to_old_reddit_ignores_other_hosts() {
        assert_eq!(
            to_old_reddit("https://example.com/page"),
            "https://example.com/page"
        );
    }

    #[test]
    fn reverse_of_transform_is_canonical() {
        for url in [
            POST,
            "https://old.reddit.com/r/rust/comments/abc123/some_post/",
            "https://example.com/page",
        ] {
            assert_eq!(from_old_reddit(&to_old_reddit(url)), canonicalize(url));
        }
    }
}
