//! Transient result types produced while archiving.

/// Classified outcome of one adapter invocation.
///
/// Consumed immediately by the fallback chain; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    /// The service confirmed the snapshot
    Success {
        archived_url: String,
        service: &'static str,
    },

    /// Transient status worth retrying within the same adapter (429, 503, ...)
    Retryable(u16),

    /// Status that retrying cannot fix; move on to the next adapter
    Permanent(u16),

    /// Transport-level failure (timeout, connection reset, ...)
    Error(String),
}

impl AttemptResult {
    /// Short token for chain diagnostics, e.g. `429` or `error`.
    pub fn status_label(&self) -> String {
        match self {
            AttemptResult::Success { .. } => "ok".to_string(),
            AttemptResult::Retryable(code) | AttemptResult::Permanent(code) => code.to_string(),
            AttemptResult::Error(_) => "error".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptResult::Success { .. })
    }
}

/// Outcome of running the full fallback chain for one URL.
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub success: bool,

    /// Tag of the service that succeeded
    pub service: Option<&'static str>,

    /// Snapshot URL of the successful service
    pub archived_url: Option<String>,

    /// Pipe-delimited `tag:status` tokens, one per attempted adapter
    pub diagnostics: String,
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Entries attempted (archived + failed)
    pub processed: usize,

    /// Entries archived and recorded in the ledger
    pub archived: usize,

    /// Entries every service failed for
    pub failed: usize,

    /// Entries skipped because the ledger already had them
    pub skipped: usize,
}

/// How a run ended. Fatal errors surface as `Err(AppError)` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All eligible entries were processed (or the quota was reached)
    Completed,

    /// The circuit breaker opened; remaining entries wait for the next run
    CircuitBreakerStop,
}

/// Final report of one archiver run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: RunStats,
    pub outcome: RunOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels() {
        assert_eq!(AttemptResult::Retryable(429).status_label(), "429");
        assert_eq!(AttemptResult::Permanent(523).status_label(), "523");
        assert_eq!(
            AttemptResult::Error("timeout".to_string()).status_label(),
            "error"
        );
    }
}
