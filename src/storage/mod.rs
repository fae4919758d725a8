//! Persistent state for dedup and failure review.
//!
//! ## Storage Layout
//!
//! ```text
//! {data_dir}/
//! ├── seen.txt     # Dedup ledger: one line per archived URL (append-only)
//! └── failed.txt   # Advisory failure log (append-only, never read back)
//! ```
//!
//! Both files are pipe-delimited text logs. The ledger is capped: when it
//! grows past the configured maximum, the oldest lines are dropped and the
//! file is rewritten in place — the only mutation it ever sees.

pub mod local;

pub use local::{FailureLog, Ledger};
