// src/models/mod.rs

//! Domain models for the archiver application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod entry;
mod outcome;
mod record;

// Re-export all public types
pub use config::{
    ArchiveConfig, Config, FeedConfig, HttpConfig, RunConfig, StorageConfig, SUBREDDIT_ENV,
};
pub use entry::FeedEntry;
pub use outcome::{AttemptResult, ChainOutcome, RunOutcome, RunReport, RunStats};
pub use record::{FailureRecord, SeenRecord};
