//! Pipeline entry points for archiver operations.
//!
//! - `run_archiver`: one full feed-to-archive pass
//! - `ArchiveChain`: sequential fallback over archive services
//! - `CircuitBreaker`: early stop on consecutive all-service failures

pub mod chain;
pub mod circuit_breaker;
pub mod run;

pub use chain::ArchiveChain;
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
pub use run::run_archiver;
