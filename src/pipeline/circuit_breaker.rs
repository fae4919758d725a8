//! Circuit Breaker pattern implementation.
//!
//! Stops the run once N consecutive entries fail across every archiving
//! service. At that point the services are assumed globally degraded and
//! further submissions would only feed rate limiters; the remaining
//! entries are deferred to the next scheduled run.
//!
//! Opening the breaker is expected degradation, not an error: the run
//! still exits 0.

/// Circuit breaker configuration.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive all-service failures before the breaker opens. Default: 5
    pub failure_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
        }
    }
}

/// Tracks consecutive failures within one run.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    consecutive_failures: u32,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with default configuration.
    pub fn new() -> Self {
        Self::with_config(CircuitBreakerConfig::default())
    }

    /// Create a new circuit breaker with custom configuration.
    pub fn with_config(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            consecutive_failures: 0,
        }
    }

    /// Create a circuit breaker with the given failure threshold.
    pub fn with_threshold(failure_threshold: u32) -> Self {
        Self::with_config(CircuitBreakerConfig { failure_threshold })
    }

    /// Record one all-service failure; returns the new consecutive count.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    /// Record a success, closing the breaker again.
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Whether the breaker has opened and processing should stop.
    pub fn is_open(&self) -> bool {
        self.consecutive_failures >= self.config.failure_threshold
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new()
    }
}
