//! # Circuit Breaker Module
//!
//! This module implements the circuit breaker pattern for record lookups.
//! When the database keeps failing, lookups fail fast instead of making every
//! user wait for another timeout.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::RecoveryConfig;

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

/// Circuit breaker for data-source lookups
///
/// # State Machine
///
/// - **Closed**: Normal operation, lookups pass through
/// - **Open**: Failure threshold exceeded, lookups fail fast
/// - **Half-Open**: Reset time elapsed; one trial lookup is let through and
///   the window restarts, so a failed trial re-opens the circuit at once
///
/// # Configuration
///
/// Uses `RecoveryConfig` for:
/// - `circuit_breaker_threshold`: Failures before opening (default: 5)
/// - `circuit_breaker_reset_secs`: Time before attempting reset (default: 30s)
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    config: RecoveryConfig,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    ///
    /// ```rust
    /// use matjip_bot::circuit_breaker::CircuitBreaker;
    /// use matjip_bot::config::RecoveryConfig;
    ///
    /// let breaker = CircuitBreaker::new(RecoveryConfig::default());
    /// assert!(!breaker.is_open());
    /// ```
    pub fn new(config: RecoveryConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            config,
        }
    }

    /// Check if circuit breaker is open (blocking lookups)
    ///
    /// Returns `true` while the failure count is at the threshold and the
    /// reset time hasn't elapsed. The first call after that returns `false`
    /// for a single trial and restarts the window. The count is kept, so only
    /// [`CircuitBreaker::record_success`] closes the circuit.
    pub fn is_open(&self) -> bool {
        let mut state = self.lock();

        if state.failure_count < self.config.circuit_breaker_threshold {
            return false;
        }

        let reset = Duration::from_secs(self.config.circuit_breaker_reset_secs);
        match state.last_failure_time {
            Some(last_time) if last_time.elapsed() < reset => true,
            _ => {
                state.last_failure_time = Some(Instant::now());
                false
            }
        }
    }

    /// Record a failed lookup
    pub fn record_failure(&self) {
        let mut state = self.lock();
        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());
    }

    /// Record a successful lookup, closing the circuit
    pub fn record_success(&self) {
        *self.lock() = BreakerState::default();
    }

    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        // A panic while holding the lock leaves plain counters behind, safe to reuse
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
