//! Circuit breaker for upstream protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: upstream assumed down, calls fail fast
//! - Half-Open: a single probe call tests whether the upstream recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= failure_threshold
//! Open → Half-Open: first call after cooldown elapsed (becomes the probe)
//! Half-Open → Closed: consecutive probe successes >= success_threshold
//! Half-Open → Open: probe fails (cooldown restarts)
//! ```
//!
//! # Design Decisions
//! - One breaker per upstream, owned by the client that calls it
//! - Open/Half-Open rejection is decided before the operation is invoked
//! - Exactly one probe in flight; a dropped probe releases its slot
//! - Every state change bumps a generation counter; outcomes of calls admitted
//!   under an older generation are discarded
//! - The lock is never held across an `.await`

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::config::BreakerConfig;
use crate::observability::metrics;

/// Externally visible breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// Thresholds and cooldown for a breaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakerPolicy {
    /// Consecutive failures in Closed that open the breaker.
    pub failure_threshold: u32,
    /// Consecutive probe successes in Half-Open that close the breaker.
    pub success_threshold: u32,
    /// Time spent Open before a probe is admitted.
    pub cooldown: Duration,
}

impl Default for BreakerPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            success_threshold: 1,
            cooldown: Duration::from_secs(5),
        }
    }
}

impl From<&BreakerConfig> for BreakerPolicy {
    fn from(config: &BreakerConfig) -> Self {
        Self {
            failure_threshold: config.failure_threshold,
            success_threshold: config.success_threshold,
            cooldown: Duration::from_secs(config.cooldown_secs),
        }
    }
}

/// Result of running an operation through the breaker.
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// Rejected without invoking the operation.
    #[error("circuit breaker is open")]
    Open,
    /// The operation ran and failed.
    #[error("{0}")]
    Inner(E),
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    opened_at: Option<Instant>,
    probe_in_flight: bool,
    generation: u64,
}

/// A consecutive-failure circuit breaker.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    policy: BreakerPolicy,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a breaker in the Closed state.
    pub fn new(name: impl Into<String>, policy: BreakerPolicy) -> Self {
        let name = name.into();
        metrics::record_breaker_state(&name, BreakerState::Closed);
        Self {
            name,
            policy,
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
                consecutive_successes: 0,
                opened_at: None,
                probe_in_flight: false,
                generation: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &BreakerPolicy {
        &self.policy
    }

    /// Run `op` at most once, counting every error as a failure.
    pub async fn run<F, Fut, T, E>(&self, op: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_with(op, |_| true).await
    }

    /// Run `op` at most once; `is_failure` decides which errors count
    /// against the upstream. Errors it rejects are recorded as successes.
    pub async fn run_with<F, Fut, T, E, C>(
        &self,
        op: F,
        is_failure: C,
    ) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: FnOnce(&E) -> bool,
    {
        let Some(permit) = self.acquire() else {
            metrics::record_breaker_rejection(&self.name);
            return Err(BreakerError::Open);
        };

        let result = op().await;
        let failed = match &result {
            Ok(_) => false,
            Err(e) => is_failure(e),
        };
        permit.settle(failed);

        result.map_err(BreakerError::Inner)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every critical section leaves `Inner` consistent, so a poisoned
        // lock still holds valid state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self) -> Option<Permit<'_>> {
        let mut inner = self.lock();
        let now = Instant::now();

        let probe = match inner.state {
            BreakerState::Closed => false,
            BreakerState::Open => {
                let cooled = inner
                    .opened_at
                    .map_or(true, |at| now.duration_since(at) >= self.policy.cooldown);
                if !cooled {
                    tracing::debug!(breaker = %self.name, "Rejecting call: breaker open");
                    return None;
                }
                self.transition(&mut inner, BreakerState::HalfOpen, now);
                inner.probe_in_flight = true;
                true
            }
            BreakerState::HalfOpen => {
                if inner.probe_in_flight {
                    tracing::debug!(breaker = %self.name, "Rejecting call: probe in flight");
                    return None;
                }
                inner.probe_in_flight = true;
                true
            }
        };

        if probe {
            tracing::info!(breaker = %self.name, "Admitting half-open probe");
        }

        Some(Permit {
            breaker: self,
            generation: inner.generation,
            probe,
            settled: false,
        })
    }

    fn record(&self, generation: u64, failed: bool) {
        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(
                breaker = %self.name,
                failed,
                "Discarding outcome admitted under a previous state"
            );
            return;
        }

        let now = Instant::now();
        match (inner.state, failed) {
            (BreakerState::Closed, false) => inner.consecutive_failures = 0,
            (BreakerState::Closed, true) => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.policy.failure_threshold {
                    self.transition(&mut inner, BreakerState::Open, now);
                }
            }
            (BreakerState::HalfOpen, false) => {
                inner.probe_in_flight = false;
                inner.consecutive_successes += 1;
                if inner.consecutive_successes >= self.policy.success_threshold {
                    self.transition(&mut inner, BreakerState::Closed, now);
                }
            }
            (BreakerState::HalfOpen, true) => {
                inner.probe_in_flight = false;
                self.transition(&mut inner, BreakerState::Open, now);
            }
            // Entering Open bumps the generation, so no permit can match it.
            (BreakerState::Open, _) => {}
        }
    }

    fn abandon(&self, generation: u64, probe: bool) {
        if !probe {
            return;
        }
        let mut inner = self.lock();
        if inner.generation == generation && inner.state == BreakerState::HalfOpen {
            inner.probe_in_flight = false;
            tracing::info!(breaker = %self.name, "Probe abandoned, releasing half-open slot");
        }
    }

    fn transition(&self, inner: &mut Inner, to: BreakerState, now: Instant) {
        let from = inner.state;
        inner.state = to;
        inner.generation += 1;

        match to {
            BreakerState::Open => {
                inner.opened_at = Some(now);
                inner.consecutive_successes = 0;
                inner.probe_in_flight = false;
                tracing::warn!(
                    breaker = %self.name,
                    from = from.as_str(),
                    consecutive_failures = inner.consecutive_failures,
                    cooldown_secs = self.policy.cooldown.as_secs_f64(),
                    "Circuit breaker opened"
                );
            }
            BreakerState::HalfOpen => {
                inner.consecutive_successes = 0;
                tracing::info!(breaker = %self.name, "Circuit breaker half-open");
            }
            BreakerState::Closed => {
                inner.consecutive_failures = 0;
                inner.consecutive_successes = 0;
                inner.opened_at = None;
                tracing::info!(breaker = %self.name, from = from.as_str(), "Circuit breaker closed");
            }
        }

        metrics::record_breaker_state(&self.name, to);
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> (BreakerState, u32, u32, bool) {
        let inner = self.lock();
        (
            inner.state,
            inner.consecutive_failures,
            inner.consecutive_successes,
            inner.probe_in_flight,
        )
    }
}

/// Admission ticket for one call. Dropping it unsettled (the caller's future
/// was cancelled) releases a held probe slot without recording an outcome.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    generation: u64,
    probe: bool,
    settled: bool,
}

impl Permit<'_> {
    fn settle(mut self, failed: bool) {
        self.settled = true;
        self.breaker.record(self.generation, failed);
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.abandon(self.generation, self.probe);
        }
    }
}
