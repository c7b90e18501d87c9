//! Per-provider circuit breakers
//!
//! One three-state breaker per provider identifier, shared by every request
//! in flight. `allow` / `record_success` / `record_failure` are mutually
//! exclusive per provider: each breaker sits behind its own mutex so the
//! half-open trial gate and the failure counter cannot race, while breakers
//! for different providers never contend with each other.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::request::ProviderId;

/// Circuit breaker state for one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, calls are allowed
    Closed,
    /// Provider is failing, calls are skipped
    Open,
    /// Probing — exactly one trial call is admitted
    HalfOpen,
}

#[derive(Debug)]
struct Breaker {
    state: CircuitState,
    consecutive_failures: u32,
    transitioned_at: Instant,
    last_failure: Option<Instant>,
    trial_in_flight: bool,
}

impl Breaker {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            transitioned_at: Instant::now(),
            last_failure: None,
            trial_in_flight: false,
        }
    }

    fn transition(&mut self, next: CircuitState) {
        self.state = next;
        self.transitioned_at = Instant::now();
    }

    fn allow(&mut self, cooldown: Duration) -> bool {
        match self.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                if self.transitioned_at.elapsed() >= cooldown {
                    self.transition(CircuitState::HalfOpen);
                    self.trial_in_flight = true;
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if self.trial_in_flight {
                    // A trial whose request was abandoned before recording an
                    // outcome must not wedge the breaker: re-arm after another
                    // cool-down.
                    if self.transitioned_at.elapsed() >= cooldown {
                        self.transitioned_at = Instant::now();
                        true
                    } else {
                        false
                    }
                } else {
                    self.trial_in_flight = true;
                    true
                }
            }
        }
    }

    fn record_success(&mut self) {
        match self.state {
            // State no-op: a success on a closed breaker only confirms health
            CircuitState::Closed => self.consecutive_failures = 0,
            // Success while Open is possible when a parallel request tripped
            // the breaker mid-attempt; direct evidence of health closes it
            CircuitState::Open | CircuitState::HalfOpen => {
                self.transition(CircuitState::Closed);
                self.consecutive_failures = 0;
                self.trial_in_flight = false;
            }
        }
    }

    /// Returns `true` when this failure tripped the breaker open
    fn record_failure(&mut self, threshold: u32) -> bool {
        self.last_failure = Some(Instant::now());
        match self.state {
            CircuitState::Closed => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= threshold {
                    self.transition(CircuitState::Open);
                    return true;
                }
                false
            }
            CircuitState::HalfOpen => {
                // Failed trial: back to Open with the cool-down restarted
                self.transition(CircuitState::Open);
                self.trial_in_flight = false;
                true
            }
            // Late failure from an attempt that was in flight when the
            // breaker tripped; the cool-down clock is not restarted
            CircuitState::Open => false,
        }
    }
}

/// Bank of circuit breakers, one per provider identifier
///
/// Breakers are created lazily on first access and live for the process
/// lifetime; state is in-memory only and resets on restart.
#[derive(Debug)]
pub struct BreakerBank {
    breakers: DashMap<ProviderId, Mutex<Breaker>>,
    failure_threshold: u32,
    cooldown: Duration,
}

impl BreakerBank {
    /// Create a bank where `failure_threshold` consecutive failures trip a
    /// breaker open and an open breaker admits a trial after `cooldown`
    pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            breakers: DashMap::new(),
            failure_threshold,
            cooldown,
        }
    }

    /// Whether this provider is callable right now
    ///
    /// Performs the lazy Open→HalfOpen transition as a side effect once the
    /// cool-down has elapsed. When a half-open trial is already in flight,
    /// concurrent callers see the provider as unavailable.
    pub fn allow(&self, id: &ProviderId) -> bool {
        self.with_breaker(id, |breaker| {
            let before = breaker.state;
            let allowed = breaker.allow(self.cooldown);
            if before == CircuitState::Open && breaker.state == CircuitState::HalfOpen {
                tracing::info!(provider = %id, "cool-down elapsed, admitting trial call");
            }
            allowed
        })
    }

    /// Record a successful invocation
    pub fn record_success(&self, id: &ProviderId) {
        self.with_breaker(id, |breaker| {
            let was = breaker.state;
            breaker.record_success();
            if was != CircuitState::Closed {
                tracing::info!(provider = %id, "circuit breaker closed after successful call");
            }
        });
    }

    /// Record a failed invocation
    pub fn record_failure(&self, id: &ProviderId) {
        self.with_breaker(id, |breaker| {
            if breaker.record_failure(self.failure_threshold) {
                tracing::warn!(
                    provider = %id,
                    consecutive_failures = breaker.consecutive_failures,
                    "circuit breaker opened"
                );
            }
        });
    }

    /// Current stored state for a provider
    ///
    /// Reports the state as last recorded; the Open→HalfOpen transition is
    /// performed lazily by [`BreakerBank::allow`], not here.
    pub fn state(&self, id: &ProviderId) -> CircuitState {
        self.breakers
            .get(id)
            .map_or(CircuitState::Closed, |cell| lock(&cell).state)
    }

    /// Consecutive-failure count for a provider
    pub fn consecutive_failures(&self, id: &ProviderId) -> u32 {
        self.breakers
            .get(id)
            .map_or(0, |cell| lock(&cell).consecutive_failures)
    }

    /// Instant of the most recent recorded failure, if any
    pub fn last_failure(&self, id: &ProviderId) -> Option<Instant> {
        self.breakers.get(id).and_then(|cell| lock(&cell).last_failure)
    }

    fn with_breaker<T>(&self, id: &ProviderId, f: impl FnOnce(&mut Breaker) -> T) -> T {
        let cell = self
            .breakers
            .entry(id.clone())
            .or_insert_with(|| Mutex::new(Breaker::new()))
            .downgrade();
        let mut breaker = lock(&cell);
        f(&mut breaker)
    }
}

/// Lock a breaker, recovering the guard if a panicking thread poisoned it
///
/// Breaker operations never panic between state writes, so a poisoned guard
/// still holds a consistent state machine.
fn lock(cell: &Mutex<Breaker>) -> std::sync::MutexGuard<'_, Breaker> {
    match cell.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
