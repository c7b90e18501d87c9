//! Per-attempt retry and timeout policy
//!
//! Bounds a single candidate's worst-case latency: each invocation attempt
//! runs under an engine-imposed timeout, transient failures are retried with
//! doubling capped backoff, and a non-transient rejection returns
//! immediately. The dispatcher sees one summarized failure per candidate,
//! never the individual sub-attempts.

use std::time::Duration;

use crate::provider::{AttemptFailure, Provider, ProviderResponse};
use crate::request::RoutingRequest;

/// Retry/timeout settings applied around every provider invocation
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    attempt_timeout: Duration,
    backoff_base: Duration,
    backoff_cap: Duration,
}

impl RetryPolicy {
    /// Create a policy
    ///
    /// `max_retries` counts additional attempts after the first, so a
    /// candidate is invoked at most `max_retries + 1` times.
    pub const fn new(
        max_retries: u32,
        attempt_timeout: Duration,
        backoff_base: Duration,
        backoff_cap: Duration,
    ) -> Self {
        Self {
            max_retries,
            attempt_timeout,
            backoff_base,
            backoff_cap,
        }
    }

    /// Execute one candidate under this policy
    ///
    /// `timeout_override` replaces the policy-wide attempt timeout for this
    /// provider when present (per-provider configuration).
    pub async fn execute(
        &self,
        provider: &dyn Provider,
        request: &RoutingRequest,
        timeout_override: Option<Duration>,
    ) -> Result<ProviderResponse, AttemptFailure> {
        let attempt_timeout = timeout_override.unwrap_or(self.attempt_timeout);
        let mut last_failure: Option<AttemptFailure> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }

            match tokio::time::timeout(attempt_timeout, provider.invoke(request)).await {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(failure)) => {
                    if !failure.is_transient() {
                        tracing::debug!(
                            provider = %provider.id(),
                            error = %failure,
                            "non-transient failure, not retrying"
                        );
                        return Err(failure);
                    }
                    tracing::debug!(
                        provider = %provider.id(),
                        attempt,
                        error = %failure,
                        "transient attempt failure"
                    );
                    last_failure = Some(failure);
                }
                Err(_elapsed) => {
                    tracing::debug!(provider = %provider.id(), attempt, "attempt timed out");
                    last_failure = Some(AttemptFailure::timeout(attempt_timeout));
                }
            }
        }

        Err(last_failure.unwrap_or_else(|| AttemptFailure::transport("no attempt was executed")))
    }

    /// Backoff before retry `attempt` (1-based): doubling from the base,
    /// capped
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(u32::BITS - 1);
        let delay = self.backoff_base.saturating_mul(1 << doublings);
        delay.min(self.backoff_cap)
    }
}
