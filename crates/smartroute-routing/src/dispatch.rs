//! Dispatcher
//!
//! Walks the candidate list strictly sequentially: open breakers are skipped
//! without counting as attempts, everything else is invoked through the
//! retry policy, and the first success wins. Exhaustion returns the full
//! per-candidate outcome list so callers can tell "everything is broken"
//! from "everything is overloaded".

use std::fmt;
use std::sync::Arc;

use smartroute_config::Config;

use crate::breaker::BreakerBank;
use crate::error::RouteError;
use crate::provider::{AttemptFailure, Provider, ProviderResponse};
use crate::registry::ProviderRegistry;
use crate::request::{ProviderId, RoutingRequest};
use crate::resolver;
use crate::retry::RetryPolicy;

/// Successful dispatch: the response and the provider that produced it
#[derive(Debug, Clone)]
pub struct RouteSuccess {
    /// Provider output
    pub response: ProviderResponse,
    /// The candidate that answered
    pub provider: ProviderId,
}

/// What happened to one candidate during a dispatch
#[derive(Debug, Clone)]
pub struct CandidateOutcome {
    /// The candidate in question
    pub provider: ProviderId,
    /// Skipped or failed
    pub disposition: Disposition,
}

/// Why a candidate did not produce the response
#[derive(Debug, Clone)]
pub enum Disposition {
    /// Breaker was open; the provider was never invoked
    Skipped,
    /// Invoked and failed after local retries
    Failed(AttemptFailure),
}

impl fmt::Display for CandidateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.disposition {
            Disposition::Skipped => write!(f, "{}: skipped (circuit open)", self.provider),
            Disposition::Failed(failure) => write!(f, "{}: {failure}", self.provider),
        }
    }
}

/// The routing & fallback execution engine
///
/// One engine serves many concurrent dispatches; the registry is read-only
/// and the breaker bank serializes per provider, so no further coordination
/// is needed. Dropping a dispatch future abandons it at the next await
/// point; an attempt already handed to the transport is not forcibly
/// aborted beyond being dropped.
pub struct Engine {
    registry: Arc<ProviderRegistry>,
    breakers: Arc<BreakerBank>,
    retry: RetryPolicy,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("breakers", &self.breakers)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Assemble an engine from its parts
    pub fn new(registry: ProviderRegistry, breakers: BreakerBank, retry: RetryPolicy) -> Self {
        Self {
            registry: Arc::new(registry),
            breakers: Arc::new(breakers),
            retry,
        }
    }

    /// Build an engine from validated configuration plus the provider
    /// implementations constructed by the transport layer
    ///
    /// # Errors
    ///
    /// Returns an error when the registry cannot be built or tuning values
    /// fail to parse
    pub fn from_config(config: &Config, providers: Vec<Arc<dyn Provider>>) -> anyhow::Result<Self> {
        let registry = ProviderRegistry::from_config(config, providers)?;
        let breakers = BreakerBank::new(
            config.engine.circuit_breaker.failure_threshold,
            config.engine.circuit_breaker.cooldown()?,
        );
        let retry = RetryPolicy::new(
            config.engine.retry.max_retries,
            config.engine.retry.attempt_timeout()?,
            config.engine.retry.backoff_base()?,
            config.engine.retry.backoff_cap()?,
        );
        Ok(Self::new(registry, breakers, retry))
    }

    /// The shared breaker bank, for observability
    pub fn breakers(&self) -> &BreakerBank {
        &self.breakers
    }

    /// The provider registry
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Route one request to the first candidate that answers
    ///
    /// Candidates are attempted strictly in list order; a candidate whose
    /// breaker is open is recorded as skipped without being invoked and
    /// without counting as an attempt.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownProvider`] or
    /// [`RouteError::InvalidIntent`] before any provider is contacted, and
    /// [`RouteError::Exhausted`] when every candidate was skipped or failed
    pub async fn route(&self, request: &RoutingRequest) -> Result<RouteSuccess, RouteError> {
        let candidates = resolver::resolve(&request.intent, &self.registry)?;

        tracing::debug!(
            candidates = candidates.len(),
            intent = ?request.intent,
            "dispatching request"
        );

        let mut outcomes = Vec::with_capacity(candidates.len());

        for id in &candidates {
            if !self.breakers.allow(id) {
                tracing::debug!(provider = %id, "skipping candidate, circuit breaker open");
                outcomes.push(CandidateOutcome {
                    provider: id.clone(),
                    disposition: Disposition::Skipped,
                });
                continue;
            }

            let Some(provider) = self.registry.get(id) else {
                // The resolver validated every candidate; this re-check only
                // guards the invariant
                return Err(RouteError::UnknownProvider { provider: id.clone() });
            };

            let timeout_override = self.registry.attempt_timeout(id);
            match self.retry.execute(provider.as_ref(), request, timeout_override).await {
                Ok(response) => {
                    self.breakers.record_success(id);
                    tracing::info!(provider = %id, model = %response.model, "provider answered");
                    return Ok(RouteSuccess {
                        response,
                        provider: id.clone(),
                    });
                }
                Err(failure) => {
                    self.breakers.record_failure(id);
                    tracing::warn!(
                        provider = %id,
                        error = %failure,
                        "candidate failed, moving to next"
                    );
                    outcomes.push(CandidateOutcome {
                        provider: id.clone(),
                        disposition: Disposition::Failed(failure),
                    });
                }
            }
        }

        tracing::warn!(attempted = outcomes.len(), "all candidates failed or were skipped");
        Err(RouteError::Exhausted { outcomes })
    }
}
