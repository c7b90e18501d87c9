use thiserror::Error;

use crate::dispatch::CandidateOutcome;
use crate::request::ProviderId;

/// Errors that can reach the engine's caller
///
/// Attempt-level failures are absorbed into dispatcher bookkeeping; only
/// pre-flight intent/configuration problems and post-flight exhaustion
/// surface here.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Caller supplied both or neither of an explicit order and a tier
    #[error("invalid routing intent: {0}")]
    InvalidIntent(&'static str),

    /// Explicit order names a provider absent from the registry
    #[error("unknown provider: {provider}")]
    UnknownProvider {
        /// The identifier that failed validation
        provider: ProviderId,
    },

    /// Every candidate was skipped or failed
    #[error("all candidate providers failed or were skipped: {}", summarize(.outcomes))]
    Exhausted {
        /// Per-candidate outcome in attempt order, skipped entries included
        outcomes: Vec<CandidateOutcome>,
    },
}

impl RouteError {
    /// Whether the error is client-correctable (bad intent or configuration)
    /// rather than a routing-time exhaustion
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidIntent(_) | Self::UnknownProvider { .. })
    }
}

fn summarize(outcomes: &[CandidateOutcome]) -> String {
    if outcomes.is_empty() {
        return "no candidates".to_owned();
    }
    outcomes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
