//! Provider invocation boundary
//!
//! The engine depends on a uniform "invoke provider P with request R"
//! capability; vendor payload marshalling lives behind implementations of
//! [`Provider`] and is outside this crate.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::request::{ProviderId, RoutingRequest};

/// Classification of a failed invocation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The engine-imposed per-attempt timeout elapsed
    Timeout,
    /// The transport could not complete the exchange
    Transport,
    /// The provider throttled the request
    RateLimited,
    /// The provider reported the request as invalid
    Rejected,
}

impl FailureKind {
    /// Whether retrying the same provider may succeed
    ///
    /// Only [`FailureKind::Rejected`] is non-transient: a provider that calls
    /// a well-formed request invalid will keep doing so.
    pub const fn is_transient(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Timeout => "timeout",
            Self::Transport => "transport error",
            Self::RateLimited => "rate limited",
            Self::Rejected => "rejected by provider",
        };
        f.write_str(label)
    }
}

/// One failed invocation attempt, as reported to the dispatcher
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct AttemptFailure {
    /// Failure classification, required from the transport boundary
    pub kind: FailureKind,
    /// Human-readable detail for diagnostics
    pub message: String,
}

impl AttemptFailure {
    /// Failure for an attempt that exceeded the engine's timeout
    pub fn timeout(after: Duration) -> Self {
        Self {
            kind: FailureKind::Timeout,
            message: format!("no response within {after:?}"),
        }
    }

    /// Failure in the transport before a provider verdict
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }

    /// The provider throttled the request
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::RateLimited,
            message: message.into(),
        }
    }

    /// The provider reported the request as invalid
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Rejected,
            message: message.into(),
        }
    }

    /// Whether retrying the same provider may succeed
    pub const fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

/// Successful provider output
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Generated response text
    pub output: String,
    /// Model identifier the provider reports having used
    pub model: String,
}

/// Uniform invocation capability over one remote provider
///
/// Implementations own the vendor transport and must classify failures into
/// [`FailureKind`] themselves; the engine does not infer transience. The
/// engine imposes its own timeout around `invoke` regardless of any timeout
/// the transport applies internally.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Identifier this provider is registered under
    fn id(&self) -> &ProviderId;

    /// Execute one invocation attempt
    async fn invoke(&self, request: &RoutingRequest) -> Result<ProviderResponse, AttemptFailure>;
}
