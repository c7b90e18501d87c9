//! Request types consumed by the engine
//!
//! A [`RoutingRequest`] arrives already validated by the endpoint layer; the
//! engine never inspects prompt content or attachment bytes.

use std::fmt;
use std::sync::Arc;

use smartroute_config::Tier;

use crate::error::RouteError;

/// Opaque identifier naming one remote provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(Arc<str>);

impl ProviderId {
    /// Create an identifier from any string-like value
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProviderId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Reference to an already validated uploaded file
///
/// The engine passes attachments through untouched; fetching and validating
/// the underlying bytes is the transport layer's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Storage identifier of the uploaded file
    pub id: String,
    /// Declared media type (e.g. "image/png")
    pub media_type: String,
}

/// How the caller wants candidates selected
///
/// Exactly two constructors by design: supplying both an explicit order and
/// a tier, or neither, is unrepresentable here. Callers translating loose
/// input (two optional fields) go through [`RouteIntent::from_parts`], which
/// enforces the mutual exclusion before the engine is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteIntent {
    /// Caller-supplied provider order, tried verbatim
    Explicit(Vec<ProviderId>),
    /// Configured membership of a tier, in configuration order
    ByTier(Tier),
}

impl RouteIntent {
    /// Build an intent from independently optional caller fields
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidIntent`] when both or neither of the
    /// fields are present
    pub fn from_parts(
        explicit: Option<Vec<ProviderId>>,
        tier: Option<Tier>,
    ) -> Result<Self, RouteError> {
        match (explicit, tier) {
            (Some(order), None) => Ok(Self::Explicit(order)),
            (None, Some(tier)) => Ok(Self::ByTier(tier)),
            (Some(_), Some(_)) => Err(RouteError::InvalidIntent(
                "choose either an explicit provider order or a tier, not both",
            )),
            (None, None) => Err(RouteError::InvalidIntent(
                "an explicit provider order or a tier is required",
            )),
        }
    }
}

/// One validated unit of work, immutable for the duration of a dispatch
#[derive(Debug, Clone)]
pub struct RoutingRequest {
    /// Prompt text to send to the selected provider
    pub prompt: String,
    /// Ordered attachment references, possibly empty
    pub attachments: Vec<AttachmentRef>,
    /// Candidate selection mode
    pub intent: RouteIntent,
}

impl RoutingRequest {
    /// Create a request with no attachments
    pub fn new(prompt: impl Into<String>, intent: RouteIntent) -> Self {
        Self {
            prompt: prompt.into(),
            attachments: Vec::new(),
            intent,
        }
    }

    /// Attach file references, preserving their order
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<AttachmentRef>) -> Self {
        self.attachments = attachments;
        self
    }
}
