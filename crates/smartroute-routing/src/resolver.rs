//! Candidate resolution
//!
//! Turns caller intent into the ordered candidate list the dispatcher walks.
//! The list is fixed here: health-based skipping happens in the dispatcher
//! without ever reordering candidates.

use std::collections::HashSet;

use crate::error::RouteError;
use crate::registry::ProviderRegistry;
use crate::request::{ProviderId, RouteIntent};

/// Resolve intent into a deduplicated, ordered candidate list
///
/// Explicit mode validates every entry against the registry and fails fast
/// on the first unknown identifier — no partial list is produced. Tier mode
/// uses the registry's configured order verbatim.
///
/// # Errors
///
/// Returns [`RouteError::UnknownProvider`] for an unknown explicit entry
pub fn resolve(intent: &RouteIntent, registry: &ProviderRegistry) -> Result<Vec<ProviderId>, RouteError> {
    let candidates = match intent {
        RouteIntent::Explicit(order) => {
            for id in order {
                if !registry.is_known(id) {
                    return Err(RouteError::UnknownProvider { provider: id.clone() });
                }
            }
            order.clone()
        }
        RouteIntent::ByTier(tier) => registry.providers_for_tier(*tier).to_vec(),
    };

    Ok(dedup_preserving_first(candidates))
}

fn dedup_preserving_first(candidates: Vec<ProviderId>) -> Vec<ProviderId> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
