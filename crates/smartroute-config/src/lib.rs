#![allow(clippy::must_use_candidate)]

pub mod classifier;
pub mod engine;
mod env;
mod loader;
pub mod providers;
pub mod tiers;

use indexmap::IndexMap;
use serde::Deserialize;

pub use classifier::ClassifierConfig;
pub use engine::{CircuitBreakerConfig, EngineConfig, RetryConfig};
pub use providers::ProviderConfig;
pub use tiers::{Tier, TierConfig};

/// Top-level smartroute configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider declarations keyed by name, in priority-relevant order
    #[serde(default)]
    pub providers: IndexMap<String, ProviderConfig>,
    /// Tier membership lists
    #[serde(default)]
    pub tiers: TierConfig,
    /// Engine tuning (circuit breaker, retry/timeout policy)
    #[serde(default)]
    pub engine: EngineConfig,
    /// Prompt-complexity classifier thresholds
    #[serde(default)]
    pub classifier: ClassifierConfig,
}
