//! Provider registry
//!
//! Maps provider identifiers to their invocation capability and holds the
//! ordered tier membership lists. Read-only after construction; all
//! mutable routing state lives in the breaker bank.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use smartroute_config::{Config, Tier};

use crate::provider::Provider;
use crate::request::ProviderId;

struct Registered {
    handle: Arc<dyn Provider>,
    attempt_timeout: Option<Duration>,
}

/// Immutable mapping from provider identifier to invocation capability and
/// tier membership
pub struct ProviderRegistry {
    providers: IndexMap<ProviderId, Registered>,
    tiers: HashMap<Tier, Vec<ProviderId>>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("tiers", &self.tiers)
            .finish()
    }
}

impl ProviderRegistry {
    /// Start building a registry by hand
    ///
    /// Configuration-driven construction should prefer
    /// [`ProviderRegistry::from_config`], which additionally guarantees that
    /// every tier is populated.
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder {
            providers: IndexMap::new(),
            tiers: HashMap::new(),
        }
    }

    /// Build a registry from validated configuration plus the provider
    /// implementations constructed by the transport layer
    ///
    /// # Errors
    ///
    /// Returns an error when an implementation is not declared in
    /// configuration, a declared provider has no implementation, or a
    /// configured timeout fails to parse
    pub fn from_config(config: &Config, providers: Vec<Arc<dyn Provider>>) -> anyhow::Result<Self> {
        let mut builder = Self::builder();

        for provider in providers {
            let name = provider.id().as_str().to_owned();
            let Some(provider_config) = config.providers.get(&name) else {
                anyhow::bail!("provider '{name}' is not declared in configuration");
            };
            let timeout = provider_config
                .attempt_timeout()
                .map_err(|e| anyhow::anyhow!("provider '{name}': {e}"))?;
            builder = match timeout {
                Some(timeout) => builder.provider_with_timeout(provider, timeout),
                None => builder.provider(provider),
            };
        }

        for name in config.providers.keys() {
            if !builder.providers.contains_key(&ProviderId::new(name.as_str())) {
                anyhow::bail!("declared provider '{name}' has no registered implementation");
            }
        }

        for tier in Tier::ALL {
            builder = builder.tier(tier, config.tiers.members(tier).iter().map(String::as_str));
        }

        builder.build()
    }

    /// Configured members of a tier, in priority order
    pub fn providers_for_tier(&self, tier: Tier) -> &[ProviderId] {
        self.tiers.get(&tier).map_or(&[], Vec::as_slice)
    }

    /// Whether an identifier names a registered provider
    pub fn is_known(&self, id: &ProviderId) -> bool {
        self.providers.contains_key(id)
    }

    /// Invocation handle for a provider
    pub fn get(&self, id: &ProviderId) -> Option<Arc<dyn Provider>> {
        self.providers.get(id).map(|r| Arc::clone(&r.handle))
    }

    /// Per-provider attempt-timeout override, when configured
    pub fn attempt_timeout(&self, id: &ProviderId) -> Option<Duration> {
        self.providers.get(id).and_then(|r| r.attempt_timeout)
    }

    /// All registered identifiers, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &ProviderId> {
        self.providers.keys()
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry holds no providers
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Builder for [`ProviderRegistry`]
pub struct ProviderRegistryBuilder {
    providers: IndexMap<ProviderId, Registered>,
    tiers: HashMap<Tier, Vec<ProviderId>>,
}

impl ProviderRegistryBuilder {
    /// Register a provider under its own identifier
    #[must_use]
    pub fn provider(self, provider: Arc<dyn Provider>) -> Self {
        self.register(provider, None)
    }

    /// Register a provider with a per-attempt timeout override
    #[must_use]
    pub fn provider_with_timeout(self, provider: Arc<dyn Provider>, timeout: Duration) -> Self {
        self.register(provider, Some(timeout))
    }

    /// Set a tier's membership, in priority order
    #[must_use]
    pub fn tier<I, T>(mut self, tier: Tier, members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ProviderId>,
    {
        self.tiers
            .insert(tier, members.into_iter().map(Into::into).collect());
        self
    }

    fn register(mut self, provider: Arc<dyn Provider>, attempt_timeout: Option<Duration>) -> Self {
        let id = provider.id().clone();
        self.providers.insert(
            id,
            Registered {
                handle: provider,
                attempt_timeout,
            },
        );
        self
    }

    /// Validate and finish the registry
    ///
    /// # Errors
    ///
    /// Returns an error when a tier references an unregistered provider
    pub fn build(self) -> anyhow::Result<ProviderRegistry> {
        for (tier, members) in &self.tiers {
            for member in members {
                if !self.providers.contains_key(member) {
                    anyhow::bail!("tier '{tier}' references unregistered provider '{member}'");
                }
            }
        }

        Ok(ProviderRegistry {
            providers: self.providers,
            tiers: self.tiers,
        })
    }
}
