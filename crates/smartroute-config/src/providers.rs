use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Declaration of a single remote provider
///
/// The engine treats providers as opaque invocation capabilities; everything
/// here besides `timeout` is consumed by the transport layer that builds the
/// actual vendor client.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Vendor model identifier the transport sends upstream
    pub model: String,
    /// API key for the vendor account
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Per-attempt timeout override (e.g. "30s"); engine default applies when absent
    #[serde(default)]
    pub timeout: Option<String>,
}

impl ProviderConfig {
    /// Parsed per-attempt timeout override
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a valid duration string
    pub fn attempt_timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|s| {
                duration_str::parse(s).map_err(|e| anyhow::anyhow!("invalid timeout '{s}': {e}"))
            })
            .transpose()
    }
}
