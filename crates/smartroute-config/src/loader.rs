use std::path::Path;

use crate::{Config, Tier};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `${VAR}` placeholders, then deserializes and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw)
            .map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self =
            toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// Tier membership, engine tuning, and classifier thresholds are all
    /// checked here so that misconfiguration surfaces at startup, never at
    /// request time.
    ///
    /// # Errors
    ///
    /// Returns an error on the first inconsistency found
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_providers()?;
        self.validate_tiers()?;
        self.validate_engine()?;
        self.validate_classifier()?;
        Ok(())
    }

    fn validate_providers(&self) -> anyhow::Result<()> {
        if self.providers.is_empty() {
            anyhow::bail!("at least one provider must be configured");
        }

        for (name, provider) in &self.providers {
            provider
                .attempt_timeout()
                .map_err(|e| anyhow::anyhow!("provider '{name}': {e}"))?;
        }

        Ok(())
    }

    fn validate_tiers(&self) -> anyhow::Result<()> {
        for tier in Tier::ALL {
            let members = self.tiers.members(tier);
            if members.is_empty() {
                anyhow::bail!("tier '{tier}' has no members");
            }
            for member in members {
                if !self.providers.contains_key(member) {
                    anyhow::bail!("tier '{tier}' references undeclared provider '{member}'");
                }
            }
        }

        for name in self.providers.keys() {
            let in_any_tier = Tier::ALL
                .iter()
                .any(|tier| self.tiers.members(*tier).iter().any(|m| m == name));
            if !in_any_tier {
                tracing::warn!(provider = %name, "provider is not a member of any tier");
            }
        }

        Ok(())
    }

    fn validate_engine(&self) -> anyhow::Result<()> {
        if self.engine.circuit_breaker.failure_threshold == 0 {
            anyhow::bail!("circuit_breaker.failure_threshold must be at least 1");
        }

        self.engine.circuit_breaker.cooldown()?;
        self.engine.retry.attempt_timeout()?;
        let base = self.engine.retry.backoff_base()?;
        let cap = self.engine.retry.backoff_cap()?;

        if cap < base {
            anyhow::bail!("retry.backoff_cap must not be below retry.backoff_base");
        }

        Ok(())
    }

    fn validate_classifier(&self) -> anyhow::Result<()> {
        let fast = self.classifier.fast_threshold;
        let mid = self.classifier.mid_threshold;

        if fast <= 0.0 || fast >= 1.0 || mid <= 0.0 || mid >= 1.0 {
            anyhow::bail!("classifier thresholds must lie in (0, 1)");
        }
        if fast >= mid {
            anyhow::bail!("classifier.fast_threshold must be below classifier.mid_threshold");
        }

        Ok(())
    }
}
