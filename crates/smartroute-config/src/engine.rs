use std::time::Duration;

use serde::Deserialize;

/// Engine tuning: circuit breaker and retry/timeout policy
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Per-provider circuit breaker settings
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
    /// Per-attempt retry and timeout settings
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Circuit breaker settings, shared by every provider's breaker
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that trip the breaker open
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// How long an open breaker waits before admitting a trial call
    #[serde(default = "default_cooldown")]
    pub cooldown: String,
}

impl CircuitBreakerConfig {
    /// Parsed cool-down duration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a valid duration string
    pub fn cooldown(&self) -> anyhow::Result<Duration> {
        parse_duration("circuit_breaker.cooldown", &self.cooldown)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            cooldown: default_cooldown(),
        }
    }
}

/// Retry/timeout policy settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Additional attempts after the first, per candidate
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Engine-imposed timeout around one provider invocation
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout: String,
    /// First backoff delay; doubles on each further retry
    #[serde(default = "default_backoff_base")]
    pub backoff_base: String,
    /// Upper bound on a single backoff delay
    #[serde(default = "default_backoff_cap")]
    pub backoff_cap: String,
}

impl RetryConfig {
    /// Parsed per-attempt timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a valid duration string
    pub fn attempt_timeout(&self) -> anyhow::Result<Duration> {
        parse_duration("retry.attempt_timeout", &self.attempt_timeout)
    }

    /// Parsed base backoff delay
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a valid duration string
    pub fn backoff_base(&self) -> anyhow::Result<Duration> {
        parse_duration("retry.backoff_base", &self.backoff_base)
    }

    /// Parsed backoff cap
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a valid duration string
    pub fn backoff_cap(&self) -> anyhow::Result<Duration> {
        parse_duration("retry.backoff_cap", &self.backoff_cap)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            attempt_timeout: default_attempt_timeout(),
            backoff_base: default_backoff_base(),
            backoff_cap: default_backoff_cap(),
        }
    }
}

fn parse_duration(field: &str, value: &str) -> anyhow::Result<Duration> {
    duration_str::parse(value).map_err(|e| anyhow::anyhow!("invalid {field} '{value}': {e}"))
}

const fn default_failure_threshold() -> u32 {
    3
}

fn default_cooldown() -> String {
    "30s".to_owned()
}

const fn default_max_retries() -> u32 {
    2
}

fn default_attempt_timeout() -> String {
    "60s".to_owned()
}

fn default_backoff_base() -> String {
    "250ms".to_owned()
}

fn default_backoff_cap() -> String {
    "4s".to_owned()
}
