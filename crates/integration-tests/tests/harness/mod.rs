//! Scripted in-process providers for end-to-end engine tests
//!
//! The transport layer is outside the engine, so these providers script
//! outcomes directly instead of standing up a mock HTTP server.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use smartroute_routing::{
    AttemptFailure, BreakerBank, Engine, Provider, ProviderId, ProviderRegistry, ProviderResponse,
    RetryPolicy, RoutingRequest, Tier,
};

static TRACING: Once = Once::new();

/// Install a compact subscriber once so `RUST_LOG` filtering works in tests
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// One scripted invocation outcome
#[derive(Debug, Clone)]
pub enum Step {
    /// Answer immediately
    Succeed,
    /// Fail with the given attempt failure
    Fail(AttemptFailure),
    /// Sleep, then answer
    HangThenSucceed(Duration),
}

/// Provider that replays a script of outcomes, then repeats a fallback step
pub struct ScriptedProvider {
    id: ProviderId,
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    calls: AtomicU32,
}

impl ScriptedProvider {
    /// Always answers
    pub fn healthy(id: &str) -> Arc<Self> {
        Self::with_script(id, Vec::new(), Step::Succeed)
    }

    /// Always fails with a transport error
    pub fn broken(id: &str) -> Arc<Self> {
        Self::with_script(id, Vec::new(), Step::Fail(AttemptFailure::transport("connection refused")))
    }

    /// Fails the first `n` invocations with transport errors, then answers
    pub fn failing(id: &str, n: u32) -> Arc<Self> {
        let steps = (0..n)
            .map(|i| Step::Fail(AttemptFailure::transport(format!("failure {i}"))))
            .collect();
        Self::with_script(id, steps, Step::Succeed)
    }

    /// Always rejects the request as invalid
    pub fn rejecting(id: &str) -> Arc<Self> {
        Self::with_script(id, Vec::new(), Step::Fail(AttemptFailure::rejected("unsupported request")))
    }

    /// Custom script with a fallback for when it runs dry
    pub fn with_script(id: &str, steps: Vec<Step>, fallback: Step) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            script: Mutex::new(steps.into()),
            fallback,
            calls: AtomicU32::new(0),
        })
    }

    /// Number of invocations this provider has received
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn invoke(&self, _request: &RoutingRequest) -> Result<ProviderResponse, AttemptFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match step {
            Step::Succeed => Ok(self.answer()),
            Step::Fail(failure) => Err(failure),
            Step::HangThenSucceed(duration) => {
                tokio::time::sleep(duration).await;
                Ok(self.answer())
            }
        }
    }
}

impl ScriptedProvider {
    fn answer(&self) -> ProviderResponse {
        ProviderResponse {
            output: format!("answer from {}", self.id),
            model: format!("{}-model", self.id),
        }
    }
}

/// Builder for a fully wired engine over scripted providers
pub struct EngineBuilder {
    providers: Vec<Arc<dyn Provider>>,
    tiers: Vec<(Tier, Vec<String>)>,
    failure_threshold: u32,
    cooldown: Duration,
    max_retries: u32,
    attempt_timeout: Duration,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            tiers: Vec::new(),
            failure_threshold: 3,
            cooldown: Duration::from_secs(60),
            max_retries: 0,
            attempt_timeout: Duration::from_millis(500),
        }
    }

    pub fn provider(mut self, provider: Arc<ScriptedProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn tier(mut self, tier: Tier, members: &[&str]) -> Self {
        self.tiers
            .push((tier, members.iter().map(|&m| m.to_owned()).collect()));
        self
    }

    pub fn breaker(mut self, failure_threshold: u32, cooldown: Duration) -> Self {
        self.failure_threshold = failure_threshold;
        self.cooldown = cooldown;
        self
    }

    pub fn retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn build(self) -> Engine {
        init_tracing();

        let mut builder = ProviderRegistry::builder();
        for provider in self.providers {
            builder = builder.provider(provider);
        }
        for (tier, members) in self.tiers {
            builder = builder.tier(tier, members.iter().map(String::as_str));
        }
        let registry = builder.build().expect("harness registry must be valid");

        Engine::new(
            registry,
            BreakerBank::new(self.failure_threshold, self.cooldown),
            RetryPolicy::new(
                self.max_retries,
                self.attempt_timeout,
                Duration::from_millis(1),
                Duration::from_millis(8),
            ),
        )
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
