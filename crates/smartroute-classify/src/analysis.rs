//! Prompt scoring signals
//!
//! Blends six weighted signals — creativity, reasoning, constraint count,
//! domain knowledge, context volume, few-shot structure — into one
//! complexity score. Weights follow the upstream task-and-complexity
//! classifier's blend so threshold tuning carries over.

#![allow(clippy::cast_precision_loss)]

use std::sync::LazyLock;

use regex::Regex;

/// Matches per signal at which that signal saturates to 1.0
const SIGNAL_SATURATION: f64 = 3.0;

/// Token count at which the context-volume signal saturates
const CONTEXT_TOKEN_SATURATION: f64 = 2_000.0;

/// Broad task classification for a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    /// Code generation, debugging, implementation
    Code,
    /// Mathematical reasoning, calculations, proofs
    Math,
    /// Creative writing, storytelling
    Creative,
    /// Data analysis, analytics, statistical queries
    Analysis,
    /// Short factual questions
    SimpleQa,
    /// Everything else
    General,
}

/// Scored profile of one prompt
#[derive(Debug, Clone)]
pub struct PromptProfile {
    /// Blended complexity score in `[0, 1]`
    pub complexity_score: f64,
    /// Classified task type
    pub task_type: TaskType,
    /// Estimated token count of the prompt
    pub estimated_tokens: usize,
}

// -- Regex tables compiled once via LazyLock --

static CREATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:write|compose|draft)\s+(?:a|an|the|some)?\s*(?:story|poem|song|novel|essay|screenplay|lyrics)\b|\b(?:imagine|fiction|narrat|protagonist|world-?building|plot\s+twist)")
        .expect("must be valid regex")
});

static REASONING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:prove|derive|deduce|step[-\s]by[-\s]step|chain of thought|explain why|justify|trade-?offs?|optimal|theorem|implications?)\b")
        .expect("must be valid regex")
});

static CONSTRAINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:must(?:\s+not)?|at (?:least|most)|no (?:more|fewer) than|exactly|between \d+ and \d+|without using|limited? to|in under \d+)\b|(?m)^\s*(?:\d+[.)]|[-*])\s+")
        .expect("must be valid regex")
});

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```\w*|(?m)^(?:use |import |from |#include )|\b[\w./\\-]+\.(?:rs|ts|py|go|java|cpp|sql)\b|\\(?:frac|sum|int|sqrt|begin\{)|\b(?:pursuant|plaintiff|diagnosis|pathology|amortization|derivative[s]? pricing)\b")
        .expect("must be valid regex")
});

static FEW_SHOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:example\s*\d*\s*:|input\s*:|output\s*:|q\s*:|a\s*:)").expect("must be valid regex")
});

static MATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:calculate|solve|equation|integral|matrix|probability)\b|[=<>≤≥≠±×÷∈∀∃]|\\(?:frac|sum|int)")
        .expect("must be valid regex")
});

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)```|\b(?:function|refactor|debug|compile|stack trace|unit test|implement)\b|\b(?:fn|def|class|async)\s+\w+")
        .expect("must be valid regex")
});

static ANALYSIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:analy[sz]e|correlat|regression|distribution|dataset|csv|aggregate|trend|outlier)\b")
        .expect("must be valid regex")
});

/// Score a prompt for routing
pub fn classify_prompt(prompt: &str) -> PromptProfile {
    let estimated_tokens = estimate_tokens(prompt);

    let creativity = saturating_signal(CREATIVE_RE.find_iter(prompt).count());
    let reasoning = saturating_signal(REASONING_RE.find_iter(prompt).count());
    let constraints = saturating_signal(CONSTRAINT_RE.find_iter(prompt).count());
    let domain = saturating_signal(DOMAIN_RE.find_iter(prompt).count());
    let context = (estimated_tokens as f64 / CONTEXT_TOKEN_SATURATION).min(1.0);
    let few_shot = saturating_signal(FEW_SHOT_RE.find_iter(prompt).count());

    // Same blend as the upstream prompt-task-and-complexity classifier
    let complexity_score = 0.35 * creativity
        + 0.25 * reasoning
        + 0.15 * constraints
        + 0.15 * domain
        + 0.05 * context
        + 0.05 * few_shot;

    PromptProfile {
        complexity_score,
        task_type: classify_task(prompt),
        estimated_tokens,
    }
}

/// Scale a raw match count into `[0, 1]`
fn saturating_signal(matches: usize) -> f64 {
    (matches as f64 / SIGNAL_SATURATION).min(1.0)
}

/// Estimate token count using tiktoken, falling back to a byte heuristic
fn estimate_tokens(text: &str) -> usize {
    tiktoken_rs::o200k_base().map_or_else(|_| text.len() / 4, |bpe| bpe.encode_with_special_tokens(text).len())
}

/// Classify the broad task type of a prompt
fn classify_task(prompt: &str) -> TaskType {
    if CODE_RE.is_match(prompt) {
        TaskType::Code
    } else if MATH_RE.is_match(prompt) {
        TaskType::Math
    } else if CREATIVE_RE.is_match(prompt) {
        TaskType::Creative
    } else if ANALYSIS_RE.is_match(prompt) {
        TaskType::Analysis
    } else if prompt.split_whitespace().count() < 25 && prompt.contains('?') {
        TaskType::SimpleQa
    } else {
        TaskType::General
    }
}
