//! Heuristic prompt-complexity classification
//!
//! Scores a prompt in `[0, 1]` and maps the score through configured
//! thresholds to a routing tier. No ML pipeline — pure heuristics; the
//! routing engine consumes only the resulting [`Tier`], so a model-backed
//! classifier can be substituted behind the same shape.

#![allow(clippy::must_use_candidate)]

pub mod analysis;

pub use analysis::{PromptProfile, TaskType, classify_prompt};
use smartroute_config::{ClassifierConfig, Tier};

/// Map a prompt profile to a routing tier
///
/// Scores below `fast_threshold` route fast, below `mid_threshold` mid,
/// everything else reasoning. The latency tier is never auto-selected —
/// latency-sensitive routing is an explicit caller choice.
pub fn decide_tier(profile: &PromptProfile, thresholds: &ClassifierConfig) -> Tier {
    let tier = if profile.complexity_score < thresholds.fast_threshold {
        Tier::Fast
    } else if profile.complexity_score < thresholds.mid_threshold {
        Tier::Mid
    } else {
        Tier::Reasoning
    };

    tracing::debug!(
        score = profile.complexity_score,
        task_type = ?profile.task_type,
        tokens = profile.estimated_tokens,
        %tier,
        "prompt classified"
    );

    tier
}
