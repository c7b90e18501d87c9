use serde::{Deserialize, Serialize};

/// Named class of providers grouped by intended use
///
/// Membership is configuration, not runtime state. A provider may appear in
/// any number of tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    /// Cheap, quick models for low-complexity prompts
    Fast,
    /// General-purpose middle ground
    Mid,
    /// Strongest models for high-complexity prompts
    Reasoning,
    /// Ordering optimized for time-to-first-answer
    Latency,
}

impl Tier {
    /// All tiers, in ascending capability order
    pub const ALL: [Self; 4] = [Self::Fast, Self::Mid, Self::Reasoning, Self::Latency];
}

/// Ordered provider membership per tier
///
/// List order is priority order: the first-listed provider is tried first.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    #[serde(default)]
    pub fast: Vec<String>,
    #[serde(default)]
    pub mid: Vec<String>,
    #[serde(default)]
    pub reasoning: Vec<String>,
    #[serde(default)]
    pub latency: Vec<String>,
}

impl TierConfig {
    /// Configured members of a tier, in priority order
    pub fn members(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Fast => &self.fast,
            Tier::Mid => &self.mid,
            Tier::Reasoning => &self.reasoning,
            Tier::Latency => &self.latency,
        }
    }
}
