use serde::Deserialize;

/// Complexity-score thresholds for automatic tier selection
///
/// Scores are in `[0, 1]`. A prompt scoring below `fast_threshold` routes to
/// the fast tier, below `mid_threshold` to mid, and everything else to
/// reasoning. The latency tier is only ever chosen explicitly by the caller.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Upper bound (exclusive) for routing to the fast tier
    #[serde(default = "default_fast_threshold")]
    pub fast_threshold: f64,
    /// Upper bound (exclusive) for routing to the mid tier
    #[serde(default = "default_mid_threshold")]
    pub mid_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fast_threshold: default_fast_threshold(),
            mid_threshold: default_mid_threshold(),
        }
    }
}

const fn default_fast_threshold() -> f64 {
    0.30
}

const fn default_mid_threshold() -> f64 {
    0.42
}
