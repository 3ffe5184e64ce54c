use serde::{Deserialize, Serialize};

fn default_prompt_per_1k() -> f64 {
    0.0015
}

fn default_completion_per_1k() -> f64 {
    0.002
}

/// USD per 1000 tokens
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PricingConfig {
    #[serde(default = "default_prompt_per_1k")]
    pub prompt_per_1k: f64,
    #[serde(default = "default_completion_per_1k")]
    pub completion_per_1k: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            prompt_per_1k: default_prompt_per_1k(),
            completion_per_1k: default_completion_per_1k(),
        }
    }
}
