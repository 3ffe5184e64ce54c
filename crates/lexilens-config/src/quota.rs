use std::env;

use serde::{Deserialize, Serialize};

fn default_max_queries_per_day() -> u32 {
    25
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct QuotaConfig {
    /// Successful lookups allowed per rolling 24h window
    #[serde(default = "default_max_queries_per_day")]
    pub max_queries_per_day: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_queries_per_day: default_max_queries_per_day(),
        }
    }
}

impl QuotaConfig {
    pub fn new() -> Self {
        let max_queries_per_day = env::var("LEXILENS_MAX_QUERIES_PER_DAY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_queries_per_day);

        Self {
            max_queries_per_day,
        }
    }
}
