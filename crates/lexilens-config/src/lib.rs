use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::backend::BackendConfig;
use self::pricing::PricingConfig;
use self::quota::QuotaConfig;
use self::server::ServerConfig;

pub mod backend;
pub mod pricing;
pub mod quota;
pub mod server;

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub server: ServerConfig,
    pub quota: QuotaConfig,
    pub pricing: PricingConfig,

    /// Where client-held state (history, quota) lives; platform data dir when unset
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Defaults overlaid with whatever the environment provides
    pub fn new() -> Self {
        let data_dir = env::var("LEXILENS_DATA_DIR").ok().map(PathBuf::from);

        Config {
            backend: BackendConfig::new(),
            server: ServerConfig::new(),
            quota: QuotaConfig::new(),
            pricing: PricingConfig::default(),

            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.quota.max_queries_per_day, 25);
        assert_eq!(config.backend.model, "gpt-3.5-turbo");
        assert_eq!(config.server.port, 3000);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn partial_profile_keeps_other_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"quota": {"max_queries_per_day": 3}, "server": {"port": 8080}}"#)
                .unwrap();
        assert_eq!(config.quota.max_queries_per_day, 3);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!((config.pricing.prompt_per_1k - 0.0015).abs() < f64::EPSILON);
    }
}
