use std::env;

use serde::{Deserialize, Serialize};

fn default_provider() -> String {
    "openai".to_string()
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            api_url: default_api_url(),
            model: default_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl BackendConfig {
    pub fn new() -> Self {
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let api_url = env::var("LEXILENS_API_URL").unwrap_or_else(|_| default_api_url());
        let model = env::var("LEXILENS_MODEL").unwrap_or_else(|_| default_model());

        let timeout_seconds = env::var("LEXILENS_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Self {
            provider: default_provider(),
            api_key,
            api_url,
            model,
            timeout_seconds,
        }
    }

    /// Profiles may leave the key blank and rely on the environment
    pub fn resolved_api_key(&self) -> String {
        if self.api_key.is_empty() {
            env::var("OPENAI_API_KEY").unwrap_or_default()
        } else {
            self.api_key.clone()
        }
    }
}
