use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use lexilens_backend::{DefinitionBackend, OpenAiBackend};
use lexilens_config::Config;
use lexilens_config::backend::BackendConfig;
use lexilens_core::{CostEstimator, FileStore, LookupClient};
use tokio::sync::RwLock;

use crate::profile;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub backend: Arc<dyn DefinitionBackend>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn DefinitionBackend>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            backend,
        }
    }

    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let backend = build_backend(&config.backend)?;
        Ok(Self::new(config, backend))
    }
}

pub fn build_backend(config: &BackendConfig) -> anyhow::Result<Arc<dyn DefinitionBackend>> {
    let api_key = config.resolved_api_key();

    match config.provider.as_str() {
        "openai" => {
            let backend = OpenAiBackend::with_timeout(
                api_key,
                config.api_url.clone(),
                config.model.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?;
            Ok(Arc::new(backend))
        }
        other => bail!("Unsupported backend provider: {other}"),
    }
}

/// Lookup client backed by the profile's state file
pub fn open_client(
    config: &Config,
    profile: &str,
    backend: Arc<dyn DefinitionBackend>,
) -> anyhow::Result<LookupClient<FileStore>> {
    let path = profile::client_state_path(config, profile);
    let mut store = FileStore::open(&path)?;
    let client_id = lexilens_core::storage::client_id(&mut store)?;
    tracing::debug!(%client_id, path = %path.display(), "opened client state");

    Ok(LookupClient::new(
        backend,
        store,
        config.quota.max_queries_per_day,
    ))
}

pub fn warn_if_no_api_key(config: &Config, backend: &dyn DefinitionBackend) {
    let meta = backend.metadata();
    if meta.requires_api_key && config.backend.resolved_api_key().is_empty() {
        tracing::warn!(
            provider = %meta.name,
            "No API key configured, lookups will fail until OPENAI_API_KEY is set"
        );
    }
}

pub fn cost_estimator(config: &Config) -> CostEstimator {
    CostEstimator::new(config.pricing.prompt_per_1k, config.pricing.completion_per_1k)
}
