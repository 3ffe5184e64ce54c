use lexilens_types::TokenUsage;

pub mod openai;

pub use openai::OpenAiBackend;

/// Generative-text provider interface
#[async_trait::async_trait]
pub trait DefinitionBackend: Send + Sync {
    /// Produce text for a single natural-language instruction
    async fn generate(&self, prompt: &str) -> Result<Completion, BackendError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}
