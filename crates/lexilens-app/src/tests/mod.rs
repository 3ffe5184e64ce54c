
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lexilens_backend::{BackendError, Completion, DefinitionBackend, ProviderMetadata};
use lexilens_types::TokenUsage;

pub const GOOD_REPLY: &str = r#"{"definition":"The capacity to recover quickly.","synonyms":["toughness"],"antonyms":["fragility"],"examples":["She showed resilience."],"fact":"From Latin resilire."}"#;

/// Backend returning a fixed reply and counting calls
pub struct StubBackend {
    reply: Option<&'static str>,
    calls: AtomicUsize,
}

impl StubBackend {
    pub fn replying(content: &'static str) -> Self {
        Self {
            reply: Some(content),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DefinitionBackend for StubBackend {
    async fn generate(&self, _prompt: &str) -> Result<Completion, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Some(content) => Ok(Completion {
                content: content.to_string(),
                usage: TokenUsage::new(57, 143),
            }),
            None => Err(BackendError::AuthenticationError),
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "stub".to_string(),
            model: "stub".to_string(),
            requires_api_key: false,
        }
    }
}
