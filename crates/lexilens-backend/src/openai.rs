use std::time::Duration;

use async_trait::async_trait;
use lexilens_types::TokenUsage;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{BackendError, Completion, DefinitionBackend, ProviderMetadata};

/// Chat-completions client for OpenAI-compatible endpoints
#[derive(Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url,
            model,
        }
    }

    pub fn with_timeout(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            api_url,
            model,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pull the first choice and usage counters out of a raw response body
fn completion_from_body(body: &str) -> Result<Completion, BackendError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| BackendError::ApiError(format!("Failed to parse response: {}", e)))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| BackendError::ApiError("No completion in response".to_string()))?;

    Ok(Completion {
        content,
        usage: response.usage.unwrap_or_default(),
    })
}

/// Map a non-success HTTP status onto the backend error it stands for
fn error_for_status(status: StatusCode) -> Option<BackendError> {
    if status.is_success() {
        return None;
    }

    Some(match status {
        StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimitExceeded,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::AuthenticationError,
        _ => BackendError::ApiError(format!("HTTP {}", status)),
    })
}

#[async_trait]
impl DefinitionBackend for OpenAiBackend {
    async fn generate(&self, prompt: &str) -> Result<Completion, BackendError> {
        if self.api_key.is_empty() {
            return Err(BackendError::AuthenticationError);
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.model, "sending chat completion request");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if let Some(err) = error_for_status(response.status()) {
            return Err(err);
        }

        let body = response.text().await?;
        completion_from_body(&body)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "OpenAI".to_string(),
            model: self.model.clone(),
            requires_api_key: true,
        }
    }
}
