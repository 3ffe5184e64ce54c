use lexilens_backend::DefinitionBackend;
use lexilens_types::{LookupResult, TokenUsage};
use serde::Deserialize;

use crate::error::{FetchError, ParseError};

/// The single instruction sent to the backend for one lookup
pub fn build_prompt(term: &str) -> String {
    format!(
        "Define the word \"{term}\". Also include synonyms, antonyms, a couple of usage examples, \
         and an interesting fact if available. Respond in JSON format with keys: definition, \
         synonyms, antonyms, examples, fact."
    )
}

/// Lexical fields as decoded from backend text
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Definition {
    pub definition: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub examples: Vec<String>,
    #[serde(default)]
    pub fact: Option<String>,
}

impl Definition {
    pub fn into_result(self, usage: TokenUsage) -> LookupResult {
        let fact = self.fact.filter(|f| !f.trim().is_empty());

        LookupResult {
            definition: self.definition,
            synonyms: self.synonyms,
            antonyms: self.antonyms,
            examples: self.examples,
            fact,
            usage,
        }
    }
}

/// Drop a single surrounding ``` or ```json fence
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // Skip the info string, e.g. "json"
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim_start().starts_with('{') => inner.trim(),
        _ => body.trim(),
    }
}

/// Decode backend text strictly; any shape other than the five fields fails
pub fn parse_definition(content: &str) -> Result<Definition, ParseError> {
    let definition: Definition = serde_json::from_str(strip_code_fence(content))?;

    if definition.definition.trim().is_empty() {
        return Err(ParseError::EmptyDefinition);
    }

    Ok(definition)
}

/// One backend round trip for `term`: prompt, generate, decode
pub async fn fetch_definition(
    backend: &dyn DefinitionBackend,
    term: &str,
) -> Result<LookupResult, FetchError> {
    let prompt = build_prompt(term);
    let completion = backend.generate(&prompt).await?;

    tracing::debug!(
        prompt_tokens = completion.usage.prompt_tokens,
        completion_tokens = completion.usage.completion_tokens,
        "backend responded"
    );

    let definition = parse_definition(&completion.content)?;
    Ok(definition.into_result(completion.usage))
}
