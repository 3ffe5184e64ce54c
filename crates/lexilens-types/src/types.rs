use serde::{Deserialize, Serialize};

/// Token counters reported by the definition backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    #[serde(alias = "prompt_tokens")]
    pub prompt_tokens: u64,
    #[serde(alias = "completion_tokens")]
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Lexical explanation of a single query, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub definition: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub examples: Vec<String>,
    #[serde(default)]
    pub fact: Option<String>,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    UiEvent(UiEvent),
    ShowResult {
        query: String,
        result: LookupResult,
    },
    ShowError(String),
    ShowHistory(Vec<String>),
    ShowQuota {
        remaining: u32,
        limit: u32,
        resets_at: Option<String>,
    },
    BackendReady,
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Raw text typed by the user
    Lookup(String),
    /// Look up the n-th history entry again (1-based)
    Recall(usize),
    ShowHistory,
    ShowQuota,
    Close,
}
