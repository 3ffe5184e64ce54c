use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;

/// Longest accepted query, in whitespace-separated words
pub const MAX_QUERY_WORDS: usize = 3;

/// A trimmed, non-empty search term of at most three words
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Query {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

/// Trim and check raw user input. Case, script and inner spacing are left alone.
pub fn validate(raw: &str) -> Result<Query, ValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Missing);
    }

    if trimmed.split_whitespace().count() > MAX_QUERY_WORDS {
        return Err(ValidationError::TooManyWords);
    }

    Ok(Query(trimmed.to_string()))
}

/// Latin letters, whitespace, apostrophes and hyphens only.
///
/// Decides whether pronunciation playback is offered; has no bearing on
/// whether a query may be looked up.
pub fn is_ascii_word(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '\'' || c == '-')
}
