use lexilens_backend::BackendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing word")]
    Missing,

    #[error("Please enter no more than 3 words")]
    TooManyWords,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed definition: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Definition text is empty")]
    EmptyDefinition,
}

/// Why a single backend round trip produced no result
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("Daily lookup limit reached, try again later")]
    QuotaExceeded,

    /// Display stays generic; the source carries the details for logs
    #[error("Failed to fetch definition")]
    BackendFailure(#[source] FetchError),

    #[error("Failed to save lookup state")]
    Persistence(#[source] StoreError),
}
