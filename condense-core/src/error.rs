//! Error types for Condense operations

/// Result type for Condense operations
pub type Result<T> = std::result::Result<T, CondenseError>;

/// Error types for the compaction middleware
#[derive(Debug, thiserror::Error)]
pub enum CondenseError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// LLM provider transport or protocol failure
    #[error("Provider error: {0}")]
    Provider(String),

    /// The summarization call produced no usable summary
    #[error("Summarization failed: {0}")]
    Summarization(String),

    /// A chat request filter failed
    #[error("Filter error: {0}")]
    Filter(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for CondenseError {
    fn from(s: String) -> Self {
        CondenseError::Other(s)
    }
}

impl From<&str> for CondenseError {
    fn from(s: &str) -> Self {
        CondenseError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for CondenseError {
    fn from(err: anyhow::Error) -> Self {
        CondenseError::Other(err.to_string())
    }
}
