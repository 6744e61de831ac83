use thiserror::Error;

/// Errors from history repository operations (used by trait definitions in relaybot-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("backend connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from the messaging platform's reply API.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("reply request failed: {0}")]
    Transport(String),

    #[error("reply rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("messaging client not configured: {0}")]
    NotConfigured(String),
}

/// Errors while assembling runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}
