//! Error types for vault-model

/// Result type for vault-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling model data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Profile list could not be parsed
    #[error("Invalid profile data: {0}")]
    InvalidProfile(String),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
