//! Error types for vault-hash

/// Result type for vault-hash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during checksum resolution or hashing
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested algorithm id is not in the registry
    #[error("Unknown checksum algorithm: {id} (known: {known})")]
    UnknownAlgorithm { id: String, known: String },

    /// Standard I/O error while streaming content
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
