//! Error types for vault-store

use std::path::PathBuf;
use vault_model::ArtifactResourceKey;

/// Result type for vault-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Resource content is not present in the data store
    #[error("Content not found for resource {key}")]
    ContentNotFound { key: ArtifactResourceKey },

    /// A key segment cannot be mapped to a filesystem path
    #[error("Key segment {segment:?} is not valid for on-disk storage")]
    InvalidKeySegment { segment: String },

    /// Store root directory could not be prepared
    #[error("Failed to prepare store directory {path}")]
    StoreRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
