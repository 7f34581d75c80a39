//! Error types for vault-engine
//!
//! Only configuration-class problems surface as errors: an unresolvable
//! tool, a tool missing a required capability, an unknown checksum algorithm
//! asked for by the caller, or store/tool I/O. Integrity findings are data,
//! accumulated in a failure set and never raised through an engine boundary.

/// Result type for vault-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the archival engines
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Profile names a tool the registry does not know; fatal for the run
    #[error("Unknown tool {tool} (registered: {known})")]
    ToolNotFound { tool: String, known: String },

    /// Resolved tool lacks a capability the operation needs
    #[error("Tool {tool} does not support {capability}")]
    UnsupportedCapability {
        tool: String,
        capability: &'static str,
    },

    /// A tool implementation failed
    #[error("Tool {tool} failed: {message}")]
    ToolFailure { tool: String, message: String },

    /// Checksum resolution or hashing error
    #[error(transparent)]
    Hash(#[from] vault_hash::Error),

    /// Store error
    #[error(transparent)]
    Store(#[from] vault_store::Error),

    /// Model error
    #[error(transparent)]
    Model(#[from] vault_model::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Convenience constructor for tool implementations.
    pub fn tool_failure(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailure {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
