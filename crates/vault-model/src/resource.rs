//! Resource identity and registration records

use crate::{ArtifactKey, Checksum};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Addressable location of one resource within its artifact's namespace.
///
/// `path` is a forward-slash relative directory (possibly empty) and `file`
/// the leaf name. The pair is unique per artifact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactResourceKey {
    /// Owning artifact
    pub artifact: ArtifactKey,
    /// Relative directory within the artifact, `""` for the root
    pub path: String,
    /// Leaf file name
    pub file: String,
}

impl ArtifactResourceKey {
    /// Create a new resource key.
    pub fn new(
        artifact: ArtifactKey,
        path: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            artifact,
            path: path.into(),
            file: file.into(),
        }
    }

    /// The `path/file` form used in logs and failure reports.
    pub fn info_path(&self) -> String {
        if self.path.is_empty() {
            self.file.clone()
        } else {
            format!("{}/{}", self.path, self.file)
        }
    }
}

impl fmt::Display for ArtifactResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.artifact, self.info_path())
    }
}

/// Registered metadata for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactResourceInfo {
    /// Identity of the resource
    pub key: ArtifactResourceKey,
    /// MIME content type, if known
    pub content_type: Option<String>,
    /// Last-updated timestamp reported by the source
    pub updated: Option<DateTime<Utc>>,
    /// Source-defined version string
    pub version: Option<String>,
    /// Integrity tag over the stored content, if one was computed
    pub checksum: Option<Checksum>,
    /// Whether the resource carries source metadata usable for change detection
    pub uses_metadata: bool,
}

impl ArtifactResourceInfo {
    /// Create a resource record with no optional metadata.
    pub fn new(key: ArtifactResourceKey) -> Self {
        Self {
            key,
            content_type: None,
            updated: None,
            version: None,
            checksum: None,
            uses_metadata: false,
        }
    }

    /// Set the content type (builder pattern).
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the updated timestamp and mark the record as metadata-bearing.
    pub fn with_updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = Some(updated);
        self.uses_metadata = true;
        self
    }

    /// Set the version string and mark the record as metadata-bearing.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self.uses_metadata = true;
        self
    }

    /// Replace the checksum (builder pattern).
    pub fn with_checksum(mut self, checksum: Option<Checksum>) -> Self {
        self.checksum = checksum;
        self
    }

    /// Whether this incoming record's source metadata differs from a
    /// previously stored record for the same key.
    ///
    /// A record that carries no usable metadata always counts as different:
    /// without version or timestamp there is nothing to prove the content
    /// unchanged, so soft updates must refetch.
    pub fn is_metadata_different(&self, stored: &ArtifactResourceInfo) -> bool {
        if !self.uses_metadata {
            return true;
        }
        self.version != stored.version
            || self.updated != stored.updated
            || self.content_type != stored.content_type
    }
}
