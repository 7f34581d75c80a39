//! Artifact identity and registration records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identity of one logical item from one tool/group combination.
///
/// Keys are immutable once created and order deterministically, which keeps
/// store listings and failure-set iteration stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    /// Tool that produced the artifact
    pub tool: String,
    /// Group the artifact was filed under
    pub group: String,
    /// Tool-scoped identifier
    pub id: String,
}

impl ArtifactKey {
    /// Create a new key.
    pub fn new(
        tool: impl Into<String>,
        group: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            group: group.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.tool, self.group, self.id)
    }
}

/// Registered metadata for one artifact.
///
/// Created or overwritten whenever a tool re-produces the artifact during a
/// dump or repair run. `full = false` marks an artifact whose resource set is
/// known to be incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    /// Identity of the artifact
    pub key: ArtifactKey,
    /// Human-readable name, if the tool supplied one
    pub name: Option<String>,
    /// Original creation date reported by the source
    pub date: Option<DateTime<Utc>>,
    /// Last update date reported by the source
    pub update_date: Option<DateTime<Utc>>,
    /// Whether the artifact's resource set was completely captured
    pub full: bool,
}

impl ArtifactInfo {
    /// Create a full artifact record with no optional metadata.
    pub fn new(key: ArtifactKey) -> Self {
        Self {
            key,
            name: None,
            date: None,
            update_date: None,
            full: true,
        }
    }

    /// Set the display name (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the artifact as an incomplete capture.
    pub fn partial(mut self) -> Self {
        self.full = false;
        self
    }
}
