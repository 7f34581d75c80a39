//! Dump policy enums and options
//!
//! The two mode enums encode the full persistence decision table:
//!
//! | `ResourceUpdateMode` | granularity | force level |
//! |----------------------|-------------|-------------|
//! | `ArtifactSoft`       | per artifact: a fully known artifact skips all of its resources | refetch only metadata-different resources |
//! | `ArtifactHard`       | per artifact: a fully known artifact skips all of its resources | always refetch resources of processed artifacts |
//! | `Soft`               | per resource, even inside known artifacts | refetch only metadata-different resources |
//! | `Hard`               | per resource, even inside known artifacts | always refetch and overwrite |
//!
//! | `ArtifactSkipMode` | behaviour on an already-registered artifact |
//! |--------------------|---------------------------------------------|
//! | `None`             | process it anyway |
//! | `Known`            | skip it, keep enumerating |
//! | `FastExit`         | stop enumeration entirely (newest-first sources) |

use serde::{Deserialize, Serialize};

/// How previously stored resource content is re-fetched or overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ResourceUpdateMode {
    /// Skip every resource of a known full artifact; within processed
    /// artifacts, refetch only metadata-different resources.
    #[default]
    ArtifactSoft,
    /// Skip every resource of a known full artifact; within processed
    /// artifacts, always refetch.
    ArtifactHard,
    /// Decide per resource; refetch only metadata-different resources.
    Soft,
    /// Decide per resource; always refetch and overwrite.
    Hard,
}

impl ResourceUpdateMode {
    /// Whether the skip decision is made once per artifact rather than per
    /// resource.
    pub fn is_artifact_granular(self) -> bool {
        matches!(self, Self::ArtifactSoft | Self::ArtifactHard)
    }

    /// Whether resources are refetched unconditionally.
    pub fn is_hard(self) -> bool {
        matches!(self, Self::ArtifactHard | Self::Hard)
    }
}

/// How enumeration reacts to artifacts that are already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactSkipMode {
    /// Process every enumerated artifact regardless of prior state.
    #[default]
    None,
    /// Skip known artifacts but keep enumerating; handles sources with
    /// non-monotonic ordering.
    Known,
    /// Stop enumeration at the first known artifact; assumes the tool
    /// enumerates newest-first, so everything after it is known too.
    FastExit,
}

/// Policy options for one dump run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpOptions {
    /// Resource overwrite policy
    pub update_mode: ResourceUpdateMode,
    /// Whether artifacts marked `full = false` are processed at all
    pub include_non_full: bool,
    /// Enumeration short-circuit policy
    pub skip_mode: ArtifactSkipMode,
    /// Checksum algorithm for newly written content; `None` or `"none"`
    /// disables checksumming
    pub checksum_algorithm_id: Option<String>,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            update_mode: ResourceUpdateMode::ArtifactSoft,
            include_non_full: true,
            skip_mode: ArtifactSkipMode::None,
            checksum_algorithm_id: Some("SHA256".to_string()),
        }
    }
}
