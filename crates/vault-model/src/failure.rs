//! Validation failure set
//!
//! The failure set is an owned value. Validation builds one, repair receives
//! a copy of it; the two engines never alias the same map.

use crate::{ArtifactKey, ArtifactResourceInfo, ArtifactResourceKey};
use std::collections::BTreeMap;

/// Resources that failed integrity validation, grouped by owning artifact.
///
/// Iteration order is deterministic (sorted by artifact key), so reports and
/// repair passes are reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailureSet {
    failed: BTreeMap<ArtifactKey, Vec<ArtifactResourceInfo>>,
}

impl ValidationFailureSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failed resource under its owning artifact.
    pub fn add_fail(&mut self, resource: ArtifactResourceInfo) {
        self.failed
            .entry(resource.key.artifact.clone())
            .or_default()
            .push(resource);
    }

    /// Whether any artifact has failures.
    pub fn any_failed(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Total failed resources across all artifacts.
    pub fn resource_failures(&self) -> usize {
        self.failed.values().map(Vec::len).sum()
    }

    /// Number of artifacts with at least one failure.
    pub fn artifact_failures(&self) -> usize {
        self.failed.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.failed.is_empty()
    }

    /// Failed resources for one artifact.
    pub fn get(&self, key: &ArtifactKey) -> Option<&[ArtifactResourceInfo]> {
        self.failed.get(key).map(Vec::as_slice)
    }

    /// Artifact keys with failures, in sorted order.
    pub fn artifact_keys(&self) -> impl Iterator<Item = &ArtifactKey> {
        self.failed.keys()
    }

    /// Iterate artifacts and their failed resources.
    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactKey, &[ArtifactResourceInfo])> {
        self.failed.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Iterate every failed resource across all artifacts.
    pub fn resources(&self) -> impl Iterator<Item = &ArtifactResourceInfo> {
        self.failed.values().flatten()
    }

    /// Remove one healed resource; drops the artifact entry when its list
    /// empties.
    pub fn remove_resource(&mut self, key: &ArtifactResourceKey) {
        if let Some(list) = self.failed.get_mut(&key.artifact) {
            list.retain(|r| &r.key != key);
            if list.is_empty() {
                self.failed.remove(&key.artifact);
            }
        }
    }

    /// Remove an entire artifact entry.
    pub fn remove_artifact(&mut self, key: &ArtifactKey) {
        self.failed.remove(key);
    }
}
