//! Fixture helpers
//!
//! Small constructors for the keys and records that nearly every engine
//! test needs, plus [`session`] wiring the in-memory stores into a
//! [`ToolConfig`].

use std::sync::Arc;
use vault_engine::ToolConfig;
use vault_model::{ArtifactInfo, ArtifactKey, ArtifactResourceInfo, ArtifactResourceKey};
use vault_store::{MemoryDataStore, MemoryRegistrationStore};

/// A full artifact record with no optional metadata.
pub fn artifact(tool: &str, group: &str, id: &str) -> ArtifactInfo {
    ArtifactInfo::new(ArtifactKey::new(tool, group, id))
}

/// A resource key under an artifact.
pub fn resource_key(artifact: &ArtifactKey, path: &str, file: &str) -> ArtifactResourceKey {
    ArtifactResourceKey::new(artifact.clone(), path, file)
}

/// A resource record with no optional metadata.
pub fn resource_info(artifact: &ArtifactKey, path: &str, file: &str) -> ArtifactResourceInfo {
    ArtifactResourceInfo::new(resource_key(artifact, path, file))
}

/// In-memory session stores wired into a [`ToolConfig`].
///
/// The returned registration store and data store handles alias the ones
/// inside the config, so tests can inspect or corrupt state directly.
pub fn session() -> (ToolConfig, Arc<MemoryRegistrationStore>, MemoryDataStore) {
    let registration = Arc::new(MemoryRegistrationStore::new());
    let data = MemoryDataStore::new();
    let config = ToolConfig::new(registration.clone(), Arc::new(data.clone()));
    (config, registration, data)
}
