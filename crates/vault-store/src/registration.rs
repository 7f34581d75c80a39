//! Registration store interface

use crate::Result;
use async_trait::async_trait;
use vault_model::{ArtifactInfo, ArtifactKey, ArtifactResourceInfo, ArtifactResourceKey};

/// Durable metadata store for artifacts and resources.
///
/// `add_*` operations are upserts: re-adding a key overwrites the previous
/// record. Listings return records sorted by key so audit order is
/// deterministic.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Register or overwrite an artifact record.
    async fn add_artifact(&self, info: ArtifactInfo) -> Result<()>;

    /// Fetch an artifact record if present.
    async fn try_get_artifact(&self, key: &ArtifactKey) -> Result<Option<ArtifactInfo>>;

    /// Remove an artifact record. Removing an absent key is a no-op.
    async fn remove_artifact(&self, key: &ArtifactKey) -> Result<()>;

    /// List every registered artifact.
    async fn list_artifacts(&self) -> Result<Vec<ArtifactInfo>>;

    /// List artifacts registered under one tool.
    async fn list_artifacts_by_tool(&self, tool: &str) -> Result<Vec<ArtifactInfo>>;

    /// List artifacts registered under one tool/group pair.
    async fn list_artifacts_by_tool_group(
        &self,
        tool: &str,
        group: &str,
    ) -> Result<Vec<ArtifactInfo>>;

    /// Register or overwrite a resource record.
    async fn add_resource(&self, info: ArtifactResourceInfo) -> Result<()>;

    /// Fetch a resource record if present.
    async fn try_get_resource(
        &self,
        key: &ArtifactResourceKey,
    ) -> Result<Option<ArtifactResourceInfo>>;

    /// Remove a resource record. Removing an absent key is a no-op.
    async fn remove_resource(&self, key: &ArtifactResourceKey) -> Result<()>;

    /// List the resources registered under one artifact, in key order.
    async fn list_resources(&self, key: &ArtifactKey) -> Result<Vec<ArtifactResourceInfo>>;
}
