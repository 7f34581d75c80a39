//! Validation engine
//!
//! Audits registered artifacts against the data store. Integrity findings
//! (missing content, unverifiable or mismatched checksums) are never raised
//! as errors; they accumulate in the engine's failure set and are reported
//! in aggregate. Only configuration problems (an unresolvable tool, an
//! unknown backfill algorithm) abort a run.

use crate::registry::ToolRegistry;
use crate::repair::RepairEngine;
use crate::tool::ToolConfig;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};
use vault_hash::{ChecksumRegistry, HashingStream, hash_reader};
use vault_model::{
    ArtifactInfo, ArtifactResourceInfo, ArtifactToolProfile, ValidationFailureSet,
};

/// Aggregate counts for one validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationProcessResult {
    /// Artifacts audited
    pub artifacts: usize,
    /// Resources audited
    pub resources: usize,
}

impl ValidationProcessResult {
    fn absorb(&mut self, other: ValidationProcessResult) {
        self.artifacts += other.artifacts;
        self.resources += other.resources;
    }
}

/// Integrity auditor over existing registration and data.
pub struct ValidationEngine {
    config: ToolConfig,
    checksums: Arc<ChecksumRegistry>,
    /// Algorithm used to backfill missing checksums, when requested
    add_checksum_with: Option<String>,
    failed: ValidationFailureSet,
}

impl ValidationEngine {
    /// Create an engine over the session stores.
    ///
    /// `add_checksum_with` enables the backfill path: a resource without a
    /// checksum gets one computed under the named algorithm instead of
    /// being flagged. An unknown algorithm is a configuration error.
    pub fn new(
        config: ToolConfig,
        checksums: Arc<ChecksumRegistry>,
        add_checksum_with: Option<String>,
    ) -> Result<Self> {
        let add_checksum_with = match add_checksum_with {
            Some(id) if !ChecksumRegistry::is_disabled(Some(&id)) => {
                // Fail fast; canonicalize so backfilled records agree on casing.
                Some(checksums.resolve(&id)?.0.to_string())
            }
            _ => None,
        };
        Ok(Self {
            config,
            checksums,
            add_checksum_with,
            failed: ValidationFailureSet::new(),
        })
    }

    /// Whether any audited resource failed so far.
    pub fn any_failed(&self) -> bool {
        self.failed.any_failed()
    }

    /// Total failed resources so far.
    pub fn resource_failures(&self) -> usize {
        self.failed.resource_failures()
    }

    /// The failure set accumulated so far.
    pub fn failures(&self) -> &ValidationFailureSet {
        &self.failed
    }

    /// Hand a copy of the failure set to a repair engine.
    ///
    /// The copy is owned by the repair engine; this engine's set stays
    /// intact for reporting.
    pub fn to_repair(&self) -> RepairEngine {
        RepairEngine::new(
            self.config.clone(),
            Arc::clone(&self.checksums),
            self.failed.clone(),
        )
    }

    /// Audit the artifacts registered for each profile's tool and group.
    ///
    /// Each profile's tool is resolved independently; an unresolvable tool
    /// aborts the run. Failures from different profiles merge into one set,
    /// keyed by artifact, so overlapping profiles collapse naturally.
    pub async fn process_profiles(
        &mut self,
        registry: &ToolRegistry,
        profiles: &[ArtifactToolProfile],
    ) -> Result<ValidationProcessResult> {
        let mut total = ValidationProcessResult::default();
        for profile in profiles {
            // Resolution failure is fatal even though the instance itself
            // is not consulted during the audit.
            registry.resolve(profile)?;
            let group = profile.group_or_default();
            info!(tool = %profile.tool, group, "validating profile");
            let artifacts = self
                .config
                .registration
                .list_artifacts_by_tool_group(&profile.tool, group)
                .await?;
            let result = self.process_artifacts(&artifacts).await?;
            info!(
                tool = %profile.tool,
                group,
                artifacts = result.artifacts,
                resources = result.resources,
                "profile validated"
            );
            total.absorb(result);
        }
        Ok(total)
    }

    /// Audit a list of artifacts.
    pub async fn process_artifacts(
        &mut self,
        artifacts: &[ArtifactInfo],
    ) -> Result<ValidationProcessResult> {
        let mut total = ValidationProcessResult::default();
        for artifact in artifacts {
            total.absorb(self.process_artifact(artifact).await?);
        }
        Ok(total)
    }

    /// Audit one artifact's resources in registration order.
    pub async fn process_artifact(
        &mut self,
        artifact: &ArtifactInfo,
    ) -> Result<ValidationProcessResult> {
        let mut resources = 0;
        for resource in self
            .config
            .registration
            .list_resources(&artifact.key)
            .await?
        {
            resources += 1;
            self.check_resource(resource).await?;
        }
        Ok(ValidationProcessResult {
            artifacts: 1,
            resources,
        })
    }

    async fn check_resource(&mut self, resource: ArtifactResourceInfo) -> Result<()> {
        let key = &resource.key;
        if !self.config.data.exists(key).await? {
            debug!(resource = %key, "content missing");
            self.failed.add_fail(resource);
            return Ok(());
        }
        let Some(checksum) = resource.checksum.as_ref() else {
            return self.handle_unchecksummed(resource).await;
        };
        // Unknown algorithm means the stored digest cannot be verified.
        let Ok((_, hasher)) = self.checksums.resolve(&checksum.algorithm_id) else {
            debug!(resource = %key, algorithm = %checksum.algorithm_id, "unknown algorithm");
            self.failed.add_fail(resource);
            return Ok(());
        };
        let reader = self.config.data.open_input(key).await?;
        let mut stream = HashingStream::new(reader, hasher);
        tokio::io::copy(&mut stream, &mut tokio::io::sink()).await?;
        if !checksum.matches_digest(&stream.into_digest()) {
            debug!(resource = %key, "checksum mismatch");
            self.failed.add_fail(resource);
        }
        Ok(())
    }

    /// Step 2 of the audit: a resource without a checksum is unverifiable.
    /// With backfill enabled it gains one as a metadata-only update and
    /// passes; otherwise it is a failure.
    async fn handle_unchecksummed(&mut self, resource: ArtifactResourceInfo) -> Result<()> {
        let Some(algorithm_id) = self.add_checksum_with.as_deref() else {
            debug!(resource = %resource.key, "no checksum recorded");
            self.failed.add_fail(resource);
            return Ok(());
        };
        let reader = self.config.data.open_input(&resource.key).await?;
        let checksum = hash_reader(&self.checksums, algorithm_id, reader).await?;
        debug!(resource = %resource.key, checksum = %checksum, "backfilled checksum");
        self.config
            .registration
            .add_resource(resource.with_checksum(Some(checksum)))
            .await?;
        Ok(())
    }
}
