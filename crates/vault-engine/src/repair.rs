//! Repair engine
//!
//! Consumes a validation failure set and re-invokes the originating tools
//! to reconstruct what failed. A tool that cannot reproduce an artifact is
//! logged and skipped; only tool resolution and initialization failures
//! abort the run. The outcome reports what remains failed.

use crate::commit::persist_resource;
use crate::registry::ToolRegistry;
use crate::tool::{ArtifactData, Tool, ToolConfig};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{error, info};
use vault_hash::ChecksumRegistry;
use vault_model::{ArtifactKey, ArtifactToolProfile, ResourceUpdateMode, ValidationFailureSet};

/// Terminal state of one repair run.
#[derive(Debug)]
pub struct RepairOutcome {
    /// Resources still failed after re-acquisition
    pub remaining: ValidationFailureSet,
    /// True iff nothing remains failed
    pub success: bool,
}

/// Best-effort re-acquisition of failed resources.
pub struct RepairEngine {
    config: ToolConfig,
    checksums: Arc<ChecksumRegistry>,
    failed: ValidationFailureSet,
}

impl RepairEngine {
    /// Create an engine owning a failure set.
    pub fn new(
        config: ToolConfig,
        checksums: Arc<ChecksumRegistry>,
        failed: ValidationFailureSet,
    ) -> Self {
        Self {
            config,
            checksums,
            failed,
        }
    }

    /// Run repair across the given profiles.
    ///
    /// Only profiles whose (tool, group) own at least one failure are
    /// visited. Healed resources are re-persisted under a forced hard
    /// update with `checksum_algorithm_id`.
    pub async fn repair(
        mut self,
        registry: &ToolRegistry,
        profiles: &[ArtifactToolProfile],
        checksum_algorithm_id: Option<&str>,
    ) -> Result<RepairOutcome> {
        for profile in profiles {
            let group = profile.group_or_default().to_string();
            let affected: Vec<ArtifactKey> = self
                .failed
                .artifact_keys()
                .filter(|k| k.tool == profile.tool && k.group == group)
                .cloned()
                .collect();
            if affected.is_empty() {
                continue;
            }
            let mut tool = registry.resolve(profile)?;
            tool.initialize(self.config.clone(), profile).await?;
            info!(
                tool = %profile.tool,
                group = %group,
                artifacts = affected.len(),
                "repairing profile"
            );
            self.acquire(tool.as_mut(), &affected, checksum_algorithm_id)
                .await?;
        }
        if self.failed.any_failed() {
            error!(
                resources = self.failed.resource_failures(),
                "failed to reacquire resources"
            );
            for resource in self.failed.resources() {
                error!(resource = %resource.key, "still failed");
            }
        } else {
            info!("successfully reacquired all resources");
        }
        let success = !self.failed.any_failed();
        Ok(RepairOutcome {
            remaining: self.failed,
            success,
        })
    }

    /// Obtain fresh data for the affected artifacts, preferring point
    /// lookup over a full listing pass.
    async fn acquire(
        &mut self,
        tool: &mut dyn Tool,
        affected: &[ArtifactKey],
        checksum_algorithm_id: Option<&str>,
    ) -> Result<()> {
        let name = tool.name().to_string();
        if tool.as_finder().is_some() {
            for key in affected {
                // Borrow the finder per lookup so fixup can run in between.
                let found = match tool.as_finder() {
                    Some(finder) => finder.find(&key.id).await?,
                    None => None,
                };
                match found {
                    Some(data) => self.fixup(&data, checksum_algorithm_id).await,
                    None => error!(artifact = %key, "failed to obtain artifact"),
                }
            }
            return Ok(());
        }
        if let Some(lister) = tool.as_lister() {
            lister.begin_listing().await?;
            while let Some(data) = lister.next_artifact().await? {
                if self.failed.get(&data.info.key).is_some() {
                    self.fixup(&data, checksum_algorithm_id).await;
                }
            }
            return Ok(());
        }
        Err(Error::UnsupportedCapability {
            tool: name,
            capability: "listing or point lookup",
        })
    }

    /// Re-persist every still-failed resource of one artifact found in the
    /// fresh data. Iterates a snapshot so removals do not perturb the pass.
    async fn fixup(&mut self, data: &ArtifactData, checksum_algorithm_id: Option<&str>) {
        let key = data.info.key.clone();
        let snapshot = match self.failed.get(&key) {
            Some(list) => list.to_vec(),
            None => return,
        };
        for failed_resource in snapshot {
            let Some(fresh) = data.get(&failed_resource.key) else {
                error!(
                    resource = %failed_resource.key,
                    artifact = %key,
                    "failed to obtain resource"
                );
                continue;
            };
            match persist_resource(
                &self.config,
                &self.checksums,
                fresh,
                ResourceUpdateMode::Hard,
                checksum_algorithm_id,
            )
            .await
            {
                Ok(_) => self.failed.remove_resource(&failed_resource.key),
                Err(e) => {
                    error!(resource = %failed_resource.key, error = %e, "re-dump failed");
                }
            }
        }
    }
}
