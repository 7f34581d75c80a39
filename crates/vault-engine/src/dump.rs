//! Dump engine
//!
//! Drives one tool's enumeration for one profile, deciding per artifact and
//! per resource what to persist according to [`DumpOptions`], and commits
//! through the shared protocol in [`crate::commit`].

use crate::commit::{PersistOutcome, persist_resource};
use crate::registry::ToolRegistry;
use crate::tool::{ArtifactData, ToolConfig, require_lister};
use crate::Result;
use std::sync::Arc;
use tracing::{error, info};
use vault_hash::ChecksumRegistry;
use vault_model::{ArtifactSkipMode, ArtifactToolProfile, DumpOptions, ResourceUpdateMode};

/// Aggregate counts for one dump run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpResult {
    /// Artifacts whose resources were processed
    pub artifacts_dumped: usize,
    /// Artifacts skipped by skip mode, non-full filtering, or artifact-granular
    /// update modes
    pub artifacts_skipped: usize,
    /// Resources fetched and committed
    pub resources_written: usize,
    /// Resources left untouched by a soft update decision
    pub resources_skipped: usize,
    /// Resources whose fetch or store failed; reported, not raised
    pub resources_failed: usize,
}

impl DumpResult {
    fn absorb(&mut self, other: DumpResult) {
        self.artifacts_dumped += other.artifacts_dumped;
        self.artifacts_skipped += other.artifacts_skipped;
        self.resources_written += other.resources_written;
        self.resources_skipped += other.resources_skipped;
        self.resources_failed += other.resources_failed;
    }
}

/// Incremental, policy-driven persistence of newly observed artifacts.
pub struct DumpEngine {
    config: ToolConfig,
    checksums: Arc<ChecksumRegistry>,
}

impl DumpEngine {
    /// Create an engine over the session stores.
    pub fn new(config: ToolConfig, checksums: Arc<ChecksumRegistry>) -> Self {
        Self { config, checksums }
    }

    /// Dump every profile in order, aggregating counts.
    ///
    /// Profiles are strictly sequential; a tool-resolution failure on any
    /// profile aborts the whole run.
    pub async fn dump_all(
        &self,
        registry: &ToolRegistry,
        profiles: &[ArtifactToolProfile],
        options: &DumpOptions,
    ) -> Result<DumpResult> {
        let mut total = DumpResult::default();
        for profile in profiles {
            total.absorb(self.dump(registry, profile, options).await?);
        }
        Ok(total)
    }

    /// Dump one profile.
    ///
    /// Tool resolution or initialization failure is fatal; per-resource I/O
    /// failures are logged, counted, and do not stop the run.
    pub async fn dump(
        &self,
        registry: &ToolRegistry,
        profile: &ArtifactToolProfile,
        options: &DumpOptions,
    ) -> Result<DumpResult> {
        // Fail fast on a bad checksum configuration.
        if let Some(id) = options.checksum_algorithm_id.as_deref() {
            if !ChecksumRegistry::is_disabled(Some(id)) {
                self.checksums.resolve(id)?;
            }
        }

        let mut tool = registry.resolve(profile)?;
        tool.initialize(self.config.clone(), profile).await?;
        info!(
            tool = %profile.tool,
            group = %profile.group_or_default(),
            "dumping profile"
        );

        let mut result = DumpResult::default();
        let lister = require_lister(tool.as_mut())?;
        lister.begin_listing().await?;
        while let Some(data) = lister.next_artifact().await? {
            let key = data.info.key.clone();
            if !data.info.full && !options.include_non_full {
                result.artifacts_skipped += 1;
                continue;
            }
            let known = self.config.registration.try_get_artifact(&key).await?;
            match options.skip_mode {
                ArtifactSkipMode::Known if known.is_some() => {
                    result.artifacts_skipped += 1;
                    continue;
                }
                ArtifactSkipMode::FastExit if known.is_some() => {
                    info!(artifact = %key, "known artifact reached, stopping enumeration");
                    result.artifacts_skipped += 1;
                    break;
                }
                _ => {}
            }
            // Artifact-granular modes settle the fetch question once: a
            // fully captured known artifact keeps all of its resources.
            if options.update_mode.is_artifact_granular()
                && known.as_ref().is_some_and(|a| a.full)
            {
                result.artifacts_skipped += 1;
                continue;
            }
            self.dump_artifact(&data, options, &mut result).await?;
        }
        info!(
            tool = %profile.tool,
            group = %profile.group_or_default(),
            artifacts = result.artifacts_dumped,
            skipped = result.artifacts_skipped,
            written = result.resources_written,
            failed = result.resources_failed,
            "profile dump finished"
        );
        Ok(result)
    }

    async fn dump_artifact(
        &self,
        data: &ArtifactData,
        options: &DumpOptions,
        result: &mut DumpResult,
    ) -> Result<()> {
        // Within a processed artifact only the force axis matters; the
        // artifact-granular decision was already made by the caller.
        let resource_mode = if options.update_mode.is_hard() {
            ResourceUpdateMode::Hard
        } else {
            ResourceUpdateMode::Soft
        };
        let mut complete = true;
        for resource in data.resources() {
            match persist_resource(
                &self.config,
                &self.checksums,
                resource,
                resource_mode,
                options.checksum_algorithm_id.as_deref(),
            )
            .await
            {
                Ok(PersistOutcome::Written { .. }) => result.resources_written += 1,
                Ok(PersistOutcome::SkippedUnchanged) => result.resources_skipped += 1,
                Err(e) => {
                    error!(resource = %resource.info.key, error = %e, "resource dump failed");
                    result.resources_failed += 1;
                    complete = false;
                }
            }
        }
        // A partially persisted artifact is registered as non-full so later
        // runs know its resource set is incomplete.
        let mut info = data.info.clone();
        info.full = info.full && complete;
        self.config.registration.add_artifact(info).await?;
        result.artifacts_dumped += 1;
        Ok(())
    }
}
