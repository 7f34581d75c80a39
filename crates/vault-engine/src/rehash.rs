//! Rehash engine
//!
//! Migrates stored checksums to a new algorithm. Each resource is read once
//! through two chained hashing streams: the inner verifies the recorded
//! digest, the outer computes the replacement. Only resources that verify
//! get the new checksum; mismatches and missing content are reported as
//! failures and left untouched.

use crate::tool::ToolConfig;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};
use vault_hash::{ChecksumRegistry, HashingStream};
use vault_model::{Checksum, ValidationFailureSet};

/// Aggregate outcome of one rehash run.
#[derive(Debug)]
pub struct RehashResult {
    /// Resources whose checksum was migrated
    pub rehashed: usize,
    /// Resources skipped: no checksum, or one under an unknown algorithm
    pub skipped: usize,
    /// Resources that failed verification before migration
    pub failed: ValidationFailureSet,
}

/// Single-pass checksum migration over the whole archive.
pub struct RehashEngine {
    config: ToolConfig,
    checksums: Arc<ChecksumRegistry>,
}

impl RehashEngine {
    /// Create an engine over the session stores.
    pub fn new(config: ToolConfig, checksums: Arc<ChecksumRegistry>) -> Self {
        Self { config, checksums }
    }

    /// Recompute every verifiable checksum under `new_algorithm_id`.
    ///
    /// An unknown target algorithm is a configuration error and aborts the
    /// run before anything is read.
    pub async fn rehash(&self, new_algorithm_id: &str) -> Result<RehashResult> {
        let (canonical_new, _) = self.checksums.resolve(new_algorithm_id)?;
        let mut result = RehashResult {
            rehashed: 0,
            skipped: 0,
            failed: ValidationFailureSet::new(),
        };
        for artifact in self.config.registration.list_artifacts().await? {
            for resource in self
                .config
                .registration
                .list_resources(&artifact.key)
                .await?
            {
                let Some(old) = resource.checksum.clone() else {
                    result.skipped += 1;
                    continue;
                };
                let Ok((_, old_hasher)) = self.checksums.resolve(&old.algorithm_id) else {
                    debug!(resource = %resource.key, algorithm = %old.algorithm_id, "skipping unknown algorithm");
                    result.skipped += 1;
                    continue;
                };
                if !self.config.data.exists(&resource.key).await? {
                    result.failed.add_fail(resource);
                    continue;
                }
                let (_, new_hasher) = self.checksums.resolve(canonical_new)?;
                let reader = self.config.data.open_input(&resource.key).await?;
                let verify = HashingStream::new(reader, old_hasher);
                let mut compute = HashingStream::new(verify, new_hasher);
                tokio::io::copy(&mut compute, &mut tokio::io::sink()).await?;
                let (verify, new_digest) = compute.finalize();
                let (_, old_digest) = verify.finalize();
                if !old.matches_digest(&old_digest) {
                    debug!(resource = %resource.key, "verification failed before rehash");
                    result.failed.add_fail(resource);
                    continue;
                }
                let new_checksum = Checksum::new(canonical_new, new_digest);
                self.config
                    .registration
                    .add_resource(resource.with_checksum(Some(new_checksum)))
                    .await?;
                result.rehashed += 1;
            }
        }
        info!(
            rehashed = result.rehashed,
            skipped = result.skipped,
            failed = result.failed.resource_failures(),
            "rehash finished"
        );
        Ok(result)
    }
}
