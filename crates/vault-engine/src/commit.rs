//! Resource commit protocol
//!
//! One resource, one pass: content streams from the tool through a hashing
//! stream into the data store; the digest is finalized only after the
//! stream is drained; the registration record is written only after the
//! content is committed. Dump uses this path under the caller's update
//! mode, repair under a forced `Hard`.

use crate::tool::{ResourceData, ToolConfig};
use crate::Result;
use tokio::io::AsyncWriteExt;
use vault_hash::{ChecksumRegistry, HashingStream};
use vault_model::{Checksum, ResourceUpdateMode};

/// What the commit path did with one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Content was fetched, stored, and registered
    Written { checksum: Option<Checksum> },
    /// Stored record's metadata matched and content exists; nothing fetched
    SkippedUnchanged,
}

/// Persist one tool-yielded resource under an update mode.
///
/// Soft modes skip the fetch when the stored record is not metadata-different
/// from the incoming one and content is present; hard modes always refetch
/// and overwrite, recomputing the checksum.
pub async fn persist_resource(
    config: &ToolConfig,
    checksums: &ChecksumRegistry,
    resource: &ResourceData,
    update_mode: ResourceUpdateMode,
    checksum_algorithm_id: Option<&str>,
) -> Result<PersistOutcome> {
    let key = &resource.info.key;

    if !update_mode.is_hard() {
        if let Some(stored) = config.registration.try_get_resource(key).await? {
            if !resource.info.is_metadata_different(&stored) && config.data.exists(key).await? {
                tracing::debug!(resource = %key, "resource unchanged, skipping fetch");
                return Ok(PersistOutcome::SkippedUnchanged);
            }
        }
    }

    // Resolve before opening anything so an unknown algorithm fails fast.
    let hasher = match checksum_algorithm_id {
        Some(id) if !ChecksumRegistry::is_disabled(Some(id)) => Some(checksums.resolve(id)?),
        _ => None,
    };

    let reader = resource.content.open().await?;
    let mut writer = config.data.create_output(key).await?;
    let checksum = match hasher {
        Some((canonical, hasher)) => {
            let mut stream = HashingStream::new(reader, hasher);
            tokio::io::copy(&mut stream, &mut writer).await?;
            Some(Checksum::new(canonical, stream.into_digest()))
        }
        None => {
            let mut reader = reader;
            tokio::io::copy(&mut reader, &mut writer).await?;
            None
        }
    };
    writer.shutdown().await?;
    writer.commit().await?;

    // Registration strictly after the content is durable; a run aborted
    // above this line leaves no record behind.
    config
        .registration
        .add_resource(resource.info.clone().with_checksum(checksum.clone()))
        .await?;
    tracing::debug!(resource = %key, "resource written");
    Ok(PersistOutcome::Written { checksum })
}
