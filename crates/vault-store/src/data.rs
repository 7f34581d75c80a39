//! Data store interface

use crate::Result;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use vault_model::ArtifactResourceKey;

/// Streaming writer for one resource's content.
///
/// Bytes written are not durable until [`commit`](Self::commit) succeeds;
/// dropping an uncommitted writer discards everything written so far. This
/// is what lets a cancelled dump leave only a *missing* resource behind.
#[async_trait]
pub trait ResourceWriter: AsyncWrite + Send + Unpin {
    /// Flush and make the written content durable under the resource key.
    async fn commit(self: Box<Self>) -> Result<()>;
}

/// Durable byte storage for resource content.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Whether content exists for a resource key.
    async fn exists(&self, key: &ArtifactResourceKey) -> Result<bool>;

    /// Open the stored content for reading.
    ///
    /// Fails with [`Error::ContentNotFound`](crate::Error::ContentNotFound)
    /// when no content exists for the key.
    async fn open_input(
        &self,
        key: &ArtifactResourceKey,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>>;

    /// Create a writer that will replace the content under a key on commit.
    async fn create_output(&self, key: &ArtifactResourceKey) -> Result<Box<dyn ResourceWriter>>;

    /// Delete the content under a key. Deleting absent content is a no-op.
    async fn delete(&self, key: &ArtifactResourceKey) -> Result<()>;
}

/// Data store that stores nothing.
///
/// `exists` is always false and writes are discarded on commit; useful for
/// dry-run dumps that exercise enumeration without touching disk.
#[derive(Debug, Default)]
pub struct NullDataStore;

impl NullDataStore {
    /// Create a null store.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataStore for NullDataStore {
    async fn exists(&self, _key: &ArtifactResourceKey) -> Result<bool> {
        Ok(false)
    }

    async fn open_input(
        &self,
        key: &ArtifactResourceKey,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        Err(crate::Error::ContentNotFound { key: key.clone() })
    }

    async fn create_output(&self, _key: &ArtifactResourceKey) -> Result<Box<dyn ResourceWriter>> {
        Ok(Box::new(NullWriter))
    }

    async fn delete(&self, _key: &ArtifactResourceKey) -> Result<()> {
        Ok(())
    }
}

struct NullWriter;

impl AsyncWrite for NullWriter {
    fn poll_write(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        buf: &[u8],
    ) -> std::task::Poll<std::io::Result<usize>> {
        std::task::Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn poll_shutdown(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Ok(()))
    }
}

#[async_trait]
impl ResourceWriter for NullWriter {
    async fn commit(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
