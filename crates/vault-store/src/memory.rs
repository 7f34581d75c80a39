//! In-memory store implementations
//!
//! Used for database-less runs and throughout the engine test suites.

use crate::data::{DataStore, ResourceWriter};
use crate::registration::RegistrationStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite};
use vault_model::{ArtifactInfo, ArtifactKey, ArtifactResourceInfo, ArtifactResourceKey};

/// Registration store backed by in-process maps.
#[derive(Debug, Default)]
pub struct MemoryRegistrationStore {
    artifacts: Mutex<BTreeMap<ArtifactKey, ArtifactInfo>>,
    resources: Mutex<BTreeMap<ArtifactResourceKey, ArtifactResourceInfo>>,
}

impl MemoryRegistrationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrationStore {
    async fn add_artifact(&self, info: ArtifactInfo) -> Result<()> {
        self.artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(info.key.clone(), info);
        Ok(())
    }

    async fn try_get_artifact(&self, key: &ArtifactKey) -> Result<Option<ArtifactInfo>> {
        Ok(self
            .artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    async fn remove_artifact(&self, key: &ArtifactKey) -> Result<()> {
        self.artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }

    async fn list_artifacts(&self) -> Result<Vec<ArtifactInfo>> {
        Ok(self
            .artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect())
    }

    async fn list_artifacts_by_tool(&self, tool: &str) -> Result<Vec<ArtifactInfo>> {
        Ok(self
            .artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|a| a.key.tool == tool)
            .cloned()
            .collect())
    }

    async fn list_artifacts_by_tool_group(
        &self,
        tool: &str,
        group: &str,
    ) -> Result<Vec<ArtifactInfo>> {
        Ok(self
            .artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|a| a.key.tool == tool && a.key.group == group)
            .cloned()
            .collect())
    }

    async fn add_resource(&self, info: ArtifactResourceInfo) -> Result<()> {
        self.resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(info.key.clone(), info);
        Ok(())
    }

    async fn try_get_resource(
        &self,
        key: &ArtifactResourceKey,
    ) -> Result<Option<ArtifactResourceInfo>> {
        Ok(self
            .resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    async fn remove_resource(&self, key: &ArtifactResourceKey) -> Result<()> {
        self.resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }

    async fn list_resources(&self, key: &ArtifactKey) -> Result<Vec<ArtifactResourceInfo>> {
        Ok(self
            .resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|r| &r.key.artifact == key)
            .cloned()
            .collect())
    }
}

type SharedContent = Arc<Mutex<BTreeMap<ArtifactResourceKey, Vec<u8>>>>;

/// Data store backed by an in-process map of key to bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataStore {
    content: SharedContent,
}

impl MemoryDataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct snapshot of stored bytes; test hook for corruption scenarios.
    pub fn get_bytes(&self, key: &ArtifactResourceKey) -> Option<Vec<u8>> {
        self.content
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Overwrite stored bytes directly; test hook for corruption scenarios.
    pub fn put_bytes(&self, key: ArtifactResourceKey, bytes: Vec<u8>) {
        self.content
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, bytes);
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn exists(&self, key: &ArtifactResourceKey) -> Result<bool> {
        Ok(self
            .content
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key))
    }

    async fn open_input(
        &self,
        key: &ArtifactResourceKey,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        let bytes = self
            .get_bytes(key)
            .ok_or_else(|| Error::ContentNotFound { key: key.clone() })?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    async fn create_output(&self, key: &ArtifactResourceKey) -> Result<Box<dyn ResourceWriter>> {
        Ok(Box::new(MemoryWriter {
            key: key.clone(),
            buffer: Vec::new(),
            content: Arc::clone(&self.content),
        }))
    }

    async fn delete(&self, key: &ArtifactResourceKey) -> Result<()> {
        self.content
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

/// Buffers writes and publishes them to the shared map on commit.
struct MemoryWriter {
    key: ArtifactResourceKey,
    buffer: Vec<u8>,
    content: SharedContent,
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.get_mut().buffer.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[async_trait]
impl ResourceWriter for MemoryWriter {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.content
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(self.key, self.buffer);
        Ok(())
    }
}
