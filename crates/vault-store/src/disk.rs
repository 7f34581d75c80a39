//! Disk-backed data store
//!
//! Content lives under `<root>/<tool>/<group>/<id>/<path>/<file>`. Writes
//! stream into a hidden temp sibling and are renamed into place on commit,
//! so a crashed or cancelled write never leaves readable partial content at
//! the final path.

use crate::data::{DataStore, ResourceWriter};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::debug;
use vault_model::ArtifactResourceKey;

/// Data store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct DiskDataStore {
    root: PathBuf,
}

impl DiskDataStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| Error::StoreRoot {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a resource key to its on-disk path.
    pub fn path_for(&self, key: &ArtifactResourceKey) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for segment in [
            key.artifact.tool.as_str(),
            key.artifact.group.as_str(),
            key.artifact.id.as_str(),
        ] {
            path.push(checked_segment(segment)?);
        }
        if !key.path.is_empty() {
            for segment in key.path.split('/') {
                path.push(checked_segment(segment)?);
            }
        }
        path.push(checked_segment(&key.file)?);
        Ok(path)
    }
}

/// Validate one path segment of a resource key.
///
/// Keys come from tools, which may hand us arbitrary remote identifiers;
/// anything that could escape the store root is rejected rather than
/// rewritten.
fn checked_segment(segment: &str) -> Result<&str> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0'])
    {
        return Err(Error::InvalidKeySegment {
            segment: segment.to_string(),
        });
    }
    Ok(segment)
}

#[async_trait]
impl DataStore for DiskDataStore {
    async fn exists(&self, key: &ArtifactResourceKey) -> Result<bool> {
        let path = self.path_for(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn open_input(
        &self,
        key: &ArtifactResourceKey,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        let path = self.path_for(key)?;
        match File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::ContentNotFound { key: key.clone() })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_output(&self, key: &ArtifactResourceKey) -> Result<Box<dyn ResourceWriter>> {
        let final_path = self.path_for(key)?;
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        // Temp sibling in the same directory keeps the rename on one
        // filesystem.
        let temp_name = format!(".{}.{}.tmp", key.file, std::process::id());
        let temp_path = final_path.with_file_name(temp_name);
        let file = File::create(&temp_path).await?;
        Ok(Box::new(DiskWriter {
            file: Some(file),
            temp_path,
            final_path,
        }))
    }

    async fn delete(&self, key: &ArtifactResourceKey) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "deleted resource content");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Streams into a temp file; rename-on-commit, unlink-on-drop.
struct DiskWriter {
    file: Option<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl AsyncWrite for DiskWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        match self.get_mut().file.as_mut() {
            Some(file) => Pin::new(file).poll_write(cx, buf),
            None => Poll::Ready(Err(std::io::Error::other("writer already committed"))),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut().file.as_mut() {
            Some(file) => Pin::new(file).poll_flush(cx),
            None => Poll::Ready(Ok(())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut().file.as_mut() {
            Some(file) => Pin::new(file).poll_shutdown(cx),
            None => Poll::Ready(Ok(())),
        }
    }
}

#[async_trait]
impl ResourceWriter for DiskWriter {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        fs::rename(&self.temp_path, &self.final_path).await?;
        debug!(path = %self.final_path.display(), "committed resource content");
        Ok(())
    }
}

impl Drop for DiskWriter {
    fn drop(&mut self) {
        // Uncommitted temp content must not linger.
        if self.file.take().is_some() {
            let _ = std::fs::remove_file(&self.temp_path);
        }
    }
}
