//! Tool abstraction
//!
//! A tool is a pluggable data producer: given a profile it enumerates or
//! looks up artifacts, each carrying its resources and their content
//! sources. Tools never write to the stores themselves; the engines own the
//! commit protocol.

use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::AsyncRead;
use vault_model::{ArtifactInfo, ArtifactResourceInfo, ArtifactResourceKey, ArtifactToolProfile};
use vault_store::{DataStore, RegistrationStore};

/// Store handles handed to a tool at initialization.
///
/// Most tools only read from these (e.g. to decide what is worth
/// re-fetching); all persistence happens in the engines.
#[derive(Clone)]
pub struct ToolConfig {
    /// Registration store shared by the whole session
    pub registration: Arc<dyn RegistrationStore>,
    /// Data store shared by the whole session
    pub data: Arc<dyn DataStore>,
}

impl ToolConfig {
    /// Bundle the two store handles.
    pub fn new(registration: Arc<dyn RegistrationStore>, data: Arc<dyn DataStore>) -> Self {
        Self { registration, data }
    }
}

/// Opens the byte content of one resource.
///
/// Every call returns a fresh reader from the start of the content, so a
/// resource can be persisted and later re-persisted during repair.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Open a fresh reader over the full content.
    async fn open(&self) -> Result<Box<dyn AsyncRead + Send + Unpin>>;
}

/// In-memory content source.
pub struct BytesContent(pub Vec<u8>);

#[async_trait]
impl ContentSource for BytesContent {
    async fn open(&self) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        Ok(Box::new(std::io::Cursor::new(self.0.clone())))
    }
}

/// One resource as produced by a tool: its record plus its content.
pub struct ResourceData {
    /// Registration record the tool proposes for this resource
    pub info: ArtifactResourceInfo,
    /// Content source for the resource's bytes
    pub content: Box<dyn ContentSource>,
}

impl ResourceData {
    /// Pair a record with its content source.
    pub fn new(info: ArtifactResourceInfo, content: impl ContentSource + 'static) -> Self {
        Self {
            info,
            content: Box::new(content),
        }
    }
}

/// One artifact as produced by a tool: its record plus its resources, in
/// the order the tool yielded them.
pub struct ArtifactData {
    /// Registration record the tool proposes for this artifact
    pub info: ArtifactInfo,
    resources: Vec<ResourceData>,
}

impl ArtifactData {
    /// Create an artifact with no resources yet.
    pub fn new(info: ArtifactInfo) -> Self {
        Self {
            info,
            resources: Vec::new(),
        }
    }

    /// Append a resource (builder pattern).
    pub fn with_resource(mut self, resource: ResourceData) -> Self {
        self.resources.push(resource);
        self
    }

    /// Resources in yield order.
    pub fn resources(&self) -> &[ResourceData] {
        &self.resources
    }

    /// Look up one resource by key.
    pub fn get(&self, key: &ArtifactResourceKey) -> Option<&ResourceData> {
        self.resources.iter().find(|r| &r.info.key == key)
    }
}

/// A pluggable data source.
///
/// Capability discovery follows the store pattern: a tool that can
/// enumerate returns itself from [`as_lister`](Self::as_lister), one that
/// can do point lookup from [`as_finder`](Self::as_finder). A tool may
/// support both; repair prefers the finder.
#[async_trait]
pub trait Tool: Send {
    /// Registry identifier of this tool instance.
    fn name(&self) -> &str;

    /// Bind the tool to its stores and profile. Called exactly once before
    /// any listing or lookup.
    async fn initialize(&mut self, config: ToolConfig, profile: &ArtifactToolProfile)
    -> Result<()>;

    /// Enumeration capability, if supported.
    fn as_lister(&mut self) -> Option<&mut dyn ToolLister> {
        None
    }

    /// Point-lookup capability, if supported.
    fn as_finder(&mut self) -> Option<&mut dyn ToolFinder> {
        None
    }
}

impl std::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name()).finish()
    }
}

/// Bulk enumeration capability.
#[async_trait]
pub trait ToolLister: Send {
    /// Restart enumeration from the beginning.
    async fn begin_listing(&mut self) -> Result<()>;

    /// Yield the next artifact, or `None` when the listing is exhausted.
    async fn next_artifact(&mut self) -> Result<Option<ArtifactData>>;
}

/// Point-lookup capability.
#[async_trait]
pub trait ToolFinder: Send {
    /// Look up one artifact by its tool-scoped id.
    async fn find(&mut self, id: &str) -> Result<Option<ArtifactData>>;
}

/// Shorthand for the "tool yields no lister" configuration error.
pub(crate) fn require_lister(tool: &mut dyn Tool) -> Result<&mut dyn ToolLister> {
    let name = tool.name().to_string();
    tool.as_lister().ok_or(Error::UnsupportedCapability {
        tool: name,
        capability: "listing",
    })
}
