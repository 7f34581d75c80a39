//! Scriptable in-memory tool
//!
//! A [`MockTool`] serves a fixed set of artifacts through the listing
//! and/or lookup capabilities, recording every artifact id it yields so
//! tests can assert on enumeration behaviour (e.g. fast-exit stopping).

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use vault_engine::{
    ArtifactData, BytesContent, ResourceData, Result, Tool, ToolConfig, ToolFinder, ToolLister,
};
use vault_model::{ArtifactInfo, ArtifactResourceInfo, ArtifactToolProfile};

/// Shared log of artifact ids touched by a tool capability.
pub type VisitLog = Arc<Mutex<Vec<String>>>;

/// Blueprint for one artifact the mock tool can produce.
#[derive(Clone)]
pub struct MockArtifact {
    /// Artifact record the tool will yield
    pub info: ArtifactInfo,
    /// Resource records with their content bytes
    pub resources: Vec<(ArtifactResourceInfo, Vec<u8>)>,
}

impl MockArtifact {
    /// Start a blueprint from an artifact record.
    pub fn new(info: ArtifactInfo) -> Self {
        Self {
            info,
            resources: Vec::new(),
        }
    }

    /// Add one resource with content (builder pattern).
    pub fn with_resource(mut self, info: ArtifactResourceInfo, bytes: impl Into<Vec<u8>>) -> Self {
        self.resources.push((info, bytes.into()));
        self
    }

    fn to_data(&self) -> ArtifactData {
        let mut data = ArtifactData::new(self.info.clone());
        for (info, bytes) in &self.resources {
            data = data.with_resource(ResourceData::new(info.clone(), BytesContent(bytes.clone())));
        }
        data
    }
}

/// Tool serving a scripted artifact set.
pub struct MockTool {
    name: String,
    artifacts: Vec<MockArtifact>,
    listing: bool,
    lookup: bool,
    cursor: usize,
    listed: VisitLog,
    found: VisitLog,
}

impl MockTool {
    /// Create a tool with both capabilities and no artifacts.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifacts: Vec::new(),
            listing: true,
            lookup: true,
            cursor: 0,
            listed: Arc::default(),
            found: Arc::default(),
        }
    }

    /// Replace the scripted artifact set (builder pattern).
    pub fn with_artifacts(mut self, artifacts: Vec<MockArtifact>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Disable the listing capability.
    pub fn without_listing(mut self) -> Self {
        self.listing = false;
        self
    }

    /// Disable the lookup capability.
    pub fn without_lookup(mut self) -> Self {
        self.lookup = false;
        self
    }

    /// Share a log that records every id yielded by listing.
    pub fn with_listed_log(mut self, log: VisitLog) -> Self {
        self.listed = log;
        self
    }

    /// Share a log that records every id asked of lookup.
    pub fn with_found_log(mut self, log: VisitLog) -> Self {
        self.found = log;
        self
    }
}

#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(
        &mut self,
        _config: ToolConfig,
        _profile: &ArtifactToolProfile,
    ) -> Result<()> {
        Ok(())
    }

    fn as_lister(&mut self) -> Option<&mut dyn ToolLister> {
        if self.listing { Some(self) } else { None }
    }

    fn as_finder(&mut self) -> Option<&mut dyn ToolFinder> {
        if self.lookup { Some(self) } else { None }
    }
}

#[async_trait]
impl ToolLister for MockTool {
    async fn begin_listing(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    async fn next_artifact(&mut self) -> Result<Option<ArtifactData>> {
        let Some(blueprint) = self.artifacts.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;
        self.listed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(blueprint.info.key.id.clone());
        Ok(Some(blueprint.to_data()))
    }
}

#[async_trait]
impl ToolFinder for MockTool {
    async fn find(&mut self, id: &str) -> Result<Option<ArtifactData>> {
        self.found
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(id.to_string());
        Ok(self
            .artifacts
            .iter()
            .find(|a| a.info.key.id == id)
            .map(MockArtifact::to_data))
    }
}
