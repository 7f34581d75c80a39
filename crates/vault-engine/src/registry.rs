//! Tool registry
//!
//! The registry is the plugin seam: an opaque identifier maps to a factory
//! producing a fresh, uninitialized [`Tool`]. Dynamic discovery, module
//! loading, and isolation all live behind this table; the engines only ever
//! resolve by name.

use crate::tool::Tool;
use crate::{Error, Result};
use std::collections::BTreeMap;
use vault_model::ArtifactToolProfile;

type ToolFactory = Box<dyn Fn() -> Box<dyn Tool> + Send + Sync>;

/// Name-to-factory table of available tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolFactory>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool factory under a name.
    pub fn register<F, T>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Tool + 'static,
    {
        self.tools
            .insert(name.into(), Box::new(move || Box::new(factory())));
    }

    /// Whether a tool name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted.
    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Construct a fresh tool instance for a profile.
    ///
    /// An unknown tool name is a configuration error and fatal for the
    /// calling run.
    pub fn resolve(&self, profile: &ArtifactToolProfile) -> Result<Box<dyn Tool>> {
        self.tools
            .get(&profile.tool)
            .map(|factory| factory())
            .ok_or_else(|| Error::ToolNotFound {
                tool: profile.tool.clone(),
                known: self.list().join(", "),
            })
    }
}
