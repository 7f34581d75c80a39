//! Shared test utilities for the artifact-vault workspace.
//!
//! Provides a scriptable [`MockTool`] plus fixture helpers so engine and
//! integration tests do not each reinvent a data source. Dev-dependency
//! only, never published.

pub mod fixtures;
pub mod mock_tool;

pub use fixtures::{artifact, resource_info, resource_key, session};
pub use mock_tool::{MockArtifact, MockTool, VisitLog};
