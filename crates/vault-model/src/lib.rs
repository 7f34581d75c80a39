//! Shared data model for the Artifact Vault workspace.
//!
//! An *artifact* is one logical item produced by a tool (a post, a page, a
//! release); a *resource* is one blob belonging to an artifact. This crate
//! defines the keys and records both the registration layer and the engines
//! operate on, the dump policy enums, tool profiles, and the failure set
//! exchanged between validation and repair.

pub mod artifact;
pub mod checksum;
pub mod error;
pub mod failure;
pub mod options;
pub mod profile;
pub mod resource;

pub use artifact::{ArtifactInfo, ArtifactKey};
pub use checksum::Checksum;
pub use error::{Error, Result};
pub use failure::ValidationFailureSet;
pub use options::{ArtifactSkipMode, DumpOptions, ResourceUpdateMode};
pub use profile::{ArtifactToolProfile, profiles_from_reader, profiles_from_str};
pub use resource::{ArtifactResourceInfo, ArtifactResourceKey};
