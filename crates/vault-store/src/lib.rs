//! Store interfaces and implementations for Artifact Vault.
//!
//! Two stores back the archive: the [`RegistrationStore`] holds durable
//! metadata for artifacts and resources, the [`DataStore`] holds the byte
//! content. Both are process-wide and assume single-writer access enforced
//! outside this crate.
//!
//! Writes to a [`DataStore`] go through a [`ResourceWriter`] that only makes
//! content durable on `commit`; a writer dropped mid-stream leaves no trace.
//! Engines register a resource strictly after committing its content, so an
//! aborted run can only ever produce a missing resource, never a registered
//! record over partial content.

pub mod data;
pub mod disk;
pub mod error;
pub mod memory;
pub mod registration;

pub use data::{DataStore, NullDataStore, ResourceWriter};
pub use disk::DiskDataStore;
pub use error::{Error, Result};
pub use memory::{MemoryDataStore, MemoryRegistrationStore};
pub use registration::RegistrationStore;
