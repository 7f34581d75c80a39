//! Archival engines for Artifact Vault.
//!
//! Three engines share the tool abstraction and the two stores:
//!
//! - [`DumpEngine`] drives a tool's enumeration and commits new artifacts
//!   and resources under a policy ([`vault_model::DumpOptions`]).
//! - [`ValidationEngine`] audits registered state for missing or corrupted
//!   content, accumulating a [`vault_model::ValidationFailureSet`].
//! - [`RepairEngine`] re-invokes the originating tools to heal a failure
//!   set, reporting what could not be recovered.
//!
//! A fourth, [`RehashEngine`], migrates stored checksums to a new algorithm
//! in a single verify-while-rehashing pass.
//!
//! Profiles are processed strictly sequentially; every resource is read
//! once, streamed once, hashed once. Cancellation is dropping the future:
//! resource records are registered only after their content is committed,
//! so an aborted run can only leave missing content behind, never a
//! registered record over partial bytes.

pub mod commit;
pub mod dump;
pub mod error;
pub mod logging;
pub mod registry;
pub mod rehash;
pub mod repair;
pub mod tool;
pub mod validate;

pub use commit::{PersistOutcome, persist_resource};
pub use dump::{DumpEngine, DumpResult};
pub use error::{Error, Result};
pub use registry::ToolRegistry;
pub use rehash::{RehashEngine, RehashResult};
pub use repair::{RepairEngine, RepairOutcome};
pub use tool::{
    ArtifactData, BytesContent, ContentSource, ResourceData, Tool, ToolConfig, ToolFinder,
    ToolLister,
};
pub use validate::{ValidationEngine, ValidationProcessResult};
