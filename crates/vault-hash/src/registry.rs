//! Checksum algorithm registry
//!
//! Lookups are case-insensitive. The id `"none"` (or an absent id at the
//! caller) disables checksumming and is not a registry entry.

use crate::{Error, Result};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

/// Object-safe incremental hasher.
///
/// A thin seam over the RustCrypto digest types so registry entries can be
/// held as trait objects.
pub trait Hasher: Send {
    /// Feed bytes into the accumulator.
    fn update(&mut self, data: &[u8]);
    /// Consume the accumulator and return the digest.
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

impl std::fmt::Debug for dyn Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Hasher")
    }
}

impl<D: Digest + Send> Hasher for D {
    fn update(&mut self, data: &[u8]) {
        Digest::update(self, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        Digest::finalize(*self).to_vec()
    }
}

/// Factory producing a fresh hasher per stream.
pub type HasherFactory = fn() -> Box<dyn Hasher>;

/// Id reserved for "no checksumming"; never resolves.
const NONE_ID: &str = "none";

/// Static table of checksum algorithms.
///
/// Canonical ids follow the upper-case convention of the archive format
/// (`SHA1`, `SHA256`, ...); callers may use any casing.
pub struct ChecksumRegistry {
    entries: Vec<(&'static str, HasherFactory)>,
}

impl ChecksumRegistry {
    /// Create a registry with the default algorithm set.
    pub fn new() -> Self {
        Self {
            entries: vec![
                ("SHA1", || Box::new(Sha1::new())),
                ("SHA256", || Box::new(Sha256::new())),
                ("SHA384", || Box::new(Sha384::new())),
                ("SHA512", || Box::new(Sha512::new())),
            ],
        }
    }

    /// Whether an algorithm id means "checksumming disabled".
    pub fn is_disabled(id: Option<&str>) -> bool {
        match id {
            None => true,
            Some(id) => id.eq_ignore_ascii_case(NONE_ID),
        }
    }

    /// Canonical ids of every registered algorithm.
    pub fn algorithm_ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Whether an id resolves (case-insensitive).
    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    /// The canonical casing of an algorithm id.
    pub fn canonical_id(&self, id: &str) -> Option<&'static str> {
        self.lookup(id).map(|(canonical, _)| canonical)
    }

    /// Resolve an id to its canonical form and a fresh hasher.
    pub fn resolve(&self, id: &str) -> Result<(&'static str, Box<dyn Hasher>)> {
        self.lookup(id)
            .map(|(canonical, factory)| (canonical, factory()))
            .ok_or_else(|| Error::UnknownAlgorithm {
                id: id.to_string(),
                known: self.algorithm_ids().join(", "),
            })
    }

    fn lookup(&self, id: &str) -> Option<(&'static str, HasherFactory)> {
        self.entries
            .iter()
            .find(|(canonical, _)| canonical.eq_ignore_ascii_case(id))
            .copied()
    }
}

impl Default for ChecksumRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_case_insensitive() {
        let registry = ChecksumRegistry::new();
        assert!(registry.contains("sha256"));
        assert!(registry.contains("Sha256"));
        assert_eq!(registry.canonical_id("sha512"), Some("SHA512"));
    }

    #[test]
    fn unknown_algorithm_lists_known_ids() {
        let registry = ChecksumRegistry::new();
        let err = registry.resolve("CRC32").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("CRC32"));
        assert!(msg.contains("SHA256"));
    }

    #[test]
    fn none_disables_checksumming() {
        assert!(ChecksumRegistry::is_disabled(None));
        assert!(ChecksumRegistry::is_disabled(Some("none")));
        assert!(ChecksumRegistry::is_disabled(Some("NONE")));
        assert!(!ChecksumRegistry::is_disabled(Some("SHA256")));
        assert!(!ChecksumRegistry::new().contains("none"));
    }

    #[test]
    fn sha256_known_value() {
        let registry = ChecksumRegistry::new();
        let (id, mut hasher) = registry.resolve("sha256").unwrap();
        assert_eq!(id, "SHA256");
        hasher.update(b"hello world");
        let digest = hasher.finalize();
        assert_eq!(
            hex::encode(digest),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
