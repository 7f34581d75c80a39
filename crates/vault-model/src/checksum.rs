//! Checksum records
//!
//! A checksum pairs the identifier of the algorithm that produced it with the
//! raw digest bytes. Absence of a checksum on a resource is a legal state
//! ("unchecksummed"), distinct from a failed verification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An (algorithm id, digest) integrity tag for a resource's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum {
    /// Registry identifier of the producing algorithm, e.g. `"SHA256"`
    pub algorithm_id: String,
    /// Raw digest bytes
    pub digest: Vec<u8>,
}

impl Checksum {
    /// Create a checksum from an algorithm id and digest bytes.
    pub fn new(algorithm_id: impl Into<String>, digest: Vec<u8>) -> Self {
        Self {
            algorithm_id: algorithm_id.into(),
            digest,
        }
    }

    /// Constant-shape byte comparison against another digest.
    pub fn matches_digest(&self, digest: &[u8]) -> bool {
        self.digest.as_slice() == digest
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm_id, hex::encode(&self.digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_id_colon_hex() {
        let c = Checksum::new("SHA256", vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(c.to_string(), "SHA256:deadbeef");
    }

    #[test]
    fn matches_digest_compares_bytes() {
        let c = Checksum::new("SHA256", vec![1, 2, 3]);
        assert!(c.matches_digest(&[1, 2, 3]));
        assert!(!c.matches_digest(&[1, 2, 4]));
        assert!(!c.matches_digest(&[1, 2]));
    }
}
