//! Checksum registry and single-pass hashing streams.
//!
//! The registry maps case-insensitive algorithm identifiers to hasher
//! factories; [`HashingStream`] taps bytes flowing through an `AsyncRead`
//! into a hasher without buffering the payload. Streams compose, so one read
//! pass can verify an old checksum while computing a new one.

pub mod error;
pub mod registry;
pub mod stream;

pub use error::{Error, Result};
pub use registry::{ChecksumRegistry, Hasher, HasherFactory};
pub use stream::{HashingStream, hash_reader};
