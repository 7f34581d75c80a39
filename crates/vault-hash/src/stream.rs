//! Read-through hashing stream
//!
//! [`HashingStream`] decorates an `AsyncRead`, forwarding bytes unchanged
//! while feeding them into a hasher. The digest is only meaningful once the
//! inner stream has been drained. Streams nest: wrapping one hashing stream
//! in another yields two independent digests from a single read pass, which
//! is how rehashing verifies the old checksum while computing the new one,
//! and how dump hashes content while writing it to the data store.

use crate::registry::Hasher;
use crate::{ChecksumRegistry, Error, Result};
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use tokio::io::{AsyncRead, ReadBuf};
use vault_model::Checksum;

/// Pass-through `AsyncRead` decorator accumulating a digest.
pub struct HashingStream<R> {
    inner: R,
    hasher: Box<dyn Hasher>,
}

impl<R: AsyncRead + Unpin> HashingStream<R> {
    /// Wrap a reader with a fresh hasher.
    pub fn new(inner: R, hasher: Box<dyn Hasher>) -> Self {
        Self { inner, hasher }
    }

    /// Finish hashing, returning the inner reader and the digest.
    ///
    /// Only meaningful after the stream has been read to EOF; a digest over
    /// a partially read stream covers only the bytes that passed through.
    pub fn finalize(self) -> (R, Vec<u8>) {
        (self.inner, self.hasher.finalize())
    }

    /// Finish hashing and discard the inner reader.
    pub fn into_digest(self) -> Vec<u8> {
        self.hasher.finalize()
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for HashingStream<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let me = self.get_mut();
        let filled_before = buf.filled().len();
        ready!(Pin::new(&mut me.inner).poll_read(cx, buf))?;
        me.hasher.update(&buf.filled()[filled_before..]);
        Poll::Ready(Ok(()))
    }
}

/// Drain a reader through a hashing stream, producing a checksum under the
/// named algorithm. Used by the validation backfill path.
pub async fn hash_reader<R>(
    registry: &ChecksumRegistry,
    algorithm_id: &str,
    reader: R,
) -> Result<Checksum>
where
    R: AsyncRead + Unpin,
{
    let (canonical, hasher) = registry.resolve(algorithm_id)?;
    let mut stream = HashingStream::new(reader, hasher);
    tokio::io::copy(&mut stream, &mut tokio::io::sink())
        .await
        .map_err(Error::Io)?;
    Ok(Checksum::new(canonical, stream.into_digest()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn registry() -> ChecksumRegistry {
        ChecksumRegistry::new()
    }

    #[tokio::test]
    async fn bytes_pass_through_unchanged() {
        let data = b"the quick brown fox".to_vec();
        let (_, hasher) = registry().resolve("SHA256").unwrap();
        let mut stream = HashingStream::new(data.as_slice(), hasher);
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, data);
        assert_eq!(
            hex::encode(stream.into_digest()),
            "9ecb36561341d18eb65484e833efea61edc74b84cf5e6ae1b81c63533e25fc8f"
        );
    }

    #[tokio::test]
    async fn chained_streams_produce_two_digests_in_one_pass() {
        let data = b"layered hashing".to_vec();
        let (_, sha256) = registry().resolve("SHA256").unwrap();
        let (_, sha512) = registry().resolve("SHA512").unwrap();
        let inner = HashingStream::new(data.as_slice(), sha256);
        let mut outer = HashingStream::new(inner, sha512);
        tokio::io::copy(&mut outer, &mut tokio::io::sink())
            .await
            .unwrap();
        let (inner, new_digest) = outer.finalize();
        let (_, old_digest) = inner.finalize();

        let expected_old = hash_reader(&registry(), "SHA256", data.as_slice())
            .await
            .unwrap();
        let expected_new = hash_reader(&registry(), "SHA512", data.as_slice())
            .await
            .unwrap();
        assert_eq!(old_digest, expected_old.digest);
        assert_eq!(new_digest, expected_new.digest);
    }

    #[tokio::test]
    async fn hash_reader_uses_canonical_id() {
        let checksum = hash_reader(&registry(), "sha1", b"abc".as_slice())
            .await
            .unwrap();
        assert_eq!(checksum.algorithm_id, "SHA1");
        assert_eq!(
            hex::encode(&checksum.digest),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[tokio::test]
    async fn empty_stream_hashes_empty_input() {
        let checksum = hash_reader(&registry(), "SHA256", b"".as_slice())
            .await
            .unwrap();
        assert_eq!(
            hex::encode(&checksum.digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
