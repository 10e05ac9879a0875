//! Streaming digests over seekable byte streams
//!
//! The hasher always digests a stream from offset 0 to its end and, unless
//! told otherwise, puts the cursor back where the caller left it.

use crate::config::{HashAlgorithm, HashConfig, DEFAULT_CHUNK_SIZE};
use crate::error::{IoResultExt, KaramelError, Result};
use crate::hash::chunk::read_chunks;
use crate::hash::digest::{DigestResult, Hasher};
use crate::hash::legacy;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

const MD5_NOTICE: &str =
    "MD5 is supported for compatibility purposes only and should be avoided where possible";

/// Computes digests of whole streams while preserving the caller's cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHasher {
    algorithm: HashAlgorithm,
    chunk_size: Option<usize>,
    restore_position: bool,
}

impl StreamHasher {
    /// Create a hasher that reads in block-size chunks and restores position
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            chunk_size: None,
            restore_position: true,
        }
    }

    /// Create a hasher from an algorithm identifier such as `"sha256"`
    pub fn from_name(algorithm: &str) -> Result<Self> {
        Ok(Self::new(HashAlgorithm::parse(algorithm)?))
    }

    /// Create a hasher from a runtime configuration
    pub fn from_config(config: &HashConfig) -> Self {
        Self {
            algorithm: config.algorithm,
            chunk_size: config.chunk_size,
            restore_position: config.restore_position,
        }
    }

    /// Override the read chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Choose whether the cursor is moved back after hashing
    pub fn restore_position(mut self, restore: bool) -> Self {
        self.restore_position = restore;
        self
    }

    /// Algorithm this hasher computes
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Chunk size that reads will use
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or_else(|| self.algorithm.chunk_size())
    }

    /// Digest the full contents of `stream`, from offset 0 to end-of-stream.
    ///
    /// With position restore enabled (the default) the stream must report its
    /// position, otherwise [`KaramelError::ResourceUnavailable`] is returned
    /// and nothing is read. After a successful call the cursor is back at the
    /// recorded position, or at end-of-stream when restore is disabled.
    pub fn hash<S>(&self, stream: &mut S) -> Result<DigestResult>
    where
        S: Read + Seek + ?Sized,
    {
        if self.algorithm.is_deprecated() {
            legacy::deprecated(self.algorithm.id(), Some(MD5_NOTICE), || {
                self.hash_stream(stream)
            })
        } else {
            self.hash_stream(stream)
        }
    }

    fn hash_stream<S>(&self, stream: &mut S) -> Result<DigestResult>
    where
        S: Read + Seek + ?Sized,
    {
        let chunk_size = self.chunk_size();
        if chunk_size == 0 {
            return Err(KaramelError::invalid_argument(
                "chunk size must be greater than zero",
            ));
        }

        let origin = if self.restore_position {
            let position = stream
                .stream_position()
                .map_err(|source| KaramelError::ResourceUnavailable { source })?;
            Some(position)
        } else {
            None
        };

        stream.seek(SeekFrom::Start(0)).map_err(KaramelError::stream)?;

        let mut hasher = Hasher::new(self.algorithm);
        let mut size = 0u64;
        for chunk in read_chunks(&mut *stream, chunk_size)? {
            let chunk = chunk?;
            hasher.update(&chunk);
            size += chunk.len() as u64;
        }
        let digest = DigestResult::new(self.algorithm, hasher.finalize(), size);

        if let Some(position) = origin {
            stream
                .seek(SeekFrom::Start(position))
                .map_err(KaramelError::stream)?;
        }

        tracing::debug!(
            algorithm = %self.algorithm,
            chunk_size,
            bytes = size,
            "stream digest computed"
        );

        Ok(digest)
    }
}

/// Digest a stream with an algorithm given by identifier.
///
/// The identifier is validated before the stream is touched.
pub fn stream_hash<S>(algorithm: &str, stream: &mut S, restore_position: bool) -> Result<DigestResult>
where
    S: Read + Seek + ?Sized,
{
    StreamHasher::from_name(algorithm)?
        .restore_position(restore_position)
        .hash(stream)
}

/// SHA-256 digest of a stream; the recommended choice for file hashing
pub fn stream_sha256_hash<S>(stream: &mut S) -> Result<DigestResult>
where
    S: Read + Seek + ?Sized,
{
    StreamHasher::new(HashAlgorithm::Sha256).hash(stream)
}

/// MD5 hex digest of a stream
#[deprecated(note = "MD5 is kept for compatibility only; use `stream_sha256_hash`")]
pub fn stream_md5_hash<S>(stream: &mut S) -> Result<String>
where
    S: Read + Seek + ?Sized,
{
    StreamHasher::new(HashAlgorithm::Md5)
        .hash(stream)
        .map(|digest| digest.to_hex().to_string())
}

/// Compute the digest of a file
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<DigestResult> {
    hash_file_with_config(
        path,
        &HashConfig {
            algorithm,
            ..Default::default()
        },
    )
}

/// Compute the digest of a file with an explicit configuration
pub fn hash_file_with_config(path: &Path, config: &HashConfig) -> Result<DigestResult> {
    let file = File::open(path).with_path(path)?;
    let mut reader = BufReader::with_capacity(DEFAULT_CHUNK_SIZE, file);

    StreamHasher::from_config(config)
        .restore_position(false)
        .hash(&mut reader)
        .map_err(|e| match e {
            KaramelError::Stream { source } | KaramelError::ResourceUnavailable { source } => {
                KaramelError::io(path, source)
            }
            other => other,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::hash::digest::hash_bytes;
    use crate::hash::legacy::capture::with_captured_logs;
    use proptest::prelude::*;
    use std::io::{self, Cursor, ErrorKind};
    use tempfile::TempDir;

    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    /// Stream whose seeks always fail, like a pipe
    struct Unseekable {
        inner: Cursor<Vec<u8>>,
        reads: usize,
    }

    impl Unseekable {
        fn new(data: &[u8]) -> Self {
            Self {
                inner: Cursor::new(data.to_vec()),
                reads: 0,
            }
        }
    }

    impl Read for Unseekable {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            self.inner.read(buf)
        }
    }

    impl Seek for Unseekable {
        fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
            Err(io::Error::new(ErrorKind::Unsupported, "illegal seek"))
        }
    }

    /// Seekable stream that fails after serving `fail_at` bytes
    struct Flaky {
        inner: Cursor<Vec<u8>>,
        fail_at: u64,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.inner.position() >= self.fail_at {
                return Err(io::Error::new(ErrorKind::Other, "media error"));
            }
            self.inner.read(buf)
        }
    }

    impl Seek for Flaky {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_hello_world_sha256() {
        let mut stream = Cursor::new(b"hello world".to_vec());
        let digest = stream_sha256_hash(&mut stream).unwrap();
        assert_eq!(digest.to_hex(), HELLO_SHA256);
        assert_eq!(digest.as_bytes(), hex::decode(HELLO_SHA256).unwrap().as_slice());
        assert_eq!(digest.size(), 11);
    }

    #[test]
    fn test_empty_stream_sha256() {
        let mut stream = Cursor::new(Vec::new());
        let digest = stream_hash("sha256", &mut stream, true).unwrap();
        assert_eq!(digest.to_hex(), EMPTY_SHA256);
        assert_eq!(digest.size(), 0);
    }

    #[test]
    fn test_oversized_chunk_size() {
        let mut stream = Cursor::new(b"hello world".to_vec());
        let digest = StreamHasher::new(HashAlgorithm::Sha256)
            .with_chunk_size(usize::MAX / 2)
            .hash(&mut stream)
            .unwrap();
        assert_eq!(digest.to_hex(), HELLO_SHA256);
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_hashes_from_offset_zero_and_restores_cursor() {
        let mut stream = Cursor::new(b"hello world".to_vec());
        stream.set_position(5);

        let first = stream_sha256_hash(&mut stream).unwrap();
        assert_eq!(stream.position(), 5);
        let second = stream_sha256_hash(&mut stream).unwrap();
        assert_eq!(stream.position(), 5);

        assert_eq!(first, second);
        assert_eq!(first.to_hex(), HELLO_SHA256);
    }

    #[test]
    fn test_without_restore_cursor_at_end() {
        let mut stream = Cursor::new(vec![9u8; 300]);
        stream.set_position(17);
        stream_hash("sha512", &mut stream, false).unwrap();
        assert_eq!(stream.position(), 300);
    }

    #[test]
    fn test_unsupported_algorithm_leaves_stream_untouched() {
        let mut stream = Cursor::new(b"hello world".to_vec());
        stream.set_position(3);
        let err = stream_hash("sha999", &mut stream, true).unwrap_err();
        assert!(matches!(err, KaramelError::UnsupportedAlgorithm(_)));
        assert_eq!(err.class(), ErrorClass::InvalidArgument);
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn test_zero_chunk_size_rejected_before_io() {
        let mut stream = Unseekable::new(b"abc");
        let err = StreamHasher::new(HashAlgorithm::Sha256)
            .with_chunk_size(0)
            .hash(&mut stream)
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(stream.reads, 0);
    }

    #[test]
    fn test_unseekable_with_restore_is_resource_unavailable() {
        let mut stream = Unseekable::new(b"hello world");
        let err = stream_sha256_hash(&mut stream).unwrap_err();
        assert!(matches!(err, KaramelError::ResourceUnavailable { .. }));
        assert_eq!(stream.reads, 0);
    }

    #[test]
    fn test_unseekable_without_restore_is_io_failure() {
        let mut stream = Unseekable::new(b"hello world");
        let err = stream_hash("sha256", &mut stream, false).unwrap_err();
        assert_eq!(err.class(), ErrorClass::IoFailure);
        assert_eq!(stream.reads, 0);
    }

    #[test]
    fn test_read_failure_propagates() {
        let mut stream = Flaky {
            inner: Cursor::new(vec![1u8; 1024]),
            fail_at: 256,
        };
        let err = StreamHasher::new(HashAlgorithm::Sha256)
            .with_chunk_size(100)
            .hash(&mut stream)
            .unwrap_err();
        assert!(matches!(err, KaramelError::Stream { .. }));
    }

    #[test]
    fn test_chunk_size_independence_for_all_algorithms() {
        let data: Vec<u8> = (0..5000).map(|i| (i * 31 % 251) as u8).collect();
        for algorithm in HashAlgorithm::ALL {
            let expected = hash_bytes(&data, algorithm);
            for chunk_size in [1, 7, 64, 4096, 10_000] {
                let digest = StreamHasher::new(algorithm)
                    .with_chunk_size(chunk_size)
                    .hash(&mut Cursor::new(&data))
                    .unwrap();
                assert!(digest.verify(&expected), "{algorithm} at {chunk_size}");
            }
        }
    }

    #[test]
    fn test_md5_emits_notice_per_call() {
        let (digests, logs) = with_captured_logs(|| {
            let mut stream = Cursor::new(b"hello world".to_vec());
            #[allow(deprecated)]
            let first = stream_md5_hash(&mut stream).unwrap();
            let second = stream_hash("md5", &mut stream, true).unwrap();
            (first, second)
        });

        assert_eq!(digests.0, "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(digests.1.to_hex(), digests.0);
        assert_eq!(logs.matches("MD5 is supported for compatibility").count(), 2);
    }

    #[test]
    fn test_sha256_emits_no_notice() {
        let (_, logs) = with_captured_logs(|| {
            stream_sha256_hash(&mut Cursor::new(b"quiet".to_vec())).unwrap()
        });
        assert!(logs.is_empty());
    }

    #[test]
    fn test_hash_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        let content = b"Test file content for hashing";
        std::fs::write(&path, content).unwrap();

        let file_hash = hash_file(&path, HashAlgorithm::Blake3).unwrap();
        assert_eq!(file_hash, hash_bytes(content, HashAlgorithm::Blake3));
    }

    #[test]
    fn test_hash_missing_file_carries_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.bin");
        let err = hash_file(&path, HashAlgorithm::Sha256).unwrap_err();
        assert_eq!(err.path(), Some(&path));
    }

    proptest! {
        #[test]
        fn prop_chunk_size_does_not_change_digest(
            data in proptest::collection::vec(any::<u8>(), 0..2048),
            c1 in 1usize..300,
            c2 in 1usize..300,
            start in 0u64..2048,
        ) {
            let mut stream = Cursor::new(data.clone());
            stream.set_position(start);

            let a = StreamHasher::new(HashAlgorithm::Sha256).with_chunk_size(c1).hash(&mut stream).unwrap();
            prop_assert_eq!(stream.position(), start);
            let b = StreamHasher::new(HashAlgorithm::Sha256).with_chunk_size(c2).hash(&mut stream).unwrap();
            prop_assert_eq!(stream.position(), start);

            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a, hash_bytes(&data, HashAlgorithm::Sha256));
        }
    }
}
