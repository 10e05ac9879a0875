//! Chunked streaming digests
//!
//! Reads a stream as a lazy sequence of chunks and feeds them into a
//! cryptographic digest accumulator, leaving the caller's cursor in place.

mod chunk;
mod digest;
pub mod legacy;
mod stream;

pub use chunk::{read_chunks, write_chunks, Chunk, ChunkReader, MAX_READ_BUFFER};
pub use digest::{hash_bytes, DigestResult, Hasher};
#[allow(deprecated)]
pub use stream::{
    hash_file, hash_file_with_config, stream_hash, stream_md5_hash, stream_sha256_hash,
    StreamHasher,
};
