//! # karamel - file inspection and streaming digests
//!
//! karamel computes cryptographic digests of seekable byte streams in
//! fixed-size chunks, without disturbing the caller's read position, and
//! describes local files (size, modification and creation times).
//!
//! ## Quick Start
//!
//! ```
//! use karamel::hash::stream_sha256_hash;
//! use std::io::Cursor;
//!
//! let mut stream = Cursor::new(b"hello world".to_vec());
//! stream.set_position(4);
//!
//! let digest = stream_sha256_hash(&mut stream)?;
//! assert_eq!(
//!     digest.to_hex(),
//!     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
//! );
//! assert_eq!(stream.position(), 4);
//! # Ok::<(), karamel::KaramelError>(())
//! ```
//!
//! ## Choosing the algorithm and chunk size
//!
//! ```
//! use karamel::config::HashAlgorithm;
//! use karamel::hash::StreamHasher;
//! use std::io::Cursor;
//!
//! let hasher = StreamHasher::new(HashAlgorithm::Sha512)
//!     .with_chunk_size(4096)
//!     .restore_position(false);
//!
//! let mut stream = Cursor::new(vec![0u8; 10_000]);
//! let digest = hasher.hash(&mut stream)?;
//! assert_eq!(digest.as_bytes().len(), 64);
//! assert_eq!(stream.position(), 10_000);
//! # Ok::<(), karamel::KaramelError>(())
//! ```
//!
//! ## Files
//!
//! ```no_run
//! use karamel::fs::{FileInfo, FileOptions};
//!
//! let info = FileInfo::open("/data/archive.tar", FileOptions::with_stream())?;
//! println!("{} bytes, modified {}", info.size(), info.human_modified());
//! println!("sha256 {}", info.cached_hash().unwrap());
//! # Ok::<(), karamel::KaramelError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod fs;
pub mod hash;

// Re-export commonly used types
pub use config::{HashAlgorithm, HashConfig};
pub use error::{ErrorClass, KaramelError, Result};
pub use hash::{DigestResult, StreamHasher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```
    //! use karamel::prelude::*;
    //! ```

    pub use crate::config::{HashAlgorithm, HashConfig};
    pub use crate::error::{ErrorClass, KaramelError, Result};
    pub use crate::fs::{hide_file, FileDescriptor, FileInfo, FileOptions, OpenMode};
    pub use crate::hash::{
        hash_bytes, hash_file, read_chunks, stream_hash, stream_sha256_hash, DigestResult,
        StreamHasher,
    };
}
