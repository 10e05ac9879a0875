//! Lazy fixed-size chunk reading
//!
//! [`ChunkReader`] pulls up to `chunk_size` bytes per step from any
//! [`std::io::Read`] source until a read returns zero bytes.
//!
//! ```
//! use karamel::hash::read_chunks;
//! use std::io::Cursor;
//!
//! let mut stream = Cursor::new(b"hello world".to_vec());
//! let sizes: Vec<usize> = read_chunks(&mut stream, 4)?
//!     .map(|chunk| chunk.map(|c| c.len()))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(sizes, vec![4, 4, 3]);
//! # Ok::<(), karamel::KaramelError>(())
//! ```

use crate::error::{KaramelError, Result};
use std::borrow::Borrow;
use std::io::{ErrorKind, Read, Write};
use std::ops::Deref;

/// Largest read buffer a [`ChunkReader`] allocates, whatever the chunk size
pub const MAX_READ_BUFFER: usize = 8 * 1024 * 1024;

/// An immutable, non-empty block of bytes read from a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk(Vec<u8>);

impl Chunk {
    /// Bytes of this chunk
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take ownership of the underlying buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Chunk {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl Borrow<[u8]> for Chunk {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Iterator over the chunks of a reader.
///
/// Each step performs a single `read` of at most `chunk_size` bytes, so a
/// chunk may be shorter than requested whenever the reader returns less.
/// The sequence ends at the first zero-length read and is fused after an
/// error. Dropping the iterator early leaves the reader's cursor wherever
/// the last read put it; nothing is rewound.
///
/// The read buffer is allocated on the first step, capped at
/// [`MAX_READ_BUFFER`], and reused for every later read.
pub struct ChunkReader<R> {
    reader: R,
    chunk_size: usize,
    buffer: Vec<u8>,
    finished: bool,
}

/// Start reading `reader` in chunks of at most `chunk_size` bytes.
///
/// Fails with [`KaramelError::InvalidArgument`] when `chunk_size` is zero,
/// before anything is read.
pub fn read_chunks<R: Read>(reader: R, chunk_size: usize) -> Result<ChunkReader<R>> {
    if chunk_size == 0 {
        return Err(KaramelError::invalid_argument(
            "chunk size must be greater than zero",
        ));
    }

    Ok(ChunkReader {
        reader,
        chunk_size,
        buffer: Vec::new(),
        finished: false,
    })
}

impl<R> ChunkReader<R> {
    /// Requested chunk size
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.buffer.is_empty() {
            self.buffer = vec![0u8; self.chunk_size.min(MAX_READ_BUFFER)];
        }

        loop {
            match self.reader.read(&mut self.buffer) {
                Ok(0) => {
                    self.finished = true;
                    return None;
                }
                Ok(n) => return Some(Ok(Chunk(self.buffer[..n].to_vec()))),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(KaramelError::stream(e)));
                }
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for ChunkReader<R> {}

/// Write every chunk to `writer`, in order. Returns the number of bytes written.
pub fn write_chunks<I, W>(chunks: I, writer: &mut W) -> Result<u64>
where
    I: IntoIterator<Item = Result<Chunk>>,
    W: Write + ?Sized,
{
    let mut written = 0u64;
    for chunk in chunks {
        let chunk = chunk?;
        writer.write_all(&chunk).map_err(KaramelError::stream)?;
        written += chunk.len() as u64;
    }
    Ok(written)
}
