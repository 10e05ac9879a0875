//! File descriptions with an optional open stream
//!
//! [`FileInfo`] captures size and timestamps of a file when it is opened and
//! can hold a stream on it for hashing. The stream is closed when the
//! `FileInfo` is dropped.

use crate::error::{IoResultExt, KaramelError, Result};
use crate::fs::platform::{creation_time, modification_time, unix_seconds};
use crate::hash::{stream_sha256_hash, DigestResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// How the stream of a [`FileInfo`] is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    /// Read only
    #[default]
    Read,
    /// Write only, truncating existing content
    Write,
    /// Write only, appending to existing content
    Append,
    /// Read and write without truncation
    ReadWrite,
}

impl OpenMode {
    /// Whether a stream opened in this mode can be read, and so hashed
    pub fn is_readable(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            Self::Read => options.read(true),
            Self::Write => options.write(true).truncate(true),
            Self::Append => options.append(true),
            Self::ReadWrite => options.read(true).write(true),
        };
        options
    }
}

/// Options for [`FileInfo::open`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOptions {
    /// Open a stream on the file
    pub open_stream: bool,
    /// Mode of the stream
    pub mode: OpenMode,
    /// Compute and keep the SHA-256 digest right away (needs an open stream)
    pub cache_hash: bool,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            open_stream: false,
            mode: OpenMode::Read,
            cache_hash: true,
        }
    }
}

impl FileOptions {
    /// Options that open a read stream and cache its digest
    pub fn with_stream() -> Self {
        Self {
            open_stream: true,
            ..Default::default()
        }
    }
}

/// Serializable snapshot of a [`FileInfo`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Path the file was opened with
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Modification time, seconds since the Unix epoch
    pub modified: f64,
    /// Modification time as local ISO-8601
    pub human_modified: String,
    /// Creation time, seconds since the Unix epoch
    pub created: f64,
    /// Whether a stream is currently open
    pub has_open_stream: bool,
}

/// A file on disk with its metadata
#[derive(Debug)]
pub struct FileInfo {
    path: PathBuf,
    size: u64,
    modified: SystemTime,
    created: SystemTime,
    human_modified: String,
    mode: OpenMode,
    stream: Option<File>,
    hash: Option<DigestResult>,
}

impl FileInfo {
    /// Describe the file at `path`, opening a stream if requested
    pub fn open(path: impl AsRef<Path>, options: FileOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KaramelError::NotFound(path.to_path_buf()));
        }

        // checked before opening, a write-mode open truncates
        if options.open_stream && options.cache_hash && !options.mode.is_readable() {
            return Err(KaramelError::invalid_argument(format!(
                "cannot hash a stream opened in {:?} mode",
                options.mode
            )));
        }

        let metadata = std::fs::metadata(path).with_path(path)?;
        let modified = modification_time(&metadata);

        let stream = if options.open_stream {
            Some(options.mode.options().open(path).with_path(path)?)
        } else {
            None
        };

        let mut info = Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            modified,
            created: creation_time(&metadata),
            human_modified: format_local(modified),
            mode: options.mode,
            stream,
            hash: None,
        };

        if options.cache_hash && info.has_open_stream() {
            info.hash()?;
        }

        tracing::debug!(path = %info.path.display(), size = info.size, "file opened");
        Ok(info)
    }

    /// Path the file was opened with
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes at open time
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last modification time
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Creation time, or the modification time where unavailable
    pub fn created(&self) -> SystemTime {
        self.created
    }

    /// Modification time as local ISO-8601
    pub fn human_modified(&self) -> &str {
        &self.human_modified
    }

    /// Mode of the stream (or the mode it would be opened with)
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Whether a stream is open
    pub fn has_open_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Most recently computed digest, if any
    pub fn cached_hash(&self) -> Option<&DigestResult> {
        self.hash.as_ref()
    }

    /// Borrow the open stream
    pub fn stream_mut(&mut self) -> Result<&mut File> {
        self.stream
            .as_mut()
            .ok_or_else(|| KaramelError::NoOpenStream(self.path.clone()))
    }

    /// SHA-256 of the open stream; the stream position is preserved
    pub fn hash(&mut self) -> Result<DigestResult> {
        if self.stream.is_some() && !self.mode.is_readable() {
            return Err(KaramelError::invalid_argument(format!(
                "cannot hash a stream opened in {:?} mode",
                self.mode
            )));
        }
        let path = self.path.clone();
        let digest = stream_sha256_hash(self.stream_mut()?).map_err(|e| match e {
            KaramelError::Stream { source } | KaramelError::ResourceUnavailable { source } => {
                KaramelError::io(&path, source)
            }
            other => other,
        })?;
        self.hash = Some(digest.clone());
        Ok(digest)
    }

    /// Reopen the stream in another mode
    pub fn change_mode(&mut self, mode: OpenMode) -> Result<()> {
        if self.stream.take().is_none() {
            return Err(KaramelError::NoOpenStream(self.path.clone()));
        }
        self.stream = Some(mode.options().open(&self.path).with_path(&self.path)?);
        self.mode = mode;
        Ok(())
    }

    /// Close the stream if one is open
    pub fn close(&mut self) {
        self.stream = None;
    }

    /// Snapshot of the file's description
    pub fn descriptor(&self) -> FileDescriptor {
        FileDescriptor {
            path: self.path.clone(),
            size: self.size,
            modified: unix_seconds(self.modified),
            human_modified: self.human_modified.clone(),
            created: unix_seconds(self.created),
            has_open_stream: self.has_open_stream(),
        }
    }
}

fn format_local(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use filetime::FileTime;
    use std::io::{Read, Seek, SeekFrom};
    use tempfile::TempDir;

    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn create_test_file(dir: &Path, content: &[u8]) -> PathBuf {
        let path = dir.join("test.bin");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = FileInfo::open(dir.path().join("nope"), FileOptions::default()).unwrap_err();
        assert!(matches!(err, KaramelError::NotFound(_)));
    }

    #[test]
    fn test_metadata_without_stream() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), b"hello world");
        filetime::set_file_mtime(&path, FileTime::from_unix_time(1_000_000_000, 0)).unwrap();

        let mut info = FileInfo::open(&path, FileOptions::default()).unwrap();
        assert_eq!(info.size(), 11);
        assert!(!info.has_open_stream());
        assert!(info.cached_hash().is_none());
        assert!(info.human_modified().starts_with("2001-09-0"));

        let descriptor = info.descriptor();
        assert_eq!(descriptor.modified, 1_000_000_000.0);
        assert!(!descriptor.has_open_stream);

        let err = info.hash().unwrap_err();
        assert!(matches!(err, KaramelError::NoOpenStream(_)));
        assert_eq!(err.class(), ErrorClass::ResourceUnavailable);
        assert!(info.change_mode(OpenMode::ReadWrite).is_err());
    }

    #[test]
    fn test_stream_hash_cached_on_open() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), b"hello world");

        let mut info = FileInfo::open(&path, FileOptions::with_stream()).unwrap();
        assert!(info.has_open_stream());
        assert_eq!(info.cached_hash().unwrap().to_hex(), HELLO_SHA256);

        // hashing left the cursor at the start
        let mut content = String::new();
        info.stream_mut().unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_hash_preserves_position() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), b"hello world");
        let options = FileOptions {
            cache_hash: false,
            ..FileOptions::with_stream()
        };

        let mut info = FileInfo::open(&path, options).unwrap();
        assert!(info.cached_hash().is_none());

        info.stream_mut().unwrap().seek(SeekFrom::Start(6)).unwrap();
        assert_eq!(info.hash().unwrap().to_hex(), HELLO_SHA256);
        assert_eq!(info.stream_mut().unwrap().stream_position().unwrap(), 6);
    }

    #[test]
    fn test_write_mode_with_cached_hash_keeps_content() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), b"precious");
        let options = FileOptions {
            open_stream: true,
            mode: OpenMode::Write,
            ..Default::default()
        };

        let err = FileInfo::open(&path, options).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(std::fs::read(&path).unwrap(), b"precious");
    }

    #[test]
    fn test_hash_rejects_write_only_stream() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), b"abc");
        let options = FileOptions {
            open_stream: true,
            mode: OpenMode::Append,
            cache_hash: false,
        };

        let mut info = FileInfo::open(&path, options).unwrap();
        assert!(info.hash().unwrap_err().is_invalid_argument());
        assert!(info.cached_hash().is_none());
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
        assert!(OpenMode::ReadWrite.is_readable());
        assert!(!OpenMode::Write.is_readable());
    }

    #[test]
    fn test_change_mode_and_close() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), b"abc");

        let mut info = FileInfo::open(&path, FileOptions::with_stream()).unwrap();
        info.change_mode(OpenMode::Append).unwrap();
        assert_eq!(info.mode(), OpenMode::Append);
        std::io::Write::write_all(info.stream_mut().unwrap(), b"def").unwrap();

        info.close();
        assert!(!info.has_open_stream());
        assert!(matches!(info.stream_mut(), Err(KaramelError::NoOpenStream(_))));
        assert_eq!(std::fs::read(&path).unwrap(), b"abcdef");
    }

    #[test]
    fn test_descriptor_serializes() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), b"x");
        let info = FileInfo::open(&path, FileOptions::default()).unwrap();

        let json = serde_json::to_value(info.descriptor()).unwrap();
        assert_eq!(json["size"], 1);
        assert_eq!(json["has_open_stream"], false);
        assert!(json["created"].as_f64().unwrap() > 0.0);
    }
}
