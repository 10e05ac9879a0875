//! Error types for karamel
//!
//! Every failure is surfaced to the immediate caller as a typed condition.
//! Nothing in this crate retries or recovers locally.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for karamel operations
#[derive(Error, Debug)]
pub enum KaramelError {
    /// A caller-supplied argument was rejected before any I/O took place
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Digest algorithm identifier is not supported
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Stream cannot report or restore its position
    #[error("Stream is not seekable: {source}")]
    ResourceUnavailable {
        #[source]
        source: std::io::Error,
    },

    /// Read or seek failed on a caller-provided stream
    #[error("Stream I/O error: {source}")]
    Stream {
        #[source]
        source: std::io::Error,
    },

    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File or directory not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Operation needs an open stream but the file has none
    #[error("No open stream for '{0}'")]
    NoOpenStream(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<KaramelError>,
    },
}

/// Coarse classification of a [`KaramelError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rejected input; the stream was never touched
    InvalidArgument,
    /// A required capability (seeking, an open stream) is missing
    ResourceUnavailable,
    /// An underlying read, seek or open failed
    IoFailure,
}

impl KaramelError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a stream I/O error
    pub fn stream(source: std::io::Error) -> Self {
        Self::Stream { source }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Classify this error
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidArgument(_) | Self::UnsupportedAlgorithm(_) | Self::ConfigError(_) => {
                ErrorClass::InvalidArgument
            }
            Self::ResourceUnavailable { .. } | Self::NoOpenStream(_) => {
                ErrorClass::ResourceUnavailable
            }
            Self::Stream { .. } | Self::Io { .. } | Self::NotFound(_) => ErrorClass::IoFailure,
            Self::WithContext { source, .. } => source.class(),
        }
    }

    /// Check if this error was raised before any stream access
    pub fn is_invalid_argument(&self) -> bool {
        self.class() == ErrorClass::InvalidArgument
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::NotFound(path) | Self::NoOpenStream(path) => Some(path),
            Self::WithContext { source, .. } => source.path(),
            _ => None,
        }
    }
}

/// Result type alias for karamel operations
pub type Result<T> = std::result::Result<T, KaramelError>;

impl From<serde_json::Error> for KaramelError {
    fn from(err: serde_json::Error) -> Self {
        KaramelError::ConfigError(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| KaramelError::io(path, e))
    }
}
