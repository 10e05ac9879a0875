//! Configuration settings for karamel
//!
//! Defines the CLI arguments, the supported digest algorithms and the
//! runtime hashing configuration built from them.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::KaramelError;

/// Buffer capacity for file readers
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// karamel - inspect local files and compute streaming digests
#[derive(Parser, Debug, Clone)]
#[command(name = "karamel")]
#[command(author = "Delta Foundry")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect local files and compute streaming digests")]
#[command(long_about = r#"
karamel reads files as a stream of chunks and computes cryptographic digests
without loading them into memory.

Examples:
  karamel hash data.bin                  # SHA-256 of a file
  karamel hash -a sha512 a.bin b.bin     # Several files, another algorithm
  karamel info data.bin --json           # Size and timestamps as JSON
  karamel hide notes.txt                 # Hide a file the OS-native way
"#)]
pub struct CliArgs {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    /// Log filter directive derived from the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compute the digest of one or more files
    #[command(name = "hash")]
    Hash(HashArgs),

    /// Show size and timestamps of a file
    #[command(name = "info")]
    Info {
        /// File to inspect
        path: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Hide a file (dot-prefix on Unix, hidden attribute on Windows)
    #[command(name = "hide")]
    Hide {
        /// File to hide
        path: PathBuf,
    },

    /// List supported digest algorithms
    #[command(name = "algorithms")]
    Algorithms,
}

/// Arguments of the `hash` subcommand
#[derive(Args, Debug, Clone)]
pub struct HashArgs {
    /// Files to hash
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Digest algorithm
    #[arg(
        short = 'a',
        long,
        value_enum,
        env = "KARAMEL_ALGORITHM",
        default_value = "sha256",
        value_name = "ALGO"
    )]
    pub algorithm: HashAlgorithm,

    /// Read chunk size in bytes (defaults to the algorithm's block size)
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Supported digest algorithms
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5 - kept for compatibility only
    #[value(name = "md5")]
    Md5,
    /// SHA-1 (160-bit)
    #[value(name = "sha1")]
    Sha1,
    /// SHA-224
    #[value(name = "sha224")]
    Sha224,
    /// SHA-256 - recommended for file hashing
    #[default]
    #[value(name = "sha256")]
    Sha256,
    /// SHA-384
    #[value(name = "sha384")]
    Sha384,
    /// SHA-512
    #[value(name = "sha512")]
    Sha512,
    /// SHA3-256
    #[serde(rename = "sha3-256")]
    #[value(name = "sha3-256")]
    Sha3_256,
    /// SHA3-512
    #[serde(rename = "sha3-512")]
    #[value(name = "sha3-512")]
    Sha3_512,
    /// BLAKE3 (256-bit output)
    #[value(name = "blake3")]
    Blake3,
}

impl HashAlgorithm {
    /// Every supported algorithm, in listing order
    pub const ALL: [HashAlgorithm; 9] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha3_256,
        Self::Sha3_512,
        Self::Blake3,
    ];

    /// Parse an algorithm identifier such as `sha256`, `SHA-256` or `sha3_256`
    pub fn parse(id: &str) -> Result<Self, KaramelError> {
        let normalized: String = id
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            "sha3256" => Ok(Self::Sha3_256),
            "sha3512" => Ok(Self::Sha3_512),
            "blake3" => Ok(Self::Blake3),
            _ => Err(KaramelError::UnsupportedAlgorithm(id.to_string())),
        }
    }

    /// Canonical lowercase identifier
    pub fn id(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_512 => "sha3-512",
            Self::Blake3 => "blake3",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha224 => "SHA-224",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha3_512 => "SHA3-512",
            Self::Blake3 => "BLAKE3",
        }
    }

    /// Get the output size in bytes
    pub fn output_size(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 | Self::Sha3_256 | Self::Blake3 => 32,
            Self::Sha384 => 48,
            Self::Sha512 | Self::Sha3_512 => 64,
        }
    }

    /// Internal block size of the compression function, in bytes.
    ///
    /// Only used to size read chunks; it never changes the digest.
    pub fn block_size(&self) -> usize {
        match self {
            Self::Md5 | Self::Sha1 | Self::Sha224 | Self::Sha256 | Self::Blake3 => 64,
            Self::Sha384 | Self::Sha512 => 128,
            Self::Sha3_256 => 136,
            Self::Sha3_512 => 72,
        }
    }

    /// Chunk size to read with when the caller gives none
    pub fn chunk_size(&self) -> usize {
        self.block_size()
    }

    /// Whether this algorithm is only accepted for backward compatibility
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::Md5)
    }
}

impl FromStr for HashAlgorithm {
    type Err = KaramelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Runtime configuration for a hashing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashConfig {
    /// Digest algorithm
    pub algorithm: HashAlgorithm,
    /// Read chunk size override (None = algorithm block size)
    pub chunk_size: Option<usize>,
    /// Put the stream cursor back where it was after hashing
    pub restore_position: bool,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            chunk_size: None,
            restore_position: true,
        }
    }
}

impl HashConfig {
    /// Create configuration from the `hash` subcommand arguments
    pub fn from_cli(args: &HashArgs) -> Result<Self, String> {
        if args.chunk_size == Some(0) {
            return Err("chunk size must be greater than zero".to_string());
        }

        Ok(Self {
            algorithm: args.algorithm,
            chunk_size: args.chunk_size,
            ..Default::default()
        })
    }

    /// Chunk size that will actually be used for reads
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or_else(|| self.algorithm.chunk_size())
    }
}
