//! Digest accumulators and finalized digest results

use crate::config::HashAlgorithm;
use serde::{Deserialize, Serialize};
use sha2::Digest;

/// Finalized digest in raw and lowercase hex form
///
/// The hex string is always derived from the raw bytes; deserializing a
/// record whose `hex` disagrees with its `bytes` fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DigestRecord")]
pub struct DigestResult {
    algorithm: HashAlgorithm,
    #[serde(with = "hex::serde")]
    bytes: Vec<u8>,
    hex: String,
    size: u64,
}

/// Unchecked wire form of a [`DigestResult`]
#[derive(Deserialize)]
struct DigestRecord {
    algorithm: HashAlgorithm,
    #[serde(with = "hex::serde")]
    bytes: Vec<u8>,
    hex: String,
    size: u64,
}

impl TryFrom<DigestRecord> for DigestResult {
    type Error = String;

    fn try_from(record: DigestRecord) -> Result<Self, Self::Error> {
        if record.bytes.len() != record.algorithm.output_size() {
            return Err(format!(
                "{} digest must be {} bytes, got {}",
                record.algorithm.name(),
                record.algorithm.output_size(),
                record.bytes.len()
            ));
        }

        let digest = Self::new(record.algorithm, record.bytes, record.size);
        if digest.hex != record.hex {
            return Err(format!(
                "hex '{}' does not encode the digest bytes ({})",
                record.hex, digest.hex
            ));
        }
        Ok(digest)
    }
}

impl DigestResult {
    /// Build a result from raw digest bytes; the hex form is derived here
    pub fn new(algorithm: HashAlgorithm, bytes: Vec<u8>, size: u64) -> Self {
        let hex = hex::encode(&bytes);
        Self {
            algorithm,
            bytes,
            hex,
            size,
        }
    }

    /// The hash algorithm used
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Number of bytes fed to the accumulator
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex digest
    pub fn to_hex(&self) -> &str {
        &self.hex
    }

    /// Split into the (raw bytes, hex string) pair
    pub fn into_parts(self) -> (Vec<u8>, String) {
        (self.bytes, self.hex)
    }

    /// Verify against another digest result
    pub fn verify(&self, other: &DigestResult) -> bool {
        self.algorithm == other.algorithm && self.bytes == other.bytes
    }
}

impl std::fmt::Display for DigestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hex)
    }
}

/// Streaming digest accumulator for every supported algorithm
#[derive(Clone)]
pub enum Hasher {
    /// MD5
    Md5(md5::Md5),
    /// SHA-1
    Sha1(sha1::Sha1),
    /// SHA-224
    Sha224(sha2::Sha224),
    /// SHA-256
    Sha256(sha2::Sha256),
    /// SHA-384
    Sha384(sha2::Sha384),
    /// SHA-512
    Sha512(sha2::Sha512),
    /// SHA3-256
    Sha3_256(sha3::Sha3_256),
    /// SHA3-512
    Sha3_512(sha3::Sha3_512),
    /// BLAKE3
    Blake3(Box<blake3::Hasher>),
}

impl Hasher {
    /// Create a new hasher for the given algorithm
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(md5::Md5::new()),
            HashAlgorithm::Sha1 => Self::Sha1(sha1::Sha1::new()),
            HashAlgorithm::Sha224 => Self::Sha224(sha2::Sha224::new()),
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Sha384 => Self::Sha384(sha2::Sha384::new()),
            HashAlgorithm::Sha512 => Self::Sha512(sha2::Sha512::new()),
            HashAlgorithm::Sha3_256 => Self::Sha3_256(sha3::Sha3_256::new()),
            HashAlgorithm::Sha3_512 => Self::Sha3_512(sha3::Sha3_512::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    /// Get the algorithm this hasher uses
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Md5(_) => HashAlgorithm::Md5,
            Self::Sha1(_) => HashAlgorithm::Sha1,
            Self::Sha224(_) => HashAlgorithm::Sha224,
            Self::Sha256(_) => HashAlgorithm::Sha256,
            Self::Sha384(_) => HashAlgorithm::Sha384,
            Self::Sha512(_) => HashAlgorithm::Sha512,
            Self::Sha3_256(_) => HashAlgorithm::Sha3_256,
            Self::Sha3_512(_) => HashAlgorithm::Sha3_512,
            Self::Blake3(_) => HashAlgorithm::Blake3,
        }
    }

    /// Update the hasher with more data
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(h) => h.update(data),
            Self::Sha1(h) => h.update(data),
            Self::Sha224(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
            Self::Sha3_256(h) => h.update(data),
            Self::Sha3_512(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    /// Finalize and get the raw digest bytes
    pub fn finalize(self) -> Vec<u8> {
        match self {
            Self::Md5(h) => h.finalize().to_vec(),
            Self::Sha1(h) => h.finalize().to_vec(),
            Self::Sha224(h) => h.finalize().to_vec(),
            Self::Sha256(h) => h.finalize().to_vec(),
            Self::Sha384(h) => h.finalize().to_vec(),
            Self::Sha512(h) => h.finalize().to_vec(),
            Self::Sha3_256(h) => h.finalize().to_vec(),
            Self::Sha3_512(h) => h.finalize().to_vec(),
            Self::Blake3(h) => h.finalize().as_bytes().to_vec(),
        }
    }
}

impl std::fmt::Debug for Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Hasher").field(&self.algorithm()).finish()
    }
}

/// Compute the digest of data in memory
pub fn hash_bytes(data: &[u8], algorithm: HashAlgorithm) -> DigestResult {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    DigestResult::new(algorithm, hasher.finalize(), data.len() as u64)
}
