//! Content fingerprints for cache keys
//!
//! A fingerprint is the first 16 hex characters (8 bytes) of a file's SHA-256
//! digest. Same bytes = same fingerprint, no matter how large the file is or
//! how it is read. Truncation to 64 bits means two different files can
//! collide; at realistic library sizes that risk is accepted.

use crate::error::{ReelError, ReelResult};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Number of hex characters kept from the digest
pub const FINGERPRINT_LEN: usize = 16;

/// Read size while hashing
const BLOCK_SIZE: usize = 4096;

/// Truncated SHA-256 digest identifying file content
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a file by streaming it in 4 KiB blocks
    pub fn of_file(path: &Path) -> ReelResult<Self> {
        let file = File::open(path)
            .map_err(|e| ReelError::io(format!("opening {}", path.display()), e))?;

        let fingerprint = Self::of_reader(file)
            .map_err(|e| ReelError::io(format!("reading {}", path.display()), e))?;

        debug!("Fingerprinted {}: {}", path.display(), fingerprint);
        Ok(fingerprint)
    }

    /// Fingerprint everything a reader yields
    pub fn of_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut block = [0u8; BLOCK_SIZE];

        loop {
            let read = match reader.read(&mut block) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&block[..read]);
        }

        let digest = hasher.finalize();
        Ok(Self(hex::encode(&digest[..FINGERPRINT_LEN / 2])))
    }

    /// Fingerprint an in-memory buffer
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(hex::encode(&digest[..FINGERPRINT_LEN / 2]))
    }

    /// The hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Fingerprint {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == FINGERPRINT_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(ReelError::InvalidFingerprint(s.to_string()))
        }
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
