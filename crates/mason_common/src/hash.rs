//! Content hashing for staleness detection and metadata file naming.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A 128-bit XXH3 hash.
///
/// Used two ways in mason: hashing file contents for change detection, and
/// hashing source unit *path names* to derive the deterministic file names
/// under which per-unit metadata is stored. Two inputs with the same
/// `ContentHash` are assumed identical.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Hashes a path's *name* (not the file it points to).
    ///
    /// This is how dependency records are located without a separate index:
    /// the record for a source unit lives at a file name derived from this
    /// hash, so the same unit path always maps to the same record path.
    pub fn from_path_name(path: &Path) -> Self {
        Self::from_bytes(path.to_string_lossy().as_bytes())
    }

    /// Returns the first eight hex characters of the hash.
    ///
    /// Used as a short disambiguating suffix in object file names, where two
    /// units in different directories may share a file stem.
    pub fn short_hex(&self) -> String {
        format!(
            "{:02x}{:02x}{:02x}{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
