//! Digest helpers for deterministic record keys

use sha2::{Digest, Sha256};

/// Compute a hex-encoded SHA-256 digest over a sequence of string parts.
///
/// Parts are joined with an ASCII unit separator (0x1f) before hashing, so
/// `["ab", "c"]` and `["a", "bc"]` produce distinct digests.
pub fn sha256_hex(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update([0x1f]);
        }
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
