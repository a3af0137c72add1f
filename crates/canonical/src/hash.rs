//! Version-aware fingerprints of normalized names.
//!
//! ```text
//! SHA-256(version.to_be_bytes() || 0x00 || normalized_text_bytes)
//! ```
//!
//! Including the rule version keeps fingerprints produced under different
//! suffix lists or toggles from colliding in a caller's lookup table.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 fingerprint of a normalized name under `version`.
///
/// ```rust
/// use canonical::fingerprint_normalized;
///
/// let a = fingerprint_normalized(1, "istanbul tekstil");
/// assert_eq!(a.len(), 64);
/// assert_ne!(a, fingerprint_normalized(2, "istanbul tekstil"));
/// ```
pub fn fingerprint_normalized(version: u32, normalized: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(version.to_be_bytes());
    hasher.update([0u8]);
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}
