//! Content hashing for exact deduplication.

use blake3::Hasher as Blake3Hasher;

/// Computes content identities for downloaded payloads.
pub struct Hasher;

impl Hasher {
    /// Generate a BLAKE3 hash from an in-memory byte buffer.
    ///
    /// The hex digest doubles as the on-disk file stem, so identical
    /// payloads always land on the same filename.
    pub fn content_hash_from_bytes(data: &[u8]) -> String {
        let mut hasher = Blake3Hasher::new();
        hasher.update(data);
        hasher.finalize().to_hex().to_string()
    }
}
