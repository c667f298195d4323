//! BLAKE3 helpers for text fingerprints.

/// 32-byte fingerprint of the text an embedding was computed from.
pub type TextFingerprint = [u8; 32];

/// Computes the full BLAKE3 fingerprint of `text`.
#[inline]
pub fn fingerprint_text(text: &str) -> TextFingerprint {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Truncates a BLAKE3 hash of `data` to 64 bits (used to seed stub embeddings).
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
