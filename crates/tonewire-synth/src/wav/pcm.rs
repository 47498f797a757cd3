//! PCM hashing.

/// BLAKE3 hash of raw PCM bytes as lowercase hex.
pub fn pcm_hash(pcm_data: &[u8]) -> String {
    blake3::hash(pcm_data).to_hex().to_string()
}
