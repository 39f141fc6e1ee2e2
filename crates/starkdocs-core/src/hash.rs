//! Content hashing for change detection.

/// Hash chunk content with blake3, returned as lowercase hex.
///
/// Downstream stores compare this against the previously stored hash to skip
/// re-embedding chunks whose text did not change.
#[must_use]
pub fn content_hash(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}
