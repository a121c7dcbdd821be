use sha2::{Digest, Sha256};

/// Stable identifier for a script: SHA-256 of the raw text as lowercase
/// hex. Identical scripts always map to the same episode id, which is
/// what the duplicate-import check keys on.
pub fn content_id(text: &str) -> String {
    Sha256::digest(text.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
