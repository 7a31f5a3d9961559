//! Roster hashing for layout staleness detection
//!
//! A saved layout remembers the fingerprint of the roster it was arranged
//! from. A different fingerprint on load means the roster changed since.

use sha2::{Digest, Sha256};

use crate::domain::StaffRecord;

/// Compute 8-character hex hash of content (first 32 bits of SHA-256).
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    // First 4 bytes = 8 hex characters
    hex::encode(&result[..4])
}

/// Fingerprint of a roster, independent of record order.
pub fn roster_fingerprint(records: &[StaffRecord]) -> String {
    let mut sorted: Vec<&StaffRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut buf = Vec::new();
    for r in sorted {
        // Unit separator keeps field boundaries unambiguous
        for field in [
            r.id.as_str(),
            r.name.as_str(),
            r.department.as_str(),
            r.position.key(),
            r.contact.as_str(),
        ] {
            buf.extend_from_slice(field.as_bytes());
            buf.push(0x1f);
        }
        buf.push(0x1e);
    }
    content_hash(&buf)
}
