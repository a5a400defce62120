//! Stable identifiers derived from human-readable keys.
//!
//! Generated text refers to places by name ("the Northern Marches"), while the
//! simulation addresses provinces by id. Hashing the normalized key gives the
//! same id for the same key in every call, task, turn and process, so no
//! registry of previously issued ids is needed.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Namespace prefix for region keys.
pub const REGION_NAMESPACE: &str = "statecraft:region:";
/// Namespace prefix for nation keys (scenario builder only).
pub const NATION_NAMESPACE: &str = "statecraft:nation:";
/// Namespace prefix for office keys (scenario builder only).
pub const OFFICE_NAMESPACE: &str = "statecraft:office:";
/// Namespace prefix for character keys (scenario builder only).
pub const CHARACTER_NAMESPACE: &str = "statecraft:character:";

/// Map a region key to its stable identifier.
pub fn stabilize(human_key: &str) -> String {
    stable_id(REGION_NAMESPACE, human_key)
}

/// Hash `namespace + lowercase(trim(key))` and format the leading 16 bytes of
/// the digest as a version-5-style UUID.
pub fn stable_id(namespace: &str, key: &str) -> String {
    let normalized = key.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(normalized.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    // version 5
    bytes[6] = (bytes[6] & 0x0f) | 0x50;
    // RFC 4122 variant
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes).hyphenated().to_string()
}

/// True when `value` is already an identifier rather than a human-readable key.
pub fn is_canonical_id(value: &str) -> bool {
    Uuid::parse_str(value.trim()).is_ok()
}
