//! Content-addressed fingerprints for trees.
//!
//! The fingerprint covers the nested document form, so two trees built from
//! the same document in the same order hash identically regardless of how
//! their arenas were populated.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::document::TreeDocument;
use crate::tree::VariabilityTree;

/// A 32-byte SHA-256 content hash.
pub type ContentHash = [u8; 32];

/// Compute the SHA-256 content hash of any serializable value.
pub fn content_hash<T: Serialize>(value: &T) -> ContentHash {
    let json = serde_json::to_vec(value).expect("serialization should not fail");
    let mut hasher = Sha256::new();
    hasher.update(&json);
    hasher.finalize().into()
}

/// Format a content hash as a hex string.
pub fn hash_hex(hash: &ContentHash) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Hex fingerprint of a tree.
pub fn fingerprint(tree: &VariabilityTree) -> String {
    hash_hex(&content_hash(&TreeDocument::from_tree(tree)))
}
