// src/merkle.rs
// Leaf hashing used to look entries up by hash

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

/// RFC 6962 domain separation prefix for leaves
pub const LEAF_HASH_PREFIX: u8 = 0x00;

/// Computes the Merkle leaf hash the log uses to index an entry.
pub trait LeafHasher: Send + Sync {
    fn hash_leaf(&self, leaf_input: &[u8]) -> Vec<u8>;

    /// Leaf hash in the encoding `get-proof-by-hash` expects
    fn hash_leaf_base64(&self, leaf_input: &[u8]) -> String {
        STANDARD.encode(self.hash_leaf(leaf_input))
    }
}

/// SHA-256(0x00 || leaf_input)
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc6962Hasher;

impl LeafHasher for Rfc6962Hasher {
    fn hash_leaf(&self, leaf_input: &[u8]) -> Vec<u8> {
        let mut h = Sha256::new();
        h.update([LEAF_HASH_PREFIX]);
        h.update(leaf_input);
        h.finalize().to_vec()
    }
}
