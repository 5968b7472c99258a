//! The digest primitive shared by every node in the trie.

use crate::constant::HASH_SIZE;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Blake2b with a 256-bit output, the sole hash function of the forestry.
type Blake2b256 = Blake2b<U32>;

/// A 32-byte Blake2b-256 digest.
#[derive(
    Clone,
    Copy,
    Deref,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct Hash(pub [u8; HASH_SIZE]);

/// Digest of the empty trie and of every empty child slot.
pub const NULL_HASH: Hash = Hash([0u8; HASH_SIZE]);

impl Hash {
    /// Borrow the raw digest bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", hex::encode(self.0))
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    #[inline]
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }
}

/// Hash arbitrary bytes with Blake2b-256.
pub fn hash_value(data: &[u8]) -> Hash {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    Hash(hasher.finalize().into())
}

/// Hash the concatenation of two digests, the pairwise Merkle reduction step.
pub(crate) fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    let mut hasher = Blake2b256::new();
    hasher.update(a.0);
    hasher.update(b.0);
    Hash(hasher.finalize().into())
}
