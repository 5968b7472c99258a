//! Leaf nodes, the terminal key-value carriers of the trie.

use crate::constant::HASH_SIZE;
use crate::hash::{hash_value, Hash};
use crate::nibble::{key_to_path, nibbles_to_bytes, Nibble};
use crate::proof::Proof;
use crate::trie::TrieError;

/// A terminal node binding a value to the end of a key path.
///
/// `suffix` is the portion of the 64-nibble path below the parent slot. The
/// original key bytes are retained because proof steps need the neighbor
/// leaf's full path, not just its suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    hash: Hash,
    suffix: Vec<Nibble>,
    key: Vec<u8>,
    value: Vec<u8>,
}

impl Leaf {
    /// Create a leaf, copying the caller's key and value bytes.
    pub(crate) fn new(suffix: &[Nibble], key: &[u8], value: &[u8]) -> Self {
        let mut leaf = Leaf {
            hash: Hash::default(),
            suffix: suffix.to_vec(),
            key: key.to_vec(),
            value: value.to_vec(),
        };
        leaf.update_hash();
        leaf
    }

    /// The cached node digest.
    #[inline]
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Remaining path nibbles below the parent slot.
    pub(crate) fn suffix(&self) -> &[Nibble] {
        &self.suffix
    }

    /// The original key bytes.
    pub(crate) fn key(&self) -> &[u8] {
        &self.key
    }

    /// The bound value bytes.
    pub(crate) fn value(&self) -> &[u8] {
        &self.value
    }

    /// Replace the stored value, copying the caller's bytes.
    pub(crate) fn set_value(&mut self, value: &[u8]) {
        self.value.clear();
        self.value.extend_from_slice(value);
        self.update_hash();
    }

    /// Prepend `prefix ++ [slot]` to the suffix when an enclosing branch
    /// collapses around this leaf.
    pub(crate) fn absorb_prefix(&mut self, prefix: &[Nibble], slot: Nibble) {
        let mut suffix = Vec::with_capacity(prefix.len() + 1 + self.suffix.len());
        suffix.extend_from_slice(prefix);
        suffix.push(slot);
        suffix.append(&mut self.suffix);
        self.suffix = suffix;
        self.update_hash();
    }

    /// Start a proof at this leaf. The proof carries the full 64-nibble path
    /// recomputed from the stored key; steps are added by the branches above
    /// as the recursion unwinds.
    pub(crate) fn generate_proof(&self, path: &[Nibble]) -> Result<Proof, TrieError> {
        if path != self.suffix {
            return Err(TrieError::KeyNotExist);
        }
        Ok(Proof::new(key_to_path(&self.key), self.value.clone()))
    }

    /// Recompute the cached digest from the structural fields.
    ///
    /// An even-length suffix hashes as `0xFF ++ packed(suffix) ++ H(value)`;
    /// an odd one peels the head nibble into the marker, hashing as
    /// `0x00 ++ suffix[0] ++ packed(suffix[1..]) ++ H(value)`.
    fn update_hash(&mut self) {
        let value_hash = hash_value(&self.value);
        let mut data = Vec::with_capacity(2 + self.suffix.len() / 2 + HASH_SIZE);
        let tail = if self.suffix.len() % 2 == 0 {
            data.push(0xff);
            nibbles_to_bytes(&self.suffix)
        } else {
            data.push(0x00);
            data.push(self.suffix[0]);
            nibbles_to_bytes(&self.suffix[1..])
        };
        data.extend_from_slice(&tail);
        data.extend_from_slice(value_hash.as_bytes());
        self.hash = hash_value(&data);
    }
}
