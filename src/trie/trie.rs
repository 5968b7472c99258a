//! The trie facade: the root node and the public operations.

use crate::hash::{Hash, NULL_HASH};
use crate::nibble::{common_prefix, key_to_path};
use crate::proof::Proof;
use crate::trie::node::Node;
use crate::trie::{Branch, Leaf, TrieError};
use std::fmt;
use tracing::trace;

/// An in-memory Merkle Patricia Forestry: an authenticated key-value map
/// whose root digest commits to every binding.
///
/// All operations are synchronous and touch `O(log n)` nodes. The structure
/// is single-writer; concurrent mutation is a caller error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trie {
    root: Option<Node>,
    len: usize,
}

impl Trie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the trie holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// The root digest. The empty trie hashes to the null hash.
    pub fn hash(&self) -> Hash {
        self.root.as_ref().map_or(NULL_HASH, Node::hash)
    }

    /// Insert or update a key. Key and value bytes are copied, so the caller
    /// may reuse its buffers afterwards.
    pub fn set(&mut self, key: &[u8], value: &[u8]) {
        trace!(key = %hex::encode(key), value_len = value.len(), "set");
        let path = key_to_path(key);
        let added = match self.root.take() {
            None => {
                self.root = Some(Node::Leaf(Leaf::new(&path, key, value)));
                true
            }
            Some(Node::Leaf(mut leaf)) => {
                if path == leaf.suffix() {
                    leaf.set_value(value);
                    self.root = Some(Node::Leaf(leaf));
                    false
                } else {
                    // Two keys: fork the root leaf below a branch on the
                    // shared path prefix.
                    let mut branch = Branch::new(common_prefix(&path, leaf.suffix()));
                    branch.insert(leaf.suffix(), leaf.key(), leaf.value());
                    branch.insert(&path, key, value);
                    self.root = Some(Node::Branch(Box::new(branch)));
                    true
                }
            }
            Some(Node::Branch(mut branch)) => {
                let shared = common_prefix(&path, branch.prefix()).len();
                if shared == branch.prefix().len() {
                    let added = branch.insert(&path, key, value);
                    self.root = Some(Node::Branch(branch));
                    added
                } else {
                    // The path diverges inside the root prefix: push the
                    // existing branch down under a new root.
                    let mut outer = branch.split_prefix(shared);
                    outer.insert(&path, key, value);
                    self.root = Some(Node::Branch(Box::new(outer)));
                    true
                }
            }
        };
        if added {
            self.len += 1;
        }
    }

    /// The value bound to `key`, or [`TrieError::KeyNotExist`].
    pub fn get(&self, key: &[u8]) -> Result<&[u8], TrieError> {
        let path = key_to_path(key);
        match self.root.as_ref().ok_or(TrieError::KeyNotExist)? {
            Node::Leaf(leaf) if path == leaf.suffix() => Ok(leaf.value()),
            Node::Leaf(_) => Err(TrieError::KeyNotExist),
            Node::Branch(branch) => branch.get(&path),
        }
    }

    /// Whether `key` is present.
    pub fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_ok()
    }

    /// Remove a key. Fails with [`TrieError::KeyNotExist`] for unknown keys.
    pub fn delete(&mut self, key: &[u8]) -> Result<(), TrieError> {
        trace!(key = %hex::encode(key), "delete");
        let path = key_to_path(key);
        match self.root.take() {
            None => Err(TrieError::KeyNotExist),
            Some(Node::Leaf(leaf)) => {
                if path == leaf.suffix() {
                    self.len -= 1;
                    Ok(())
                } else {
                    self.root = Some(Node::Leaf(leaf));
                    Err(TrieError::KeyNotExist)
                }
            }
            Some(Node::Branch(mut branch)) => {
                if let Err(err) = branch.delete(&path) {
                    self.root = Some(Node::Branch(branch));
                    return Err(err);
                }
                // There is no parent to fold a one-child root into, so the
                // survivor is promoted to root here. For a leaf the absorbed
                // suffix is exactly its full 64-nibble path again.
                self.root = Some(if branch.size() == 1 {
                    branch.into_survivor()
                } else {
                    Node::Branch(branch)
                });
                self.len -= 1;
                Ok(())
            }
        }
    }

    /// Produce a membership proof for a present key. The proof commits to
    /// the current root digest and can be replayed by a verifier that knows
    /// only that digest.
    pub fn prove(&self, key: &[u8]) -> Result<Proof, TrieError> {
        trace!(key = %hex::encode(key), "prove");
        let path = key_to_path(key);
        self.root
            .as_ref()
            .ok_or(TrieError::KeyNotExist)?
            .generate_proof(&path)
    }
}

impl fmt::Display for Trie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "** #{} **", self.hash())?;
        if let Some(root) = &self.root {
            root.render(f, 0)?;
        }
        Ok(())
    }
}
