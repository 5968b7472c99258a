//! Branch nodes: 16-way interior nodes with compressed prefixes.

use crate::constant::{HASH_SIZE, TRIE_WIDTH};
use crate::hash::{hash_value, Hash};
use crate::nibble::{common_prefix, Nibble};
use crate::proof::Proof;
use crate::trie::node::{self, Node};
use crate::trie::{Leaf, TrieError};

/// An interior node fanning out over the next path nibble.
///
/// `prefix` holds the nibbles every path through this branch must match
/// before a child slot is selected. A branch always has at least two
/// occupied slots; a branch that drops to one child is collapsed into that
/// child by whoever holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    hash: Hash,
    prefix: Vec<Nibble>,
    children: [Option<Node>; TRIE_WIDTH],
    size: usize,
}

impl Branch {
    /// Create an empty branch with the given compressed prefix.
    pub(crate) fn new(prefix: &[Nibble]) -> Self {
        Branch {
            hash: Hash::default(),
            prefix: prefix.to_vec(),
            children: std::array::from_fn(|_| None),
            size: 0,
        }
    }

    /// The cached node digest.
    #[inline]
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Nibbles the path must match inside this branch before a slot is
    /// selected.
    pub(crate) fn prefix(&self) -> &[Nibble] {
        &self.prefix
    }

    /// All 16 child slots, occupied or not.
    pub(crate) fn children(&self) -> &[Option<Node>; TRIE_WIDTH] {
        &self.children
    }

    /// Number of occupied child slots.
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// Iterate the occupied child slots.
    pub(crate) fn occupied(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(slot, child)| child.as_ref().map(|node| (slot, node)))
    }

    /// Look up `path` (relative to this branch's position) in the subtree.
    pub(crate) fn get(&self, path: &[Nibble]) -> Result<&[u8], TrieError> {
        let rest = path
            .strip_prefix(self.prefix.as_slice())
            .ok_or(TrieError::KeyNotExist)?;
        let slot = rest[0] as usize;
        let rest = &rest[1..];
        match self.children[slot].as_ref().ok_or(TrieError::KeyNotExist)? {
            Node::Leaf(leaf) if rest == leaf.suffix() => Ok(leaf.value()),
            Node::Leaf(_) => Err(TrieError::KeyNotExist),
            Node::Branch(child) => child.get(rest),
        }
    }

    /// Insert `(path, key, value)` below this branch. `path` is relative to
    /// this branch's position and must start with its prefix. Returns whether
    /// a new key was added (`false` on a value replacement).
    pub(crate) fn insert(&mut self, path: &[Nibble], key: &[u8], value: &[u8]) -> bool {
        let rest = match path.strip_prefix(self.prefix.as_slice()) {
            Some(rest) => rest,
            None => unreachable!("insert path diverges from branch prefix"),
        };
        let slot = rest[0] as usize;
        let rest = &rest[1..];
        let added = match self.children[slot].take() {
            None => {
                self.children[slot] = Some(Node::Leaf(Leaf::new(rest, key, value)));
                self.size += 1;
                true
            }
            Some(Node::Leaf(mut leaf)) => {
                if rest == leaf.suffix() {
                    leaf.set_value(value);
                    self.children[slot] = Some(Node::Leaf(leaf));
                    false
                } else {
                    // Two keys now share this slot: fork them below a
                    // sub-branch on their common prefix.
                    let shared = common_prefix(rest, leaf.suffix()).to_vec();
                    let mut fork = Branch::new(&shared);
                    fork.insert(leaf.suffix(), leaf.key(), leaf.value());
                    fork.insert(rest, key, value);
                    self.children[slot] = Some(Node::Branch(Box::new(fork)));
                    true
                }
            }
            Some(Node::Branch(mut child)) => {
                let shared = common_prefix(rest, &child.prefix).len();
                if shared == child.prefix.len() {
                    let added = child.insert(rest, key, value);
                    self.children[slot] = Some(Node::Branch(child));
                    added
                } else {
                    // The path diverges inside the child's prefix: split the
                    // prefix at the divergence point and insert beside it.
                    let mut fork = child.split_prefix(shared);
                    fork.insert(rest, key, value);
                    self.children[slot] = Some(Node::Branch(Box::new(fork)));
                    true
                }
            }
        };
        self.update_hash();
        added
    }

    /// Remove `path` from the subtree.
    ///
    /// `size` tracks occupied slots, so it only changes when this branch's
    /// own slot empties. A recursive removal leaves the slot occupied by
    /// either the child branch or the survivor merged into its place.
    pub(crate) fn delete(&mut self, path: &[Nibble]) -> Result<(), TrieError> {
        let rest = path
            .strip_prefix(self.prefix.as_slice())
            .ok_or(TrieError::KeyNotExist)?;
        let slot = rest[0] as usize;
        let rest = &rest[1..];
        match self.children[slot].take() {
            None => return Err(TrieError::KeyNotExist),
            Some(Node::Leaf(leaf)) => {
                if rest != leaf.suffix() {
                    self.children[slot] = Some(Node::Leaf(leaf));
                    return Err(TrieError::KeyNotExist);
                }
                self.size -= 1;
            }
            Some(Node::Branch(mut child)) => {
                if let Err(err) = child.delete(rest) {
                    self.children[slot] = Some(Node::Branch(child));
                    return Err(err);
                }
                self.children[slot] = Some(if child.size == 1 {
                    child.into_survivor()
                } else {
                    Node::Branch(child)
                });
            }
        }
        self.update_hash();
        Ok(())
    }

    /// Build the proof for `path`, then prepend this branch's step on the
    /// way back up the recursion.
    pub(crate) fn generate_proof(&self, path: &[Nibble]) -> Result<Proof, TrieError> {
        let rest = path
            .strip_prefix(self.prefix.as_slice())
            .ok_or(TrieError::KeyNotExist)?;
        let slot = rest[0] as usize;
        let rest = &rest[1..];
        let child = self.children[slot]
            .as_ref()
            .ok_or(TrieError::KeyNotExist)?;
        let mut proof = child.generate_proof(rest)?;
        proof.rewind(slot, self.prefix.len(), &self.children);
        Ok(proof)
    }

    /// Split this branch's prefix at `at`: the shared part becomes a new
    /// enclosing branch, the nibble at `at` becomes this branch's slot under
    /// it, and this branch keeps the remainder.
    pub(crate) fn split_prefix(mut self: Box<Self>, at: usize) -> Branch {
        let shared = self.prefix[..at].to_vec();
        let slot = self.prefix[at] as usize;
        self.prefix.drain(..=at);
        self.update_hash();
        let mut outer = Branch::new(&shared);
        outer.children[slot] = Some(Node::Branch(self));
        outer.size = 1;
        outer
    }

    /// Fold this single-child branch into its survivor: the branch prefix
    /// and the survivor's slot nibble are absorbed into the survivor's own
    /// prefix (branch) or suffix (leaf), and the survivor is re-hashed.
    pub(crate) fn into_survivor(mut self) -> Node {
        let slot = match self.children.iter().position(Option::is_some) {
            Some(slot) => slot,
            None => unreachable!("branch emptied without collapsing"),
        };
        match self.children[slot].take() {
            Some(Node::Leaf(mut leaf)) => {
                leaf.absorb_prefix(&self.prefix, slot as Nibble);
                Node::Leaf(leaf)
            }
            Some(Node::Branch(mut branch)) => {
                branch.absorb_prefix(&self.prefix, slot as Nibble);
                Node::Branch(branch)
            }
            None => unreachable!("occupied slot emptied concurrently"),
        }
    }

    /// Prepend `prefix ++ [slot]` when an enclosing branch collapses around
    /// this one.
    fn absorb_prefix(&mut self, prefix: &[Nibble], slot: Nibble) {
        let mut merged = Vec::with_capacity(prefix.len() + 1 + self.prefix.len());
        merged.extend_from_slice(prefix);
        merged.push(slot);
        merged.append(&mut self.prefix);
        self.prefix = merged;
        self.update_hash();
    }

    /// Recompute the cached digest: `H(prefix ++ merkle_root(children))`,
    /// one byte per prefix nibble.
    pub(crate) fn update_hash(&mut self) {
        let children_root = node::merkle_root(&self.children);
        let mut data = Vec::with_capacity(self.prefix.len() + HASH_SIZE);
        data.extend_from_slice(&self.prefix);
        data.extend_from_slice(children_root.as_bytes());
        self.hash = hash_value(&data);
    }
}
