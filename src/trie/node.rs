//! The polymorphic trie node and the Merkle reduction over child slots.

use crate::constant::{MERKLE_DEPTH, TRIE_WIDTH};
use crate::hash::{hash_pair, Hash, NULL_HASH};
use crate::nibble::{nibbles_to_hex, Nibble};
use crate::proof::Proof;
use crate::trie::{Branch, Leaf, TrieError};
use std::fmt;

/// A node in the trie: a terminal leaf or a 16-way branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Terminal node carrying a value.
    Leaf(Leaf),
    /// Interior node fanning out over the next path nibble.
    Branch(Box<Branch>),
}

impl Node {
    /// The cached digest of this node.
    pub fn hash(&self) -> Hash {
        match self {
            Node::Leaf(leaf) => leaf.hash(),
            Node::Branch(branch) => branch.hash(),
        }
    }

    pub(crate) fn generate_proof(&self, path: &[Nibble]) -> Result<Proof, TrieError> {
        match self {
            Node::Leaf(leaf) => leaf.generate_proof(path),
            Node::Branch(branch) => branch.generate_proof(path),
        }
    }

    /// Write an indented rendering of the subtree, for debugging.
    pub(crate) fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Node::Leaf(leaf) => {
                writeln!(f, "{pad}- leaf [{}] #{}", nibbles_to_hex(leaf.suffix()), leaf.hash())
            }
            Node::Branch(branch) => {
                writeln!(
                    f,
                    "{pad}- branch [{}] ({} children) #{}",
                    nibbles_to_hex(branch.prefix()),
                    branch.size(),
                    branch.hash(),
                )?;
                for (_, child) in branch.occupied() {
                    child.render(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Reduce a range of child slots to a single digest by pairwise hashing.
///
/// Empty slots contribute the null hash. The slice length must be a power of
/// two; the full 16-slot reduction runs four rounds (16 -> 8 -> 4 -> 2 -> 1).
pub(crate) fn merkle_root(nodes: &[Option<Node>]) -> Hash {
    let mut hashes: Vec<Hash> = nodes
        .iter()
        .map(|slot| slot.as_ref().map_or(NULL_HASH, Node::hash))
        .collect();
    while hashes.len() > 1 {
        hashes = hashes
            .chunks_exact(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
    }
    hashes[0]
}

/// Collect the sibling subroots along the binary reduction path from the
/// `target` slot to the 16-slot root, outermost half first. A verifier can
/// replay [`merkle_root`] from these and the target's own subtree digest.
pub(crate) fn merkle_proof(nodes: &[Option<Node>; TRIE_WIDTH], target: usize) -> Vec<Hash> {
    let mut neighbors = Vec::with_capacity(MERKLE_DEPTH);
    let mut pivot = TRIE_WIDTH / 2;
    let mut span = TRIE_WIDTH / 2;
    while span >= 1 {
        if target < pivot {
            neighbors.push(merkle_root(&nodes[pivot..pivot + span]));
            pivot -= span / 2;
        } else {
            neighbors.push(merkle_root(&nodes[pivot - span..pivot]));
            pivot += span / 2;
        }
        span /= 2;
    }
    neighbors
}
