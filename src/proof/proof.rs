//! Proof assembly: one step per branch crossed on the way to a leaf.

use crate::constant::TRIE_WIDTH;
use crate::hash::{hash_value, Hash};
use crate::nibble::{key_to_path, Nibble};
use crate::proof::{wire, ProofError};
use crate::trie::node::{merkle_proof, merkle_root, Node};

/// A membership proof: the full 64-nibble path of the proven leaf, its
/// value, and one step per branch from the root down to the leaf's parent.
///
/// The wire format transports only the steps; a decoded proof carries an
/// empty path and value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proof {
    path: Vec<Nibble>,
    value: Vec<u8>,
    steps: Vec<ProofStep>,
}

/// One branch crossed by a proof, in its most compact witness shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofStep {
    /// Two or more occupied slots beside the target: a Merkle opening of
    /// the 16 child slots.
    Branch {
        /// Length of the crossed branch's compressed prefix.
        prefix_length: usize,
        /// The four sibling subroots along the reduction path.
        neighbors: Vec<Hash>,
    },
    /// Exactly one occupied neighbor slot, holding a branch.
    Fork {
        /// Length of the crossed branch's compressed prefix.
        prefix_length: usize,
        /// The neighbor branch itself.
        neighbor: ForkNeighbor,
    },
    /// Exactly one occupied neighbor slot, holding a leaf.
    Leaf {
        /// Length of the crossed branch's compressed prefix.
        prefix_length: usize,
        /// Full 64-nibble path of the neighbor leaf.
        key: Vec<Nibble>,
        /// Digest of the neighbor leaf's value.
        value: Hash,
    },
}

impl ProofStep {
    /// Length of the compressed prefix of the branch this step describes.
    pub fn prefix_length(&self) -> usize {
        match self {
            ProofStep::Branch { prefix_length, .. }
            | ProofStep::Fork { prefix_length, .. }
            | ProofStep::Leaf { prefix_length, .. } => *prefix_length,
        }
    }
}

/// The sole sibling branch recorded by a fork step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkNeighbor {
    /// Slot the neighbor occupies in the branch being crossed.
    pub nibble: Nibble,
    /// The neighbor branch's compressed prefix.
    pub prefix: Vec<Nibble>,
    /// Merkle root of the neighbor branch's 16 child slots (not its full
    /// branch hash; the verifier recombines it with the prefix itself).
    pub root: Hash,
}

impl Proof {
    pub(crate) fn new(path: Vec<Nibble>, value: Vec<u8>) -> Self {
        Proof {
            path,
            value,
            steps: Vec::new(),
        }
    }

    pub(crate) fn from_steps(steps: Vec<ProofStep>) -> Self {
        Proof {
            path: Vec::new(),
            value: Vec::new(),
            steps,
        }
    }

    /// Full 64-nibble path of the proven leaf.
    pub fn path(&self) -> &[Nibble] {
        &self.path
    }

    /// The value bound to the proven key.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Steps from the root branch down to the leaf's parent.
    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    /// Serialize to the on-chain CBOR layout.
    pub fn to_cbor(&self) -> Result<Vec<u8>, ProofError> {
        wire::encode_proof(self)
    }

    /// Parse a proof from its on-chain CBOR layout. Only the step list is
    /// transported, so the returned proof has an empty path and value.
    pub fn from_cbor(data: &[u8]) -> Result<Proof, ProofError> {
        wire::decode_proof(data)
    }

    /// Prepend the step describing the branch currently being unwound.
    ///
    /// With a single occupied neighbor slot the step collapses to the
    /// compact leaf or fork shape; otherwise it carries a Merkle opening of
    /// the child slots around the target.
    pub(crate) fn rewind(
        &mut self,
        target: usize,
        prefix_length: usize,
        children: &[Option<Node>; TRIE_WIDTH],
    ) {
        let neighbors: Vec<(usize, &Node)> = children
            .iter()
            .enumerate()
            .filter(|&(slot, _)| slot != target)
            .filter_map(|(slot, child)| child.as_ref().map(|node| (slot, node)))
            .collect();
        let step = if let [(slot, node)] = neighbors.as_slice() {
            match node {
                Node::Leaf(leaf) => ProofStep::Leaf {
                    prefix_length,
                    key: key_to_path(leaf.key()),
                    value: hash_value(leaf.value()),
                },
                Node::Branch(branch) => ProofStep::Fork {
                    prefix_length,
                    neighbor: ForkNeighbor {
                        nibble: *slot as Nibble,
                        prefix: branch.prefix().to_vec(),
                        root: merkle_root(branch.children()),
                    },
                },
            }
        } else {
            ProofStep::Branch {
                prefix_length,
                neighbors: merkle_proof(children, target),
            }
        };
        self.steps.insert(0, step);
    }
}
