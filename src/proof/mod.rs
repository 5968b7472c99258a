//! Membership proofs and their on-chain wire encoding.

use thiserror::Error;

#[allow(clippy::module_inception)]
pub mod proof;
pub mod wire;

pub use proof::{ForkNeighbor, Proof, ProofStep};

/// Error type for proof wire encoding and decoding.
#[derive(Debug, Error)]
pub enum ProofError {
    /// Serialization failed. Does not happen for proofs produced by the trie.
    #[error("proof encoding failed: {0}")]
    Encode(String),
    /// CBOR-level failure while reading a proof.
    #[error("malformed proof encoding: {0}")]
    Cbor(#[from] minicbor::decode::Error),
    /// A step carried a constructor tag other than 121, 122 or 123.
    #[error("unknown proof step tag {0}")]
    UnknownStepTag(u64),
    /// A step or neighbor listed the wrong number of fields.
    #[error("unexpected field count in proof step")]
    WrongFieldCount,
    /// A fork neighbor slot index does not fit in a nibble.
    #[error("neighbor nibble out of range: {0}")]
    NibbleOutOfRange(u64),
    /// A digest field was not exactly 32 bytes.
    #[error("neighbor digest has invalid length {0}")]
    BadDigestLength(usize),
    /// A packed leaf key had an odd byte count.
    #[error("packed key has odd length {0}")]
    OddKeyLength(usize),
}
