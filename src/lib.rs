#![doc = include_str!("../README.md")]

pub mod constant;
pub mod hash;
pub mod nibble;
pub mod proof;
pub mod trie;

pub use hash::{hash_value, Hash, NULL_HASH};
pub use proof::{ForkNeighbor, Proof, ProofError, ProofStep};
pub use trie::{Trie, TrieError};

#[cfg(test)]
pub(crate) mod test_fixtures;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// A simple end-to-end walk through the public surface.
    fn basic_integration_test() -> Result<(), Box<dyn std::error::Error>> {
        let mut trie = Trie::new();
        assert!(trie.is_empty());
        assert_eq!(trie.hash(), NULL_HASH);

        // Bind a few keys and read them back.
        trie.set(b"account1", b"balance100");
        trie.set(b"storage_key", b"storage_value");
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.get(b"account1")?, b"balance100");
        assert!(trie.has(b"storage_key"));

        // The root digest commits to every binding.
        let root = trie.hash();
        trie.set(b"account1", b"balance200");
        assert_ne!(trie.hash(), root);
        trie.set(b"account1", b"balance100");
        assert_eq!(trie.hash(), root);

        // Prove a binding and ship it over the wire.
        let proof = trie.prove(b"account1")?;
        assert_eq!(proof.value(), b"balance100");
        let wire = proof.to_cbor()?;
        let decoded = Proof::from_cbor(&wire)?;
        assert_eq!(decoded.steps(), proof.steps());

        // Removing everything returns the trie to its empty state.
        trie.delete(b"account1")?;
        trie.delete(b"storage_key")?;
        assert!(trie.is_empty());
        assert_eq!(trie.hash(), NULL_HASH);

        Ok(())
    }
}
