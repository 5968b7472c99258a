//! The radix-16, path-compressed trie and its node types.

use thiserror::Error;

pub mod branch;
pub mod leaf;
pub mod node;
#[allow(clippy::module_inception)]
pub mod trie;

pub use branch::Branch;
pub use leaf::Leaf;
pub use node::Node;
pub use trie::Trie;

/// Error type for trie lookups and removals.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrieError {
    /// The requested key is not present in the trie.
    #[error("key does not exist")]
    KeyNotExist,
}
