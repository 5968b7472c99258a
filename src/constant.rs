//! Constants that determine the shape of the forestry.

/// Width in bytes of every digest in the trie.
pub const HASH_SIZE: usize = 32;

/// Branch factor of the trie. One child slot per nibble value.
pub const TRIE_WIDTH: usize = 16;

/// Number of nibbles in a full key path: a Blake2b-256 digest split into
/// half-bytes.
pub const PATH_NIBBLES: usize = 2 * HASH_SIZE;

/// Number of pairwise reduction rounds folding the 16 child slots into a
/// single digest (16 -> 8 -> 4 -> 2 -> 1). Also the number of sibling
/// subroots carried by a branch proof step.
pub const MERKLE_DEPTH: usize = 4;
