//! Nibble utilities. Paths through the trie are sequences of 4-bit values.

use crate::constant::PATH_NIBBLES;
use crate::hash::hash_value;

/// A 4-bit value in `0..16`. Two nibbles per byte, high half first.
pub type Nibble = u8;

/// Split bytes into nibbles: `0xAB -> [0xA, 0xB]`.
pub fn bytes_to_nibbles(data: &[u8]) -> Vec<Nibble> {
    let mut ret = Vec::with_capacity(data.len() * 2);
    for byte in data {
        ret.push(byte >> 4);
        ret.push(byte & 0xf);
    }
    ret
}

/// Pack nibbles back into bytes, high half first.
///
/// An odd-length sequence is padded with a single leading zero nibble, so
/// the first byte carries only the head nibble in its low half.
pub fn nibbles_to_bytes(nibbles: &[Nibble]) -> Vec<u8> {
    let mut ret = Vec::with_capacity(nibbles.len().div_ceil(2));
    let rest = if nibbles.len() % 2 == 1 {
        ret.push(nibbles[0]);
        &nibbles[1..]
    } else {
        nibbles
    };
    for pair in rest.chunks_exact(2) {
        ret.push((pair[0] << 4) | pair[1]);
    }
    ret
}

/// Expand a user key into its trie path: the Blake2b-256 digest of the key
/// split into 64 nibbles. All navigation is by path, never by raw key, so
/// the trie stays balanced under adversarial keys.
pub fn key_to_path(key: &[u8]) -> Vec<Nibble> {
    let path = bytes_to_nibbles(hash_value(key).as_bytes());
    debug_assert_eq!(path.len(), PATH_NIBBLES);
    path
}

/// The longest shared prefix of two nibble sequences. May be empty.
pub fn common_prefix<'a>(a: &'a [Nibble], b: &[Nibble]) -> &'a [Nibble] {
    let len = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    &a[..len]
}

/// Render nibbles as a lowercase hex string, one digit per nibble.
pub(crate) fn nibbles_to_hex(nibbles: &[Nibble]) -> String {
    nibbles
        .iter()
        .map(|n| char::from_digit(u32::from(*n), 16).unwrap_or('?'))
        .collect()
}
