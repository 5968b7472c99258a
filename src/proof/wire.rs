//! Byte-exact CBOR encoding of proofs.
//!
//! Steps are Plutus-style constructors: CBOR tag 121 plus an
//! indefinite-length field list for a branch step, 122 for a fork, 123 for a
//! leaf; the proof itself is an indefinite-length list of steps. The four
//! neighbor digests of a branch step travel as an indefinite bytestring
//! pre-split into two 64-byte chunks. Existing on-chain consumers expect
//! this layout byte for byte.

use crate::constant::HASH_SIZE;
use crate::hash::Hash;
use crate::nibble::{bytes_to_nibbles, nibbles_to_bytes, Nibble};
use crate::proof::{ForkNeighbor, Proof, ProofError, ProofStep};
use minicbor::data::{Tag, Type};
use minicbor::decode::Decoder;
use minicbor::encode::{self, Encoder, Write};
use minicbor::Encode;

/// Constructor tag of a branch step.
const TAG_BRANCH: u64 = 121;
/// Constructor tag of a fork step.
const TAG_FORK: u64 = 122;
/// Constructor tag of a leaf step.
const TAG_LEAF: u64 = 123;
/// Fork neighbors nest inside a first-constructor tag.
const TAG_CONSTR0: u64 = 121;
/// Chunk size of the branch-step neighbor bytestring: the four digests are
/// concatenated, zero-padded to 128 bytes and split as `[0..64][64..128]`.
const NEIGHBOR_CHUNK: usize = 2 * HASH_SIZE;

impl<C> Encode<C> for Proof {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        e.begin_array()?;
        for step in self.steps() {
            step.encode(e, ctx)?;
        }
        e.end()?;
        Ok(())
    }
}

impl<C> Encode<C> for ProofStep {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        match self {
            ProofStep::Branch {
                prefix_length,
                neighbors,
            } => {
                let mut bytes = [0u8; 2 * NEIGHBOR_CHUNK];
                for (i, digest) in neighbors.iter().take(4).enumerate() {
                    bytes[i * HASH_SIZE..(i + 1) * HASH_SIZE].copy_from_slice(digest.as_bytes());
                }
                e.tag(Tag::new(TAG_BRANCH))?;
                e.begin_array()?;
                e.u64(*prefix_length as u64)?;
                e.begin_bytes()?;
                e.bytes(&bytes[..NEIGHBOR_CHUNK])?;
                e.bytes(&bytes[NEIGHBOR_CHUNK..])?;
                e.end()?;
                e.end()?;
            }
            ProofStep::Fork {
                prefix_length,
                neighbor,
            } => {
                e.tag(Tag::new(TAG_FORK))?;
                e.begin_array()?;
                e.u64(*prefix_length as u64)?;
                e.tag(Tag::new(TAG_CONSTR0))?;
                e.begin_array()?;
                e.u64(u64::from(neighbor.nibble))?;
                e.bytes(&nibbles_to_bytes(&neighbor.prefix))?;
                e.bytes(neighbor.root.as_bytes())?;
                e.end()?;
                e.end()?;
            }
            ProofStep::Leaf {
                prefix_length,
                key,
                value,
            } => {
                e.tag(Tag::new(TAG_LEAF))?;
                e.begin_array()?;
                e.u64(*prefix_length as u64)?;
                e.bytes(&nibbles_to_bytes(key))?;
                e.bytes(value.as_bytes())?;
                e.end()?;
            }
        }
        Ok(())
    }
}

/// Serialize a proof to its wire bytes.
pub(crate) fn encode_proof(proof: &Proof) -> Result<Vec<u8>, ProofError> {
    minicbor::to_vec(proof).map_err(|err| ProofError::Encode(err.to_string()))
}

/// Parse a proof's step list from its wire bytes.
pub(crate) fn decode_proof(data: &[u8]) -> Result<Proof, ProofError> {
    let mut d = Decoder::new(data);
    let mut steps = Vec::new();
    match d.array()? {
        Some(n) => {
            for _ in 0..n {
                steps.push(decode_step(&mut d)?);
            }
        }
        None => {
            while d.datatype()? != Type::Break {
                steps.push(decode_step(&mut d)?);
            }
            consume_break(&mut d);
        }
    }
    Ok(Proof::from_steps(steps))
}

fn decode_step(d: &mut Decoder<'_>) -> Result<ProofStep, ProofError> {
    let tag = d.tag()?.as_u64();
    let header = d.array()?;
    let step = match tag {
        TAG_BRANCH => {
            let prefix_length = d.u64()? as usize;
            let mut bytes = Vec::with_capacity(2 * NEIGHBOR_CHUNK);
            for chunk in d.bytes_iter()? {
                bytes.extend_from_slice(chunk?);
            }
            if bytes.len() % HASH_SIZE != 0 {
                return Err(ProofError::BadDigestLength(bytes.len()));
            }
            let neighbors = bytes
                .chunks_exact(HASH_SIZE)
                .map(digest_from_chunk)
                .collect();
            close_list(d, header, 2)?;
            ProofStep::Branch {
                prefix_length,
                neighbors,
            }
        }
        TAG_FORK => {
            let prefix_length = d.u64()? as usize;
            let neighbor_tag = d.tag()?.as_u64();
            if neighbor_tag != TAG_CONSTR0 {
                return Err(ProofError::UnknownStepTag(neighbor_tag));
            }
            let inner = d.array()?;
            let nibble = d.u64()?;
            if nibble > 0xf {
                return Err(ProofError::NibbleOutOfRange(nibble));
            }
            let prefix = bytes_to_nibbles(d.bytes()?);
            let root = digest_field(d)?;
            close_list(d, inner, 3)?;
            close_list(d, header, 2)?;
            ProofStep::Fork {
                prefix_length,
                neighbor: ForkNeighbor {
                    nibble: nibble as Nibble,
                    prefix,
                    root,
                },
            }
        }
        TAG_LEAF => {
            let prefix_length = d.u64()? as usize;
            let key_bytes = d.bytes()?;
            if key_bytes.len() % 2 != 0 {
                return Err(ProofError::OddKeyLength(key_bytes.len()));
            }
            let key = bytes_to_nibbles(key_bytes);
            let value = digest_field(d)?;
            close_list(d, header, 3)?;
            ProofStep::Leaf {
                prefix_length,
                key,
                value,
            }
        }
        other => return Err(ProofError::UnknownStepTag(other)),
    };
    Ok(step)
}

/// Read a definite 32-byte digest field.
fn digest_field(d: &mut Decoder<'_>) -> Result<Hash, ProofError> {
    let bytes = d.bytes()?;
    let digest: [u8; HASH_SIZE] = bytes
        .try_into()
        .map_err(|_| ProofError::BadDigestLength(bytes.len()))?;
    Ok(Hash(digest))
}

fn digest_from_chunk(chunk: &[u8]) -> Hash {
    let mut digest = [0u8; HASH_SIZE];
    digest.copy_from_slice(chunk);
    Hash(digest)
}

/// Consume the end of a field list: a count check for definite lists, the
/// break marker for indefinite ones.
fn close_list(d: &mut Decoder<'_>, header: Option<u64>, read: u64) -> Result<(), ProofError> {
    match header {
        Some(n) if n == read => Ok(()),
        Some(_) => Err(ProofError::WrongFieldCount),
        None => {
            if d.datatype()? == Type::Break {
                consume_break(d);
                Ok(())
            } else {
                Err(ProofError::WrongFieldCount)
            }
        }
    }
}

/// Step over a break marker the caller has already seen via `datatype`.
fn consume_break(d: &mut Decoder<'_>) {
    d.set_position(d.position() + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_value;
    use crate::test_fixtures::{fruits, fruits_trie};

    // Recorded wire bytes for proofs over the fruits dataset, validated
    // against the on-chain verifier.
    const PROOF_VECTORS: &[(usize, &str)] = &[
        (
            0, // apple[uid: 58]
            "9fd8799f005f5840c7bfa4472f3a98ebe0421e8f3f03adf0f7c4340dec65b4b92b1c9f0bed209eb47238ba5d16031b6bace4aee22156f5028b0ca56dc24f7247d6435292e82c039c58403490a825d2e8deddf8679ce2f95f7e3a59d9c3e1af4a49b410266d21c9344d6d79519b8cdfbd053e5a86cf28a781debae71638cd77f85aad4b88869373d9dcfdffffd87b9f0058205cddcd30a0a388cf6feb3fd6e112c96e9daf23e3a9c8a334e7044650471aaa9e5820f429821ddf89c9df3c7fbb5aa6fadb6c246d75ceede53173ce59d70dde375d14ffd87b9f0058205e7ccfedd44c90423b191ecca1eb21dfbac865d561bace8c0f3e94ae7edf444058207c3715aba2db74d565a6ce6cc72f20d9cb4652ddb29efe6268be15b105e40911ffff",
        ),
        (
            1, // apricot[uid: 0]
            "9fd8799f005f58404be28f4839135e1f8f5372a90b54bb7bfaf997a5d13711bb4d7d93f9d4e04fbe280ada5ef30d55433934bbc73c89d550ee916f62822c34645e04bb66540c120f5840965c07fa815b86794e8703cee7e8f626c88d7da639258d2466aae67d5d041c5a117abf0e19fb78e0535891d82e5ece1310a1cf11674587dbba304c395769a988ffffff",
        ),
        (
            2, // banana[uid: 218]
            "9fd8799f005f5840c7bfa4472f3a98ebe0421e8f3f03adf0f7c4340dec65b4b92b1c9f0bed209eb45fdf82687b1ab133324cebaf46d99d49f92720c5ded08d5b02f57530f2cc5a5f5840cf22cbaac4ab605dd13dbde57080661b53d8a7e23534c733acf50125cf0e5bcac9431d708d20021f1fa3f4f03468b8de194398072a402e7877376d06f747575affffd87b9f0158203ed002d6885ab5d92e1307fccd1d021c32ec429192aea10cb2fd688b92aef3ac58207c3715aba2db74d565a6ce6cc72f20d9cb4652ddb29efe6268be15b105e40911ffff",
        ),
        (
            3, // blueberry[uid: 0]
            "9fd8799f005f58404be28f4839135e1f8f5372a90b54bb7bfaf997a5d13711bb4d7d93f9d4e04fbefa63eb4576001d8658219f928172eccb5448b4d7d62cd6d95228e13ebcbd53505840be527bcfc7febe3c560057d97f4190bd24b537a322315f84daafab3ada562b50c2f2115774c117f184b58dba7a23d2c93968aa40387ceb0c9a9f53e4f594e881ffffd87b9f005820b67e71b092e6a54576fa23b0eb48c5e5794a3fb5480983e48b40e453596cc48b58207c3715aba2db74d565a6ce6cc72f20d9cb4652ddb29efe6268be15b105e40911ffff",
        ),
        (
            4, // cherry[uid: 0]
            "9fd8799f005f5840c7bfa4472f3a98ebe0421e8f3f03adf0f7c4340dec65b4b92b1c9f0bed209eb45fdf82687b1ab133324cebaf46d99d49f92720c5ded08d5b02f57530f2cc5a5f58401508f13471a031a21277db8817615e62a50a7427d5f8be572746aa5f0d498417520a7f805c5f674e2deca5230b6942bbc71586dc94a783eebe1ed58c9a864e53ffffd8799f035f58402549707d84ecc2fa100fd85bf15f2ec99da70d4b3a39588c1138331eb0e00d3e85c09af929492a871e4fae32d9d5c36e352471cd659bcdb61de08f1722acc3b158400eb923b0cbd24df54401d998531feead35a47a99f4deed205de4af81120f97610000000000000000000000000000000000000000000000000000000000000000ffffff",
        ),
        (
            17, // papaya[uid: 0]
            "9fd8799f005f58404be28f4839135e1f8f5372a90b54bb7bfaf997a5d13711bb4d7d93f9d4e04fbe280ada5ef30d55433934bbc73c89d550ee916f62822c34645e04bb66540c120f5840965c07fa815b86794e8703cee7e8f626c88d7da639258d2466aae67d5d041c5ada1771d107c86c8e68da458063a47f9cdb63ddb9e922ab6ccb18d9e6d4b7aaf9ffffd87b9f005820fb69c0d60ec9bfb6cafa5cf54675edfbb0017b873ee92a5dbb6bdabcfb3521455820b5898c51c32083e91b8c18c735d0ba74e08f964a20b1639c189d1e8704b78a09ffff",
        ),
    ];

    #[test]
    fn test_proof_wire_fixtures() {
        let trie = fruits_trie();
        for (idx, expected_hex) in PROOF_VECTORS {
            let (key, _) = fruits()[*idx];
            let proof = trie.prove(key.as_bytes()).unwrap();
            let wire = proof.to_cbor().unwrap();
            assert_eq!(hex::encode(&wire), *expected_hex, "wire mismatch for {key}");
        }
    }

    #[test]
    fn test_proof_wire_round_trip() {
        let trie = fruits_trie();
        for (key, _) in fruits() {
            let proof = trie.prove(key.as_bytes()).unwrap();
            let wire = proof.to_cbor().unwrap();
            let decoded = Proof::from_cbor(&wire).unwrap();
            assert_eq!(decoded.steps(), proof.steps());
            assert_eq!(decoded.to_cbor().unwrap(), wire);
        }
    }

    #[test]
    fn test_empty_step_list() {
        let mut trie = crate::trie::Trie::new();
        trie.set(b"only", b"value");
        let proof = trie.prove(b"only").unwrap();
        // An indefinite-length list with no entries.
        assert_eq!(proof.to_cbor().unwrap(), vec![0x9f, 0xff]);
        assert!(Proof::from_cbor(&[0x9f, 0xff]).unwrap().steps().is_empty());
    }

    #[test]
    fn test_fork_step_round_trip() {
        let step = ProofStep::Fork {
            prefix_length: 6,
            neighbor: ForkNeighbor {
                nibble: 0x4,
                prefix: vec![0x0, 0x1, 0x0, 0x2, 0x0, 0x3],
                root: hash_value(b"neighbor"),
            },
        };
        let proof = Proof::from_steps(vec![step]);
        let wire = proof.to_cbor().unwrap();
        let decoded = Proof::from_cbor(&wire).unwrap();
        assert_eq!(decoded.steps(), proof.steps());
    }

    #[test]
    fn test_fork_step_odd_prefix_pads_head_nibble() {
        // Odd nibble buffers gain a leading zero nibble on the wire, so the
        // decoded prefix is the even-length padded form.
        let step = ProofStep::Fork {
            prefix_length: 3,
            neighbor: ForkNeighbor {
                nibble: 0x2,
                prefix: vec![0xa, 0xb, 0xc],
                root: hash_value(b"neighbor"),
            },
        };
        let wire = Proof::from_steps(vec![step]).to_cbor().unwrap();
        let decoded = Proof::from_cbor(&wire).unwrap();
        match &decoded.steps()[0] {
            ProofStep::Fork { neighbor, .. } => {
                assert_eq!(neighbor.prefix, vec![0x0, 0xa, 0xb, 0xc]);
            }
            other => panic!("expected a fork step, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        // Tag 124 in step position.
        let data = hex::decode("9fd87c9f00ffff").unwrap();
        assert!(matches!(
            Proof::from_cbor(&data),
            Err(ProofError::UnknownStepTag(124)),
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        let trie = fruits_trie();
        let wire = trie.prove(fruits()[0].0.as_bytes()).unwrap().to_cbor().unwrap();
        assert!(Proof::from_cbor(&wire[..wire.len() - 2]).is_err());
    }

    #[test]
    fn test_decode_rejects_short_digest() {
        // Leaf step whose value digest is 2 bytes instead of 32.
        let data = hex::decode("9fd87b9f0042abcd42abcdffff").unwrap();
        assert!(matches!(
            Proof::from_cbor(&data),
            Err(ProofError::BadDigestLength(2)),
        ));
    }

    #[test]
    fn test_decode_rejects_odd_key() {
        // Leaf step with a 1-byte packed key.
        let data = hex::decode("9fd87b9f0041ab5820").unwrap();
        assert!(matches!(
            Proof::from_cbor(&data),
            Err(ProofError::OddKeyLength(1)),
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_range_nibble() {
        // Fork step whose neighbor slot is 16.
        let data = hex::decode("9fd87a9f00d8799f104058").unwrap();
        assert!(matches!(
            Proof::from_cbor(&data),
            Err(ProofError::NibbleOutOfRange(16)),
        ));
    }
}
