use serde::{Deserialize, Serialize};

use logchain_types::Hash32;

/// Digest algorithm version tag.
///
/// Carried on anchored records so a future rotation of the primitive is
/// expressible without reinterpreting old roots. Substituting the primitive
/// invalidates every previously issued proof, which is why the tag exists
/// even though only one algorithm is defined today.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgo {
    /// BLAKE3, 32-byte output.
    #[default]
    Blake3V1,
}

/// Hash raw bytes to a fixed 32-byte digest.
pub fn digest(data: &[u8]) -> Hash32 {
    Hash32::new(*blake3::hash(data).as_bytes())
}

/// Combine two Merkle nodes: `digest(left ++ right)`.
///
/// Byte concatenation, left before right, no separator.
pub fn combine(left: &Hash32, right: &Hash32) -> Hash32 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Hash32::new(*hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(digest(b"payload"), digest(b"payload"));
        assert_ne!(digest(b"payload"), digest(b"payloae"));
    }

    #[test]
    fn combine_is_order_sensitive() {
        let a = digest(b"a");
        let b = digest(b"b");
        assert_ne!(combine(&a, &b), combine(&b, &a));
    }

    #[test]
    fn combine_matches_concatenated_digest() {
        let a = digest(b"left");
        let b = digest(b"right");
        let mut concat = Vec::with_capacity(64);
        concat.extend_from_slice(a.as_bytes());
        concat.extend_from_slice(b.as_bytes());
        assert_eq!(combine(&a, &b), digest(&concat));
    }

    #[test]
    fn hash_algo_defaults_to_blake3() {
        assert_eq!(HashAlgo::default(), HashAlgo::Blake3V1);
    }

    #[test]
    fn hash_algo_serde_roundtrip() {
        let json = serde_json::to_string(&HashAlgo::Blake3V1).unwrap();
        let parsed: HashAlgo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, HashAlgo::Blake3V1);
    }
}
