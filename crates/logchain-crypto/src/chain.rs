use thiserror::Error;

use logchain_types::Hash32;

use crate::hasher::digest;

/// Compute an entry's chain hash.
///
/// Layout: `previous_hash ++ data_hash ++ be64(entry_index) ++
/// be64(timestamp)`, digested as one byte string. Big-endian integer
/// encoding keeps the hash reproducible across implementations.
pub fn entry_hash(
    previous_hash: &Hash32,
    data_hash: &Hash32,
    entry_index: u64,
    timestamp: u64,
) -> Hash32 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(previous_hash.as_bytes());
    hasher.update(data_hash.as_bytes());
    hasher.update(&entry_index.to_be_bytes());
    hasher.update(&timestamp.to_be_bytes());
    Hash32::new(*hasher.finalize().as_bytes())
}

/// Trait for records that participate in an entry hash chain.
pub trait ChainedEntry {
    /// Zero-based position within the server's chain.
    fn entry_index(&self) -> u64;
    /// Creation time in unix seconds.
    fn timestamp(&self) -> u64;
    /// Digest of the entry payload.
    fn data_hash(&self) -> Hash32;
    /// Chain hash of the preceding entry (zero for index 0).
    fn previous_hash(&self) -> Hash32;
    /// This entry's own chain hash.
    fn entry_hash(&self) -> Hash32;
    /// Raw payload bytes.
    fn payload(&self) -> &[u8];
}

/// Chain-run integrity verifier.
///
/// Walks a contiguous, index-ordered run of entries and confirms each link:
/// `previous_hash` must equal the predecessor's `entry_hash`, indexes must
/// increase by exactly 1, and every stored `entry_hash` must match the value
/// recomputed from the entry's own fields. A failure names the exact entry
/// index at which tampering or deletion occurred.
pub struct ChainVerifier;

impl ChainVerifier {
    /// Verify a run of entries.
    ///
    /// `expected_prev` is the chain hash the run's first entry must link to.
    /// Pass `None` when the run starts mid-chain and the predecessor is
    /// unknown; a run starting at index 0 always requires a zero
    /// `previous_hash`.
    pub fn verify_run<E: ChainedEntry>(
        entries: &[E],
        expected_prev: Option<Hash32>,
    ) -> Result<(), ChainError> {
        let Some(first) = entries.first() else {
            return Ok(());
        };

        if first.entry_index() == 0 && !first.previous_hash().is_zero() {
            return Err(ChainError::GenesisHasPreviousHash);
        }
        if let Some(prev) = expected_prev {
            if first.previous_hash() != prev {
                return Err(ChainError::BrokenLink {
                    index: first.entry_index(),
                });
            }
        }

        let mut expected_index = first.entry_index();
        let mut expected_link = first.previous_hash();

        for entry in entries {
            if entry.entry_index() != expected_index {
                return Err(ChainError::NonContiguous {
                    expected: expected_index,
                    found: entry.entry_index(),
                });
            }
            if entry.previous_hash() != expected_link {
                return Err(ChainError::BrokenLink {
                    index: entry.entry_index(),
                });
            }

            let computed = entry_hash(
                &entry.previous_hash(),
                &entry.data_hash(),
                entry.entry_index(),
                entry.timestamp(),
            );
            if computed != entry.entry_hash() {
                return Err(ChainError::HashMismatch {
                    index: entry.entry_index(),
                });
            }

            expected_index += 1;
            expected_link = entry.entry_hash();
        }

        Ok(())
    }

    /// Verify that an entry's stored `data_hash` matches its payload.
    ///
    /// This is the deep half of verification: [`verify_run`] trusts stored
    /// `data_hash` values, this recomputes one from the payload bytes.
    ///
    /// [`verify_run`]: ChainVerifier::verify_run
    pub fn verify_payload<E: ChainedEntry>(entry: &E) -> bool {
        digest(entry.payload()) == entry.data_hash()
    }
}

/// Errors from chain-run verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("entry 0 has a nonzero previous hash")]
    GenesisHasPreviousHash,

    #[error("broken link at entry {index}: previous hash does not match")]
    BrokenLink { index: u64 },

    #[error("non-contiguous run: expected entry {expected}, found {found}")]
    NonContiguous { expected: u64, found: u64 },

    #[error("hash mismatch at entry {index}: stored hash differs from recomputed")]
    HashMismatch { index: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEntry {
        index: u64,
        timestamp: u64,
        data_hash: Hash32,
        previous_hash: Hash32,
        hash: Hash32,
        payload: Vec<u8>,
    }

    impl ChainedEntry for TestEntry {
        fn entry_index(&self) -> u64 {
            self.index
        }
        fn timestamp(&self) -> u64 {
            self.timestamp
        }
        fn data_hash(&self) -> Hash32 {
            self.data_hash
        }
        fn previous_hash(&self) -> Hash32 {
            self.previous_hash
        }
        fn entry_hash(&self) -> Hash32 {
            self.hash
        }
        fn payload(&self) -> &[u8] {
            &self.payload
        }
    }

    fn build_chain(count: u64) -> Vec<TestEntry> {
        let mut chain = Vec::new();
        let mut prev = Hash32::zero();

        for index in 0..count {
            let payload = format!("entry-{index}").into_bytes();
            let data_hash = digest(&payload);
            let timestamp = 1_700_000_000 + index;
            let hash = entry_hash(&prev, &data_hash, index, timestamp);
            chain.push(TestEntry {
                index,
                timestamp,
                data_hash,
                previous_hash: prev,
                hash,
                payload,
            });
            prev = hash;
        }

        chain
    }

    #[test]
    fn entry_hash_is_deterministic() {
        let prev = digest(b"prev");
        let data = digest(b"data");
        assert_eq!(entry_hash(&prev, &data, 3, 99), entry_hash(&prev, &data, 3, 99));
    }

    #[test]
    fn entry_hash_commits_to_every_field() {
        let prev = digest(b"prev");
        let data = digest(b"data");
        let base = entry_hash(&prev, &data, 3, 99);
        assert_ne!(base, entry_hash(&digest(b"x"), &data, 3, 99));
        assert_ne!(base, entry_hash(&prev, &digest(b"x"), 3, 99));
        assert_ne!(base, entry_hash(&prev, &data, 4, 99));
        assert_ne!(base, entry_hash(&prev, &data, 3, 100));
    }

    #[test]
    fn empty_run_is_valid() {
        let chain: Vec<TestEntry> = vec![];
        assert!(ChainVerifier::verify_run(&chain, None).is_ok());
    }

    #[test]
    fn valid_chain_verifies() {
        let chain = build_chain(10);
        assert!(ChainVerifier::verify_run(&chain, None).is_ok());
    }

    #[test]
    fn genesis_with_previous_hash_fails() {
        let mut chain = build_chain(1);
        chain[0].previous_hash = Hash32::new([1; 32]);
        assert_eq!(
            ChainVerifier::verify_run(&chain, None).unwrap_err(),
            ChainError::GenesisHasPreviousHash
        );
    }

    #[test]
    fn broken_link_names_the_exact_index() {
        let mut chain = build_chain(5);
        chain[3].previous_hash = Hash32::new([9; 32]);
        // Re-derive the hash so only the link is wrong, not the stored hash.
        chain[3].hash = entry_hash(
            &chain[3].previous_hash,
            &chain[3].data_hash,
            3,
            chain[3].timestamp,
        );
        assert_eq!(
            ChainVerifier::verify_run(&chain, None).unwrap_err(),
            ChainError::BrokenLink { index: 3 }
        );
    }

    #[test]
    fn gap_in_indexes_detected() {
        let mut chain = build_chain(4);
        chain.remove(2);
        assert_eq!(
            ChainVerifier::verify_run(&chain, None).unwrap_err(),
            ChainError::NonContiguous {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn tampered_data_hash_detected() {
        let mut chain = build_chain(3);
        chain[1].data_hash = digest(b"forged");
        assert_eq!(
            ChainVerifier::verify_run(&chain, None).unwrap_err(),
            ChainError::HashMismatch { index: 1 }
        );
    }

    #[test]
    fn mid_chain_run_with_expected_prev() {
        let chain = build_chain(6);
        let prev = chain[2].hash;
        let run = &chain[3..];
        assert!(ChainVerifier::verify_run(run, Some(prev)).is_ok());
        assert_eq!(
            ChainVerifier::verify_run(run, Some(Hash32::new([7; 32]))).unwrap_err(),
            ChainError::BrokenLink { index: 3 }
        );
    }

    #[test]
    fn payload_verification() {
        let chain = build_chain(2);
        assert!(ChainVerifier::verify_payload(&chain[0]));

        let mut tampered = build_chain(2);
        tampered[1].payload = b"swapped".to_vec();
        assert!(!ChainVerifier::verify_payload(&tampered[1]));
    }
}
