use serde::{Deserialize, Serialize};

use logchain_crypto::{MerkleProof, MerkleTree};
use logchain_types::Hash32;

use crate::config::Limits;
use crate::error::LogchainError;
use crate::records::LogEntryRecord;

/// Result of summarizing an entry window into a Merkle batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub root_hash: Hash32,
    pub leaf_count: u64,
}

/// Builds Merkle batches over contiguous windows of chained entries.
///
/// The window must be non-empty, index-ordered with no gaps, and belong to
/// a single server. Entry hashes are the leaves; the tree-construction rule
/// (left-to-right pairing, odd node carried forward) is shared bit-for-bit
/// with the verification side.
pub struct BatchBuilder;

impl BatchBuilder {
    /// Build the Merkle summary for a window of entries.
    pub fn build(entries: &[LogEntryRecord], limits: &Limits) -> Result<BatchSummary, LogchainError> {
        Self::validate_window(entries, limits)?;
        let tree = Self::tree(entries);
        Ok(BatchSummary {
            root_hash: tree.root(),
            leaf_count: entries.len() as u64,
        })
    }

    /// Build an inclusion proof for the entry with absolute index
    /// `target_index` within the window.
    pub fn prove(
        entries: &[LogEntryRecord],
        target_index: u64,
        limits: &Limits,
    ) -> Result<MerkleProof, LogchainError> {
        Self::validate_window(entries, limits)?;
        let first = entries[0].entry_index;
        let offset = target_index
            .checked_sub(first)
            .filter(|o| *o < entries.len() as u64)
            .ok_or(LogchainError::EntryNotFound {
                index: target_index,
            })?;

        let tree = Self::tree(entries);
        tree.proof(offset as usize)
            .ok_or(LogchainError::EntryNotFound {
                index: target_index,
            })
    }

    fn tree(entries: &[LogEntryRecord]) -> MerkleTree {
        MerkleTree::from_leaves(entries.iter().map(|e| e.entry_hash).collect())
    }

    fn validate_window(entries: &[LogEntryRecord], limits: &Limits) -> Result<(), LogchainError> {
        let count = entries.len() as u64;
        if count == 0 || count > limits.max_batch_entries {
            return Err(LogchainError::InvalidLogCount {
                count,
                max: limits.max_batch_entries,
            });
        }

        let server_id = &entries[0].server_id;
        let mut expected = entries[0].entry_index;
        for entry in entries {
            if entry.server_id != *server_id {
                return Err(LogchainError::EntryServerMismatch);
            }
            if entry.entry_index != expected {
                return Err(LogchainError::WindowNotContiguous {
                    expected,
                    found: entry.entry_index,
                });
            }
            expected += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logchain_crypto::combine;
    use logchain_types::ServerId;

    fn window(server: &str, start: u64, count: u64) -> Vec<LogEntryRecord> {
        let server_id = ServerId::parse(server).unwrap();
        let mut prev = Hash32::zero();
        let mut entries = Vec::new();
        for index in start..start + count {
            let entry = LogEntryRecord::chained(
                server_id.clone(),
                index,
                1_700_000_000 + index,
                prev,
                format!("payload-{index}").into_bytes(),
            );
            prev = entry.entry_hash;
            entries.push(entry);
        }
        entries
    }

    #[test]
    fn single_entry_batch_root_is_the_entry_hash() {
        let entries = window("srv", 0, 1);
        let summary = BatchBuilder::build(&entries, &Limits::default()).unwrap();
        assert_eq!(summary.root_hash, entries[0].entry_hash);
        assert_eq!(summary.leaf_count, 1);
    }

    #[test]
    fn root_combines_entry_hashes_in_order() {
        let entries = window("srv", 0, 2);
        let summary = BatchBuilder::build(&entries, &Limits::default()).unwrap();
        assert_eq!(
            summary.root_hash,
            combine(&entries[0].entry_hash, &entries[1].entry_hash)
        );
    }

    #[test]
    fn empty_window_fails_invalid_log_count() {
        let err = BatchBuilder::build(&[], &Limits::default()).unwrap_err();
        assert_eq!(err, LogchainError::InvalidLogCount { count: 0, max: 1000 });
    }

    #[test]
    fn oversized_window_fails_invalid_log_count() {
        let limits = Limits {
            max_batch_entries: 3,
            ..Limits::default()
        };
        let entries = window("srv", 0, 4);
        let err = BatchBuilder::build(&entries, &limits).unwrap_err();
        assert_eq!(err, LogchainError::InvalidLogCount { count: 4, max: 3 });
    }

    #[test]
    fn gap_in_window_is_rejected() {
        let mut entries = window("srv", 0, 4);
        entries.remove(1);
        let err = BatchBuilder::build(&entries, &Limits::default()).unwrap_err();
        assert_eq!(
            err,
            LogchainError::WindowNotContiguous {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn mixed_servers_are_rejected() {
        let mut entries = window("srv-a", 0, 2);
        entries.extend(window("srv-b", 2, 1));
        let err = BatchBuilder::build(&entries, &Limits::default()).unwrap_err();
        assert_eq!(err, LogchainError::EntryServerMismatch);
    }

    #[test]
    fn proof_round_trip_for_every_leaf() {
        let entries = window("srv", 10, 7);
        let summary = BatchBuilder::build(&entries, &Limits::default()).unwrap();
        for entry in &entries {
            let proof =
                BatchBuilder::prove(&entries, entry.entry_index, &Limits::default()).unwrap();
            assert_eq!(proof.leaf, entry.entry_hash);
            assert_eq!(proof.root, summary.root_hash);
            assert!(proof.verify());
        }
    }

    #[test]
    fn prove_rejects_index_outside_window() {
        let entries = window("srv", 10, 3);
        let err = BatchBuilder::prove(&entries, 13, &Limits::default()).unwrap_err();
        assert_eq!(err, LogchainError::EntryNotFound { index: 13 });
        let err = BatchBuilder::prove(&entries, 9, &Limits::default()).unwrap_err();
        assert_eq!(err, LogchainError::EntryNotFound { index: 9 });
    }
}
