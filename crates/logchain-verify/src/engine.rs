use logchain_crypto::{chain, digest, merkle, ChainError, ChainVerifier, MerkleProof};
use logchain_ledger::{AuditTrailRecord, LogEntryRecord};
use logchain_types::{Hash32, ServerId};

use crate::report::{
    ChainBreak, ChainBreakKind, ChainReport, Finding, FindingKind, VerificationDepth,
    VerificationReport,
};

/// Recomputes and checks inclusion proofs and chain runs.
///
/// Read-only: verification never mutates any record. All checks of one call
/// are run to completion so a report names every failure, not just the
/// first.
pub struct VerificationEngine;

impl VerificationEngine {
    /// Verify that `entry` is a member of the batch anchored in `trail`.
    ///
    /// Walks `proof` from the leaf — the stored `entry_hash` for
    /// [`VerificationDepth::Shallow`], the hash recomputed from the payload
    /// for [`VerificationDepth::Deep`] — and compares the result against
    /// the anchored root, then confirms the entry index falls inside the
    /// anchored window. A mismatch is a finding, never an error.
    pub fn verify_entry(
        entry: &LogEntryRecord,
        proof: &MerkleProof,
        trail: &AuditTrailRecord,
        depth: VerificationDepth,
    ) -> VerificationReport {
        let mut findings = Vec::new();

        if entry.server_id != trail.server_id {
            findings.push(Finding {
                kind: FindingKind::ServerMismatch,
                description: format!(
                    "entry belongs to {}, trail belongs to {}",
                    entry.server_id, trail.server_id
                ),
            });
        }

        if trail.is_sentinel() {
            findings.push(Finding {
                kind: FindingKind::TrailUnanchored,
                description: "no batch has been anchored for this server".into(),
            });
            return VerificationReport {
                server_id: entry.server_id.clone(),
                entry_index: entry.entry_index,
                depth,
                computed_root: None,
                findings,
            };
        }

        let leaf = match depth {
            VerificationDepth::Shallow => entry.entry_hash,
            VerificationDepth::Deep => {
                let data_hash = digest(&entry.payload);
                if data_hash != entry.data_hash {
                    findings.push(Finding {
                        kind: FindingKind::PayloadMismatch,
                        description: format!(
                            "payload digests to {}, stored data hash is {}",
                            data_hash.short_hex(),
                            entry.data_hash.short_hex()
                        ),
                    });
                }
                let recomputed = chain::entry_hash(
                    &entry.previous_hash,
                    &data_hash,
                    entry.entry_index,
                    entry.timestamp,
                );
                if recomputed != entry.entry_hash {
                    findings.push(Finding {
                        kind: FindingKind::EntryHashMismatch,
                        description: format!(
                            "entry {} recomputes to {}, stored hash is {}",
                            entry.entry_index,
                            recomputed.short_hex(),
                            entry.entry_hash.short_hex()
                        ),
                    });
                }
                recomputed
            }
        };

        let computed_root = merkle::fold_path(leaf, &proof.path);
        if computed_root != trail.root_hash {
            findings.push(Finding {
                kind: FindingKind::RootMismatch,
                description: format!(
                    "entry {} tampered: proof yields root {}, anchored root is {}",
                    entry.entry_index,
                    computed_root.short_hex(),
                    trail.root_hash.short_hex()
                ),
            });
        }

        let window = trail.anchored_window();
        if !window.contains(&entry.entry_index) {
            findings.push(Finding {
                kind: FindingKind::IndexOutsideWindow,
                description: format!(
                    "entry {} lies outside the anchored window {}..{}",
                    entry.entry_index, window.start, window.end
                ),
            });
        }

        VerificationReport {
            server_id: entry.server_id.clone(),
            entry_index: entry.entry_index,
            depth,
            computed_root: Some(computed_root),
            findings,
        }
    }

    /// Re-walk a contiguous run of entries and report the exact index of
    /// the first chain break, if any.
    ///
    /// Independent of Merkle proofs: this detects tampering and deletion by
    /// the `previous_hash` linkage alone. `expected_prev` is the chain hash
    /// the first entry must link to, when known.
    pub fn verify_chain_run(
        server_id: &ServerId,
        entries: &[LogEntryRecord],
        expected_prev: Option<Hash32>,
    ) -> ChainReport {
        let break_at = ChainVerifier::verify_run(entries, expected_prev)
            .err()
            .map(|err| match err {
                ChainError::GenesisHasPreviousHash => ChainBreak {
                    index: 0,
                    kind: ChainBreakKind::GenesisLink,
                    description: err.to_string(),
                },
                ChainError::BrokenLink { index } => ChainBreak {
                    index,
                    kind: ChainBreakKind::BrokenLink,
                    description: err.to_string(),
                },
                ChainError::NonContiguous { found, .. } => ChainBreak {
                    index: found,
                    kind: ChainBreakKind::MissingEntry,
                    description: err.to_string(),
                },
                ChainError::HashMismatch { index } => ChainBreak {
                    index,
                    kind: ChainBreakKind::HashMismatch,
                    description: err.to_string(),
                },
            });

        ChainReport {
            server_id: server_id.clone(),
            entries_checked: entries.len() as u64,
            break_at,
        }
    }
}
