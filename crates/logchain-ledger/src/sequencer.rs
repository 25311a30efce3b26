use std::ops::Range;

use crate::batch::BatchSummary;
use crate::config::Limits;
use crate::error::LogchainError;
use crate::records::{AuditTrailRecord, ServerRecord};

/// Updated record pair produced by committing an anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorOutcome {
    pub server: ServerRecord,
    pub trail: AuditTrailRecord,
}

/// Per-server anchor sequencing state machine.
///
/// States: `Uninitialized` (sentinel trail) → `Anchored`. There is no
/// persisted intermediate state; anchoring is a single atomic commit, and
/// concurrency safety comes from sequence validation. A retried anchor that
/// already committed observes the advanced `next_batch_id` and fails with
/// `InvalidBatchSequence` — callers treat that failure as "likely already
/// succeeded" and re-fetch state.
pub struct AnchorSequencer;

impl AnchorSequencer {
    /// Validate an anchor request against current record state.
    ///
    /// Pure: on failure all records are untouched and the caller sees the
    /// pre-operation state.
    pub fn validate(
        server: &ServerRecord,
        trail: &AuditTrailRecord,
        claimed_log_count: u64,
        expected_batch_id: Option<u64>,
        limits: &Limits,
    ) -> Result<(), LogchainError> {
        if !server.is_active {
            return Err(LogchainError::ServerInactive);
        }
        if claimed_log_count == 0 || claimed_log_count > limits.max_batch_entries {
            return Err(LogchainError::InvalidLogCount {
                count: claimed_log_count,
                max: limits.max_batch_entries,
            });
        }
        if let Some(expected) = expected_batch_id {
            if expected != trail.next_batch_id {
                return Err(LogchainError::InvalidBatchSequence {
                    expected: trail.next_batch_id,
                    supplied: expected,
                });
            }
        }

        let available = server.entry_count.saturating_sub(trail.entries_anchored_total);
        if available < claimed_log_count {
            return Err(LogchainError::InsufficientEntries {
                available,
                requested: claimed_log_count,
            });
        }

        Ok(())
    }

    /// Entry indexes the next anchor of `claimed_log_count` entries covers,
    /// as a half-open `[start, end)` range.
    pub fn window(trail: &AuditTrailRecord, claimed_log_count: u64) -> Range<u64> {
        trail.entries_anchored_total..trail.entries_anchored_total + claimed_log_count
    }

    /// Commit a built batch, producing the advanced trail and server records.
    ///
    /// The caller persists both records atomically; on any persistence
    /// failure neither may be written.
    pub fn commit(
        server: &ServerRecord,
        trail: &AuditTrailRecord,
        batch: &BatchSummary,
        anchored_at: u64,
        anchor_position: u64,
    ) -> AnchorOutcome {
        let mut next_trail = trail.clone();
        next_trail.batch_id = trail.next_batch_id;
        next_trail.next_batch_id = trail.next_batch_id + 1;
        next_trail.root_hash = batch.root_hash;
        next_trail.entries_in_last_batch = batch.leaf_count;
        next_trail.entries_anchored_total = trail.entries_anchored_total + batch.leaf_count;
        next_trail.anchored_at = anchored_at;
        next_trail.anchor_position = anchor_position;

        let mut next_server = server.clone();
        next_server.last_anchor_position = anchor_position;

        AnchorOutcome {
            server: next_server,
            trail: next_trail,
        }
    }
}
