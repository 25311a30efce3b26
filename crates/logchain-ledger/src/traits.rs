use logchain_types::{AuthorityId, ServerId};

use crate::error::LogchainError;
use crate::records::{AuditTrailRecord, LogEntryRecord, ServerRecord};

/// Write boundary for logchain mutations.
///
/// Every method is all-or-nothing: a failure leaves all records in their
/// pre-operation state. Implementations rely on the record store's
/// exclusive-write-by-key contract to serialize concurrent mutations of the
/// same server.
pub trait LogchainWriter: Send + Sync {
    /// Register a new server. The id and description caps are enforced
    /// here, at the boundary.
    fn register_server(
        &self,
        server_id: &str,
        description: &str,
        authority: AuthorityId,
        stake: u64,
    ) -> Result<ServerRecord, LogchainError>;

    /// Append a payload to the server's entry chain.
    fn append_entry(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
        payload: &[u8],
    ) -> Result<LogEntryRecord, LogchainError>;

    /// Summarize the next `log_count` unanchored entries into a Merkle root
    /// and commit it as the next batch.
    ///
    /// `expected_batch_id`, when supplied, must equal the trail's
    /// `next_batch_id`; a mismatch fails with `InvalidBatchSequence` and is
    /// the designed outcome of a stale retry.
    fn anchor_batch(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
        log_count: u64,
        expected_batch_id: Option<u64>,
    ) -> Result<AuditTrailRecord, LogchainError>;

    /// Mark a server inactive. No further entries or anchors are accepted.
    fn deactivate_server(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
    ) -> Result<ServerRecord, LogchainError>;

    /// Remove the audit trail of a deactivated server. Returns the removed
    /// record.
    fn close_trail(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
    ) -> Result<AuditTrailRecord, LogchainError>;
}

/// Read boundary for logchain queries.
pub trait LogchainReader: Send + Sync {
    fn server(&self, server_id: &ServerId) -> Result<Option<ServerRecord>, LogchainError>;

    fn servers(&self) -> Result<Vec<ServerRecord>, LogchainError>;

    fn entry(
        &self,
        server_id: &ServerId,
        entry_index: u64,
    ) -> Result<Option<LogEntryRecord>, LogchainError>;

    /// Entries with index in the half-open range `[from_index, to_index)`,
    /// clamped to what exists.
    fn entries_range(
        &self,
        server_id: &ServerId,
        from_index: u64,
        to_index: u64,
    ) -> Result<Vec<LogEntryRecord>, LogchainError>;

    /// The server's audit trail, or the zero-valued sentinel if no batch
    /// has been anchored yet.
    fn trail(&self, server_id: &ServerId) -> Result<AuditTrailRecord, LogchainError>;

    fn entry_count(&self, server_id: &ServerId) -> Result<u64, LogchainError>;
}
