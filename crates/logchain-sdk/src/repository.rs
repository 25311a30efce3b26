use logchain_crypto::MerkleProof;
use logchain_ledger::{
    AuditTrailRecord, BatchBuilder, InMemoryLogchain, Limits, LogEntryRecord, LogchainError,
    LogchainEvent, LogchainReader, LogchainWriter, ServerRecord,
};
use logchain_types::{AuthorityId, ServerId};
use logchain_verify::{ChainReport, VerificationDepth, VerificationEngine, VerificationReport};

use crate::error::SdkResult;

/// High-level logchain API.
///
/// Wires the ledger and the verification engine together behind one
/// handle. Anchor calls fetch the trail first and supply the observed
/// `next_batch_id` as the expected sequence value, the way an interactive
/// client does; use [`anchor_batch_expecting`] to pin the id explicitly.
///
/// [`anchor_batch_expecting`]: Logchain::anchor_batch_expecting
pub struct Logchain {
    ledger: InMemoryLogchain,
}

impl Logchain {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            ledger: InMemoryLogchain::new(limits),
        }
    }

    // ---- Server operations ----

    pub fn register_server(
        &self,
        server_id: &str,
        description: &str,
        authority: AuthorityId,
        stake: u64,
    ) -> SdkResult<ServerRecord> {
        Ok(self
            .ledger
            .register_server(server_id, description, authority, stake)?)
    }

    pub fn deactivate_server(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
    ) -> SdkResult<ServerRecord> {
        Ok(self.ledger.deactivate_server(server_id, caller)?)
    }

    pub fn server(&self, server_id: &ServerId) -> SdkResult<Option<ServerRecord>> {
        Ok(self.ledger.server(server_id)?)
    }

    pub fn servers(&self) -> SdkResult<Vec<ServerRecord>> {
        Ok(self.ledger.servers()?)
    }

    // ---- Entry operations ----

    pub fn append_entry(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
        payload: &[u8],
    ) -> SdkResult<LogEntryRecord> {
        Ok(self.ledger.append_entry(server_id, caller, payload)?)
    }

    pub fn entry(&self, server_id: &ServerId, entry_index: u64) -> SdkResult<Option<LogEntryRecord>> {
        Ok(self.ledger.entry(server_id, entry_index)?)
    }

    pub fn entries(&self, server_id: &ServerId) -> SdkResult<Vec<LogEntryRecord>> {
        let count = self.ledger.entry_count(server_id)?;
        Ok(self.ledger.entries_range(server_id, 0, count)?)
    }

    // ---- Anchor operations ----

    /// Anchor the next `log_count` unanchored entries, supplying the
    /// currently observed `next_batch_id` as the expected sequence value.
    pub fn anchor_batch(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
        log_count: u64,
    ) -> SdkResult<AuditTrailRecord> {
        let trail = self.ledger.trail(server_id)?;
        Ok(self
            .ledger
            .anchor_batch(server_id, caller, log_count, Some(trail.next_batch_id))?)
    }

    /// Anchor with an explicitly pinned batch id. A stale id fails with
    /// `InvalidBatchSequence`, which a retrying caller treats as "likely
    /// already succeeded".
    pub fn anchor_batch_expecting(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
        log_count: u64,
        expected_batch_id: u64,
    ) -> SdkResult<AuditTrailRecord> {
        Ok(self
            .ledger
            .anchor_batch(server_id, caller, log_count, Some(expected_batch_id))?)
    }

    pub fn trail(&self, server_id: &ServerId) -> SdkResult<AuditTrailRecord> {
        Ok(self.ledger.trail(server_id)?)
    }

    pub fn close_trail(
        &self,
        server_id: &ServerId,
        caller: AuthorityId,
    ) -> SdkResult<AuditTrailRecord> {
        Ok(self.ledger.close_trail(server_id, caller)?)
    }

    // ---- Verification ----

    /// Build the inclusion proof for an entry of the most recently
    /// anchored batch.
    pub fn entry_proof(&self, server_id: &ServerId, entry_index: u64) -> SdkResult<MerkleProof> {
        let trail = self.ledger.trail(server_id)?;
        if trail.is_sentinel() {
            return Err(LogchainError::TrailNotFound.into());
        }
        let window = trail.anchored_window();
        let entries = self
            .ledger
            .entries_range(server_id, window.start, window.end)?;
        Ok(BatchBuilder::prove(
            &entries,
            entry_index,
            self.ledger.limits(),
        )?)
    }

    /// Verify an entry against the anchored root, emitting an
    /// `EntryVerified` event when it passes.
    pub fn verify_entry(
        &self,
        server_id: &ServerId,
        entry_index: u64,
        depth: VerificationDepth,
    ) -> SdkResult<VerificationReport> {
        let entry = self
            .ledger
            .entry(server_id, entry_index)?
            .ok_or(LogchainError::EntryNotFound { index: entry_index })?;
        let proof = self.entry_proof(server_id, entry_index)?;
        let trail = self.ledger.trail(server_id)?;

        let report = VerificationEngine::verify_entry(&entry, &proof, &trail, depth);
        if report.is_verified() {
            self.ledger
                .note_verified(server_id, entry.entry_index, entry.entry_hash)?;
        }
        Ok(report)
    }

    /// Re-walk the server's full entry chain from genesis.
    pub fn verify_chain(&self, server_id: &ServerId) -> SdkResult<ChainReport> {
        let entries = self.entries(server_id)?;
        Ok(VerificationEngine::verify_chain_run(
            server_id, &entries, None,
        ))
    }

    // ---- Events ----

    pub fn take_events(&self) -> SdkResult<Vec<LogchainEvent>> {
        Ok(self.ledger.take_events()?)
    }
}

impl Default for Logchain {
    fn default() -> Self {
        Self::new()
    }
}
