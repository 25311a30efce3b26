use serde::{Deserialize, Serialize};

use logchain_crypto::{chain, digest, ChainedEntry, HashAlgo};
use logchain_types::{AuthorityId, Hash32, ServerId};

/// One registered log-producing server.
///
/// `entry_count` and `last_entry_hash` are the optimistic concurrency tokens
/// for appends: `entry_count` only increases, and `last_entry_hash` always
/// equals the chain hash of entry `entry_count - 1` once any entry exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub server_id: ServerId,
    pub authority: AuthorityId,
    pub description: String,
    pub is_active: bool,
    /// Unix seconds at registration.
    pub registered_at: u64,
    /// Stake amount recorded at registration. The stake account itself is
    /// wallet-layer; only the amount is carried here.
    pub stake: u64,
    /// Entries ever appended; also the next entry's index.
    pub entry_count: u64,
    /// Chain hash of the most recent entry; zero before the first entry.
    pub last_entry_hash: Hash32,
    /// External-ledger position of the most recent anchor.
    pub last_anchor_position: u64,
}

impl ServerRecord {
    /// Create a freshly registered, active server.
    pub fn register(
        server_id: ServerId,
        authority: AuthorityId,
        description: String,
        stake: u64,
        registered_at: u64,
    ) -> Self {
        Self {
            server_id,
            authority,
            description,
            is_active: true,
            registered_at,
            stake,
            entry_count: 0,
            last_entry_hash: Hash32::zero(),
            last_anchor_position: 0,
        }
    }

    /// Index the next appended entry will take.
    pub fn next_entry_index(&self) -> u64 {
        self.entry_count
    }
}

/// One appended log entry. Immutable once created.
///
/// For every entry except index 0, `previous_hash` equals the `entry_hash`
/// of the preceding entry of the same server. Altering any entry's payload
/// changes its `entry_hash` and breaks the link of every subsequent entry —
/// this is the tamper-evidence property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryRecord {
    pub server_id: ServerId,
    /// Zero-based sequential position within the server's chain.
    pub entry_index: u64,
    /// Creation time in unix seconds, non-decreasing within a chain.
    pub timestamp: u64,
    /// Digest of `payload`.
    pub data_hash: Hash32,
    /// `last_entry_hash` of the server when this entry was created.
    pub previous_hash: Hash32,
    /// This entry's chain identity.
    pub entry_hash: Hash32,
    pub payload: Vec<u8>,
}

impl LogEntryRecord {
    /// Build an entry chained to `previous_hash`, computing both digests.
    pub fn chained(
        server_id: ServerId,
        entry_index: u64,
        timestamp: u64,
        previous_hash: Hash32,
        payload: Vec<u8>,
    ) -> Self {
        let data_hash = digest(&payload);
        let entry_hash = chain::entry_hash(&previous_hash, &data_hash, entry_index, timestamp);
        Self {
            server_id,
            entry_index,
            timestamp,
            data_hash,
            previous_hash,
            entry_hash,
            payload,
        }
    }
}

impl ChainedEntry for LogEntryRecord {
    fn entry_index(&self) -> u64 {
        self.entry_index
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
        self.entry_hash
    }
    fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Per-server anchor state. Created on the first anchor, mutated in place on
/// each subsequent one.
///
/// `batch_id`/`next_batch_id` are the optimistic concurrency tokens for
/// anchoring; `entries_anchored_total` strictly increases and the `batch_id`
/// sequence has no gaps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrailRecord {
    pub server_id: ServerId,
    pub authority: AuthorityId,
    /// Most recently anchored batch id; 0 before any anchor (sentinel).
    pub batch_id: u64,
    /// Batch id the next anchor must take; 0 before any anchor.
    pub next_batch_id: u64,
    /// Merkle root of the most recently anchored batch; zero before any.
    pub root_hash: Hash32,
    /// Entries summarized by `root_hash`.
    pub entries_in_last_batch: u64,
    /// Cumulative entries anchored across all batches.
    pub entries_anchored_total: u64,
    /// Unix seconds of the most recent anchor.
    pub anchored_at: u64,
    /// External-ledger position of the most recent anchor.
    pub anchor_position: u64,
    /// Digest algorithm the anchored roots were computed with.
    pub hash_algo: HashAlgo,
}

impl AuditTrailRecord {
    /// The zero-valued trail a server has before its first anchor.
    pub fn sentinel(server_id: ServerId, authority: AuthorityId) -> Self {
        Self {
            server_id,
            authority,
            batch_id: 0,
            next_batch_id: 0,
            root_hash: Hash32::zero(),
            entries_in_last_batch: 0,
            entries_anchored_total: 0,
            anchored_at: 0,
            anchor_position: 0,
            hash_algo: HashAlgo::default(),
        }
    }

    /// Returns `true` if no batch has been anchored yet.
    pub fn is_sentinel(&self) -> bool {
        self.next_batch_id == 0
    }

    /// Entry indexes covered by the most recently anchored batch,
    /// as a half-open `[start, end)` range. Empty for the sentinel.
    pub fn anchored_window(&self) -> std::ops::Range<u64> {
        let end = self.entries_anchored_total;
        let start = end - self.entries_in_last_batch;
        start..end
    }
}
