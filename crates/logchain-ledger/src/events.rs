use serde::{Deserialize, Serialize};

use logchain_types::{Hash32, ServerId};

/// Events emitted by logchain operations.
///
/// The on-ledger program emits these for off-chain observers; the in-memory
/// implementation records them for inspection instead. Transport of events
/// to subscribers is not the core's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogchainEvent {
    /// A new entry was appended to a server's chain.
    EntryAppended {
        server_id: ServerId,
        entry_index: u64,
        entry_hash: Hash32,
        timestamp: u64,
    },
    /// A batch root was anchored.
    RootAnchored {
        server_id: ServerId,
        batch_id: u64,
        root_hash: Hash32,
        entries_in_batch: u64,
        entries_anchored_total: u64,
        timestamp: u64,
    },
    /// An entry passed verification.
    EntryVerified {
        server_id: ServerId,
        entry_index: u64,
        entry_hash: Hash32,
        verified_at: u64,
    },
}
