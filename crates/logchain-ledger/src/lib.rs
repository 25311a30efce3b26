//! Core ledger logic for logchain.
//!
//! This crate is the heart of the audit log. It provides:
//! - `ServerRecord` / `LogEntryRecord` / `AuditTrailRecord` record types
//! - `LogchainWriter` / `LogchainReader` trait boundaries
//! - `BatchBuilder` for Merkle summarization of unanchored entry windows
//! - `AnchorSequencer` for exactly-once, in-order batch anchoring
//! - `InMemoryLogchain` implementation for tests and embedding
//!
//! The ledger substrate is assumed to serialize mutations per record key;
//! correctness rests on sequence fields acting as optimistic concurrency
//! tokens (`entry_count`/`last_entry_hash` for appends, `next_batch_id` for
//! anchors), not on locks inside the core.

pub mod batch;
pub mod config;
pub mod error;
pub mod events;
pub mod memory;
pub mod records;
pub mod sequencer;
pub mod traits;

pub use batch::{BatchBuilder, BatchSummary};
pub use config::Limits;
pub use error::{ErrorClass, LogchainError};
pub use events::LogchainEvent;
pub use memory::InMemoryLogchain;
pub use records::{AuditTrailRecord, LogEntryRecord, ServerRecord};
pub use sequencer::{AnchorOutcome, AnchorSequencer};
pub use traits::{LogchainReader, LogchainWriter};
