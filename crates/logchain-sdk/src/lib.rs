//! High-level SDK for logchain.
//!
//! Provides a unified API over the in-memory ledger and the verification
//! engine. This is the main entry point for applications embedding the
//! audit log core.

pub mod error;
pub mod repository;

pub use error::{SdkError, SdkResult};
pub use repository::Logchain;

// Re-export key types
pub use logchain_crypto::{MerkleProof, ProofStep, Side};
pub use logchain_ledger::{
    AuditTrailRecord, Limits, LogEntryRecord, LogchainError, LogchainEvent, ServerRecord,
};
pub use logchain_types::{AuthorityId, Hash32, ServerId};
pub use logchain_verify::{ChainReport, VerificationDepth, VerificationEngine, VerificationReport};
