//! Cryptographic core for logchain.
//!
//! Provides the digest primitive, the entry hash-chaining rule, and binary
//! Merkle trees with inclusion proofs. The byte layouts here are the
//! protocol contract: entry hashes commit to `previous_hash ++ data_hash ++
//! be64(entry_index) ++ be64(timestamp)`, and Merkle nodes combine as
//! `digest(left ++ right)` with no separator. Any deviation breaks every
//! previously issued proof, so changes require a new [`HashAlgo`] version.
//!
//! All digest operations wrap BLAKE3 — no custom cryptography.

pub mod chain;
pub mod hasher;
pub mod merkle;

pub use chain::{ChainError, ChainVerifier, ChainedEntry};
pub use hasher::{combine, digest, HashAlgo};
pub use merkle::{MerkleProof, MerkleTree, ProofStep, Side};
