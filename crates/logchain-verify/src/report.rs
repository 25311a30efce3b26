use logchain_types::{Hash32, ServerId};

/// How much of an entry to recompute during verification.
///
/// The distinction matters: shallow verification proves the *stored* entry
/// hash is a member of the anchored batch; deep verification additionally
/// proves the payload bytes still produce that hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationDepth {
    /// Trust the stored `entry_hash` as the Merkle leaf.
    Shallow,
    /// Recompute `data_hash` and `entry_hash` from the payload first.
    Deep,
}

/// Result of verifying one entry against an anchored root.
///
/// A report with no findings is a successful verification. Findings are
/// expected, reportable outcomes — tamper detection is a designed result,
/// not an error condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationReport {
    pub server_id: ServerId,
    pub entry_index: u64,
    pub depth: VerificationDepth,
    /// Root recomputed from the leaf and proof path, when the walk ran.
    pub computed_root: Option<Hash32>,
    pub findings: Vec<Finding>,
}

impl VerificationReport {
    /// Returns `true` if the entry verified cleanly.
    pub fn is_verified(&self) -> bool {
        self.findings.is_empty()
    }
}

/// A specific verification failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    pub kind: FindingKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FindingKind {
    /// The entry belongs to a different server than the trail.
    ServerMismatch,
    /// No batch has been anchored yet; there is nothing to verify against.
    TrailUnanchored,
    /// The payload no longer produces the stored `data_hash` (deep only).
    PayloadMismatch,
    /// The stored `entry_hash` differs from the recomputed one (deep only).
    EntryHashMismatch,
    /// The proof walk did not reproduce the anchored root.
    RootMismatch,
    /// The entry index lies outside the last anchored batch window.
    IndexOutsideWindow,
}

/// Result of re-walking a contiguous run of entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainReport {
    pub server_id: ServerId,
    pub entries_checked: u64,
    /// The first break found, if any. `None` means the run is unbroken.
    pub break_at: Option<ChainBreak>,
}

impl ChainReport {
    /// Returns `true` if the run is an unbroken, correctly hashed chain.
    pub fn is_intact(&self) -> bool {
        self.break_at.is_none()
    }
}

/// The exact point at which a chain run fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainBreak {
    /// Entry index at which tampering or deletion was detected.
    pub index: u64,
    pub kind: ChainBreakKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainBreakKind {
    /// Entry 0 carries a nonzero previous hash.
    GenesisLink,
    /// `previous_hash` does not match the predecessor's `entry_hash`.
    BrokenLink,
    /// Entry indexes skip or repeat — a deletion or reordering.
    MissingEntry,
    /// Stored `entry_hash` differs from the recomputed value.
    HashMismatch,
}
