use serde::{Deserialize, Serialize};

/// Boundary limits for logchain operations.
///
/// Defaults match the on-ledger program constants. Raising
/// `max_batch_entries` raises the cost of a single anchor transaction;
/// the cap exists to bound it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum entry payload size in bytes.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
    /// Maximum number of entries summarized by one anchor.
    #[serde(default = "default_max_batch_entries")]
    pub max_batch_entries: u64,
    /// Maximum server description length in bytes.
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
}

fn default_max_payload_bytes() -> usize {
    1024
}

fn default_max_batch_entries() -> u64 {
    1000
}

fn default_max_description_len() -> usize {
    100
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_payload_bytes: default_max_payload_bytes(),
            max_batch_entries: default_max_batch_entries(),
            max_description_len: default_max_description_len(),
        }
    }
}
