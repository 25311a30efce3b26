//! Verification engine for logchain.
//!
//! Answers "is entry X authentic and unmodified?" against an anchored batch
//! root, and "is this run of entries an unbroken chain?". Failed checks are
//! the system's core tamper-detection signal: they are reported as
//! first-class findings, never as errors. The tree-walk here must stay
//! bit-identical to the construction rule in `logchain-crypto`.

pub mod engine;
pub mod report;

pub use engine::VerificationEngine;
pub use report::{
    ChainBreak, ChainBreakKind, ChainReport, Finding, FindingKind, VerificationDepth,
    VerificationReport,
};
