//! Error types for the PRUFWERK evidence log.
//!
//! Every fallible evidence operation returns `EvidenceResult<T>`. Variants
//! carry the line index, path, or observed/expected values needed to
//! localize a fault in a log file.

use thiserror::Error;

/// The unified error type for evidence encoding, appending, and verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvidenceError {
    /// A log line is not a valid evidence record.
    #[error("malformed evidence record: {reason}")]
    MalformedRecord { reason: String },

    /// The tail record of an existing log could not be parsed during append.
    ///
    /// The append is aborted and the file is left untouched.
    #[error("cannot read chain tail of '{path}': {reason}")]
    ChainRead { path: String, reason: String },

    /// Opening, locking, or writing the log failed during append.
    ///
    /// The event is not committed; retrying the whole append is safe.
    #[error("append to '{path}' failed: {reason}")]
    AppendIo { path: String, reason: String },

    /// A record failed schema parsing during verification.
    #[error("line {index}: invalid record: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// The final line of the log is unterminated and unparsable, which is
    /// what a concurrent in-progress append looks like from the outside.
    #[error("line {index}: truncated trailing record: {reason}")]
    TruncatedTail { index: usize, reason: String },

    /// `prev_hash` does not match the previous record's `hash`.
    #[error("line {index}: prev_hash mismatch: have {observed:?} want {expected:?}")]
    ChainBroken {
        index: usize,
        observed: String,
        expected: String,
    },

    /// The recomputed content commitment does not match the stored `hash`.
    #[error("line {index}: hash mismatch: have {stored:?} want {recomputed:?}")]
    ContentTampered {
        index: usize,
        stored: String,
        recomputed: String,
    },

    /// The log could not be read while verifying.
    #[error("read of '{path}' failed: {reason}")]
    ReadIo { path: String, reason: String },

    /// A decision string is not one of the known outcomes.
    #[error("invalid decision '{value}' (expected ALLOW or DENY)")]
    InvalidDecision { value: String },

    /// A required command-line argument is missing or empty.
    #[error("missing required flag: {flag}")]
    MissingArgument { flag: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl EvidenceError {
    /// The 1-based record index the error refers to, for verifier errors.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::InvalidRecord { index, .. }
            | Self::TruncatedTail { index, .. }
            | Self::ChainBroken { index, .. }
            | Self::ContentTampered { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the PRUFWERK crates.
pub type EvidenceResult<T> = Result<T, EvidenceError>;

/// A failed chain verification.
///
/// `verified` counts the records that passed every check before `error`
/// was hit, so a clean prefix of the log is still reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error} ({verified} event(s) verified before failure)")]
pub struct VerifyFailure {
    pub verified: usize,
    #[source]
    pub error: EvidenceError,
}

impl VerifyFailure {
    pub fn new(verified: usize, error: EvidenceError) -> Self {
        Self { verified, error }
    }

    /// Index of the first inconsistent record, when the failure has one.
    pub fn index(&self) -> Option<usize> {
        self.error.index()
    }
}
