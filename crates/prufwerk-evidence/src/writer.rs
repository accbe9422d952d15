//! The evidence sink seam.

use prufwerk_contracts::{EvidenceEvent, EvidenceResult};

/// An append-only, hash-chained evidence sink.
///
/// Implementations derive the linkage value from their own stored tail on
/// every call and must serialize concurrent appends end-to-end.
pub trait EvidenceWriter: Send + Sync {
    /// Link `event` to the current tail, seal it, and persist it.
    ///
    /// Returns the committed event with `prev_hash` and `hash` filled in.
    fn append(&self, event: EvidenceEvent) -> EvidenceResult<EvidenceEvent>;
}
