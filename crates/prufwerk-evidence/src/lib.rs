//! # prufwerk-evidence
//!
//! Append-only, SHA-256 hash-chained evidence log stored as JSON Lines.
//!
//! ## Overview
//!
//! Each record carries `prev_hash`, the `hash` of the record before it, and
//! `hash`, a commitment to its own canonical encoding. Editing, deleting,
//! inserting, or reordering any record is caught by replaying the file with
//! [`verify`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prufwerk_contracts::{Actor, Decision, EvidenceEvent};
//! use prufwerk_evidence::{EvidenceWriter, JsonlEvidenceLog};
//!
//! let log = JsonlEvidenceLog::new("evidence/i1.jsonl");
//! let event = EvidenceEvent::new(&Actor::default(), EvidenceEvent::ADMISSION_DECISION, Decision::Allow)
//!     .with_image_ref("repo/img:tag");
//! log.append(event)?;
//!
//! let verified = log.verify()?;
//! ```

pub mod chain;
pub mod codec;
pub mod file;
pub mod memory;
pub mod writer;

pub use chain::{hash_event, verify_reader, ChainSummary};
pub use codec::{decode_line, encode_canonical, encode_for_commitment};
pub use file::{append, verify, verify_summary, JsonlEvidenceLog};
pub use memory::MemoryEvidenceLog;
pub use writer::EvidenceWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────
