//! In-memory implementation of `EvidenceWriter`.
//!
//! `MemoryEvidenceLog` keeps canonical lines in a `Vec` behind a `Mutex` and
//! runs the same append algorithm as the file log against its own last
//! line. Use `to_jsonl()` to export the log and `verify()` to replay it.

use std::{
    io::Cursor,
    sync::{Mutex, MutexGuard},
};

use tracing::info;

use prufwerk_contracts::{EvidenceError, EvidenceEvent, EvidenceResult, VerifyFailure};

use crate::{
    chain::{seal, verify_reader, ChainSummary},
    codec::{decode_line, encode_canonical},
    writer::EvidenceWriter,
};

const MEMORY_SOURCE: &str = "<memory>";

/// An in-memory, append-only evidence log.
#[derive(Debug, Default)]
pub struct MemoryEvidenceLog {
    pub(crate) lines: Mutex<Vec<String>>,
}

impl MemoryEvidenceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records appended so far.
    pub fn len(&self) -> usize {
        self.stored().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export the log as JSONL text, one record per line.
    pub fn to_jsonl(&self) -> String {
        let lines = self.stored();
        let mut out = String::new();
        for line in lines.iter() {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Read access to the stored lines, recovering them from a poisoned lock.
    /// Appends still refuse to extend a poisoned log.
    fn stored(&self) -> MutexGuard<'_, Vec<String>> {
        match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Replay the stored lines exactly as the file verifier would.
    pub fn verify(&self) -> Result<ChainSummary, VerifyFailure> {
        verify_reader(Cursor::new(self.to_jsonl()), MEMORY_SOURCE)
    }
}

impl EvidenceWriter for MemoryEvidenceLog {
    fn append(&self, mut event: EvidenceEvent) -> EvidenceResult<EvidenceEvent> {
        let mut lines = self.lines.lock().map_err(|e| EvidenceError::AppendIo {
            path: MEMORY_SOURCE.to_string(),
            reason: format!("evidence state lock poisoned: {}", e),
        })?;

        let prev_hash = match lines.last() {
            None => String::new(),
            Some(line) => {
                decode_line(line)
                    .map_err(|e| EvidenceError::ChainRead {
                        path: MEMORY_SOURCE.to_string(),
                        reason: e.to_string(),
                    })?
                    .hash
            }
        };

        seal(&mut event, prev_hash);
        lines.push(encode_canonical(&event));

        info!(
            event_id = %event.event_id,
            record_count = lines.len(),
            hash = %event.hash,
            "evidence event appended to memory log"
        );
        Ok(event)
    }
}
