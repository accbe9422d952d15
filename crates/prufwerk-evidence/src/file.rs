//! JSONL file-backed evidence log.
//!
//! `JsonlEvidenceLog` holds nothing but a path. Every append re-reads the
//! tail of the file under an exclusive advisory lock (`fs2`), so independent
//! processes appending to the same file still produce a single chain.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, ErrorKind, Write},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use tracing::{debug, info};

use prufwerk_contracts::{EvidenceError, EvidenceEvent, EvidenceResult, VerifyFailure};

use crate::{
    chain::{seal, verify_reader, ChainSummary},
    codec::{decode_line, encode_canonical, is_blank},
    writer::EvidenceWriter,
};

/// An evidence log stored as one canonical JSON record per line.
#[derive(Debug, Clone)]
pub struct JsonlEvidenceLog {
    path: PathBuf,
}

impl JsonlEvidenceLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replay the whole file and return the number of verified records.
    pub fn verify(&self) -> Result<usize, VerifyFailure> {
        verify(&self.path)
    }

    /// Replay the whole file and return the count plus the terminal hash.
    pub fn verify_summary(&self) -> Result<ChainSummary, VerifyFailure> {
        verify_summary(&self.path)
    }
}

impl EvidenceWriter for JsonlEvidenceLog {
    fn append(&self, event: EvidenceEvent) -> EvidenceResult<EvidenceEvent> {
        append(&self.path, event)
    }
}

/// What the appender needs to know about the current end of the file.
struct Tail {
    last_record: Option<String>,
    ends_with_newline: bool,
    is_empty: bool,
}

/// Append `event` to the log at `path`, creating the file if needed.
///
/// Steps, all under an exclusive lock on the log file:
///
/// 1. Read to the last non-blank line and take its `hash` as `prev_hash`
///    (empty if the file has no records).
/// 2. Seal the event and append its canonical line plus `\n`.
/// 3. `sync_data` before reporting success.
///
/// Returns `ChainRead` if the existing tail record cannot be parsed (nothing
/// is written) and `AppendIo` for any open, lock, read, or write failure.
pub fn append(path: &Path, mut event: EvidenceEvent) -> EvidenceResult<EvidenceEvent> {
    let shown = path.display().to_string();
    let io_err = |e: io::Error| EvidenceError::AppendIo {
        path: shown.clone(),
        reason: e.to_string(),
    };

    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    // Released when `file` is dropped at the end of this call.
    file.lock_exclusive().map_err(io_err)?;

    let tail = read_tail(&file).map_err(io_err)?;
    let prev_hash = match tail.last_record.as_deref() {
        None => String::new(),
        Some(line) => {
            decode_line(line)
                .map_err(|e| EvidenceError::ChainRead {
                    path: shown.clone(),
                    reason: e.to_string(),
                })?
                .hash
        }
    };
    debug!(path = %shown, prev_hash = %prev_hash, "derived chain tail");

    seal(&mut event, prev_hash);

    let mut record = String::new();
    if !tail.is_empty && !tail.ends_with_newline {
        record.push('\n');
    }
    record.push_str(&encode_canonical(&event));
    record.push('\n');

    (&file).write_all(record.as_bytes()).map_err(io_err)?;
    file.sync_data().map_err(io_err)?;

    info!(
        path = %shown,
        event_id = %event.event_id,
        event_type = %event.event_type,
        decision = %event.decision,
        hash = %event.hash,
        "evidence event appended"
    );
    Ok(event)
}

/// Verify the log at `path` and return the number of records verified.
///
/// A missing file is an empty log and verifies as `Ok(0)`.
pub fn verify(path: &Path) -> Result<usize, VerifyFailure> {
    verify_summary(path).map(|summary| summary.verified)
}

/// Like [`verify`], also returning the terminal hash.
pub fn verify_summary(path: &Path) -> Result<ChainSummary, VerifyFailure> {
    let shown = path.display().to_string();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %shown, "evidence log does not exist, nothing to verify");
            return Ok(ChainSummary::empty());
        }
        Err(e) => {
            return Err(VerifyFailure::new(
                0,
                EvidenceError::ReadIo {
                    path: shown,
                    reason: e.to_string(),
                },
            ))
        }
    };
    verify_reader(BufReader::new(file), &shown)
}

fn read_tail(file: &File) -> io::Result<Tail> {
    let mut reader = BufReader::new(file);
    let mut tail = Tail {
        last_record: None,
        ends_with_newline: false,
        is_empty: true,
    };
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        tail.is_empty = false;
        tail.ends_with_newline = buf.last() == Some(&b'\n');

        let line = String::from_utf8_lossy(&buf);
        if !is_blank(&line) {
            tail.last_record = Some(line.into_owned());
        }
    }

    Ok(tail)
}
