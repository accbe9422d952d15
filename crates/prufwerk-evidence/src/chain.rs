//! Hash-chain primitives: content commitment, sealing, and replay verification.
//!
//! A record's `hash` is `hex(sha256(encode_for_commitment(record)))` and its
//! `prev_hash` is the `hash` of the record before it (empty for the first).
//! The verifier replays any `BufRead` source and stops at the first record
//! that breaks either rule.

use std::io::BufRead;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use prufwerk_contracts::{EvidenceError, EvidenceEvent, VerifyFailure};

use crate::codec::{decode_line, encode_for_commitment, is_blank};

/// Compute the content commitment of `event`.
///
/// The stored `hash` field is ignored. Returns a lowercase 64-character hex
/// string.
pub fn hash_event(event: &EvidenceEvent) -> String {
    let payload = encode_for_commitment(event);
    hex::encode(Sha256::digest(payload.as_bytes()))
}

/// Link `event` to `prev_hash` and fill in its commitment.
pub fn seal(event: &mut EvidenceEvent, prev_hash: String) {
    event.prev_hash = prev_hash;
    event.hash = hash_event(event);
}

/// Outcome of a clean replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSummary {
    /// Number of records verified.
    pub verified: usize,
    /// `hash` of the last record, or empty for an empty log.
    pub terminal_hash: String,
}

impl ChainSummary {
    pub fn empty() -> Self {
        Self {
            verified: 0,
            terminal_hash: String::new(),
        }
    }
}

/// Check one decoded record against the running linkage value.
fn check_record(
    index: usize,
    event: &EvidenceEvent,
    expected_prev: &str,
) -> Result<(), EvidenceError> {
    if event.prev_hash != expected_prev {
        return Err(EvidenceError::ChainBroken {
            index,
            observed: event.prev_hash.clone(),
            expected: expected_prev.to_string(),
        });
    }

    let recomputed = hash_event(event);
    if event.hash != recomputed {
        return Err(EvidenceError::ContentTampered {
            index,
            stored: event.hash.clone(),
            recomputed,
        });
    }

    Ok(())
}

/// Replay every record from `reader` and verify the chain.
///
/// `source` names the input in `ReadIo` errors. Blank lines are skipped and
/// do not count toward the 1-based record index. An unparsable final line
/// with no terminating newline is reported as `TruncatedTail`.
pub fn verify_reader<R: BufRead>(
    mut reader: R,
    source: &str,
) -> Result<ChainSummary, VerifyFailure> {
    let mut summary = ChainSummary::empty();
    let mut index = 0usize;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|e| {
            VerifyFailure::new(
                summary.verified,
                EvidenceError::ReadIo {
                    path: source.to_string(),
                    reason: e.to_string(),
                },
            )
        })?;
        if read == 0 {
            break;
        }
        let terminated = buf.last() == Some(&b'\n');

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                index += 1;
                return Err(fail(&summary, unparsable(index, terminated, e.to_string())));
            }
        };
        if is_blank(line) {
            continue;
        }
        index += 1;

        let event = match decode_line(line) {
            Ok(event) => event,
            Err(e) => {
                let reason = match e {
                    EvidenceError::MalformedRecord { reason } => reason,
                    other => other.to_string(),
                };
                return Err(fail(&summary, unparsable(index, terminated, reason)));
            }
        };

        check_record(index, &event, &summary.terminal_hash).map_err(|e| fail(&summary, e))?;

        summary.verified += 1;
        summary.terminal_hash = event.hash;
    }

    debug!(
        source = %source,
        verified = summary.verified,
        terminal_hash = %summary.terminal_hash,
        "evidence chain verified"
    );
    Ok(summary)
}

fn unparsable(index: usize, terminated: bool, reason: String) -> EvidenceError {
    if terminated {
        EvidenceError::InvalidRecord { index, reason }
    } else {
        EvidenceError::TruncatedTail { index, reason }
    }
}

fn fail(summary: &ChainSummary, error: EvidenceError) -> VerifyFailure {
    warn!(verified = summary.verified, error = %error, "evidence chain verification failed");
    VerifyFailure::new(summary.verified, error)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use prufwerk_contracts::{Actor, Decision};

    use super::*;
    use crate::codec::encode_canonical;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Build a valid JSONL chain of `n` records.
    fn chain_text(n: usize) -> String {
        let mut prev = String::new();
        let mut text = String::new();
        for i in 0..n {
            let mut event = EvidenceEvent::new(&Actor::default(), "TEST", Decision::Allow)
                .with_demo_step(format!("step-{i}"));
            seal(&mut event, prev);
            prev = event.hash.clone();
            text.push_str(&encode_canonical(&event));
            text.push('\n');
        }
        text
    }

    fn verify_text(text: &str) -> Result<ChainSummary, VerifyFailure> {
        verify_reader(Cursor::new(text.as_bytes()), "<test>")
    }

    // ── Commitment ───────────────────────────────────────────────────────────

    #[test]
    fn hash_ignores_stored_hash_field() {
        let mut event = EvidenceEvent::new(&Actor::default(), "TEST", Decision::Deny);
        let h1 = hash_event(&event);
        event.hash = "deadbeef".to_string();
        assert_eq!(hash_event(&event), h1);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn seal_links_and_commits() {
        let mut event = EvidenceEvent::new(&Actor::default(), "TEST", Decision::Allow);
        seal(&mut event, "abc".to_string());
        assert_eq!(event.prev_hash, "abc");
        assert_eq!(event.hash, hash_event(&event));
    }

    // ── Replay ───────────────────────────────────────────────────────────────

    #[test]
    fn valid_chain_verifies_fully() {
        let summary = verify_text(&chain_text(4)).unwrap();
        assert_eq!(summary.verified, 4);
        assert_eq!(summary.terminal_hash.len(), 64);
    }

    #[test]
    fn empty_input_verifies_as_zero() {
        assert_eq!(verify_text("").unwrap(), ChainSummary::empty());
        assert_eq!(verify_text("\n  \n").unwrap(), ChainSummary::empty());
    }

    #[test]
    fn blank_lines_do_not_shift_indices() {
        let text = chain_text(2).replace('\n', "\n\n");
        assert_eq!(verify_text(&text).unwrap().verified, 2);
    }

    #[test]
    fn genesis_with_nonempty_prev_hash_is_broken() {
        let mut event = EvidenceEvent::new(&Actor::default(), "TEST", Decision::Allow);
        seal(&mut event, "feed".to_string());
        let text = format!("{}\n", encode_canonical(&event));

        let failure = verify_text(&text).unwrap_err();
        assert_eq!(failure.verified, 0);
        assert!(matches!(
            failure.error,
            EvidenceError::ChainBroken { index: 1, ref observed, ref expected }
                if observed == "feed" && expected.is_empty()
        ));
    }

    #[test]
    fn garbage_line_is_invalid_record() {
        let mut text = chain_text(2);
        text.push_str("{oops\n");
        let failure = verify_text(&text).unwrap_err();
        assert_eq!(failure.verified, 2);
        assert!(matches!(failure.error, EvidenceError::InvalidRecord { index: 3, .. }));
    }

    #[test]
    fn unterminated_partial_tail_is_truncated() {
        let mut text = chain_text(2);
        let third = chain_text(1);
        text.push_str(&third[..third.len() / 2]);

        let failure = verify_text(&text).unwrap_err();
        assert_eq!(failure.verified, 2);
        assert!(matches!(failure.error, EvidenceError::TruncatedTail { index: 3, .. }));
    }

    #[test]
    fn complete_but_unterminated_tail_still_verifies() {
        let text = chain_text(3);
        let trimmed = text.trim_end_matches('\n');
        assert_eq!(verify_text(trimmed).unwrap().verified, 3);
    }

    /// Adding an explicit null to a sealed record is a schema error rather
    /// than a silently accepted respelling.
    #[test]
    fn inserted_null_optional_is_invalid_record() {
        let text = chain_text(1);
        let edited = text.replacen(
            r#""decision":"ALLOW""#,
            r#""decision":"ALLOW","image_ref":null"#,
            1,
        );
        assert_ne!(edited, text);

        let failure = verify_text(&edited).unwrap_err();
        assert_eq!(failure.verified, 0);
        assert!(
            matches!(failure.error, EvidenceError::InvalidRecord { index: 1, .. }),
            "got {:?}",
            failure.error
        );
    }

    /// Whitespace between tokens is not part of the commitment.
    #[test]
    fn insignificant_whitespace_still_verifies() {
        let text = chain_text(2).replacen("\",\"", "\", \"", 1);
        assert_eq!(verify_text(&text).unwrap().verified, 2);
    }

    #[test]
    fn invalid_utf8_is_invalid_record() {
        let mut bytes = chain_text(1).into_bytes();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let failure = verify_reader(Cursor::new(bytes), "<test>").unwrap_err();
        assert!(matches!(failure.error, EvidenceError::InvalidRecord { index: 2, .. }));
    }
}
