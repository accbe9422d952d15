//! Canonical line encoding for evidence events.
//!
//! The content commitment is computed over these bytes, so the encoding is
//! spelled out by hand instead of being left to a serializer:
//!
//!   event_id, timestamp_utc, actor_type, actor_id, event_type, decision,
//!   correlation_id?, image_ref?, demo_step?, prev_hash?, hash?
//!
//! Fields marked `?` are omitted when absent or empty. Timestamps are
//! RFC 3339 in UTC with trailing zeros trimmed from the fraction. Strings are
//! escaped HTML-safe (`<`, `>`, `&`, U+2028 and U+2029 as `\uXXXX`).
//!
//! The commitment binds logical field values, not raw line bytes. Parsing
//! goes through serde, so a line that differs from the canonical one only in
//! whitespace or key order decodes to the same event and verifies. An
//! explicit `null` for an optional field is rejected, since the encoder only
//! ever omits it.

use chrono::{DateTime, Utc};

use prufwerk_contracts::{EvidenceError, EvidenceEvent, EvidenceResult};

/// Encode `event` as one canonical JSON line, without the trailing newline.
pub fn encode_canonical(event: &EvidenceEvent) -> String {
    let mut out = String::with_capacity(320);
    out.push('{');

    push_field(&mut out, "event_id", &event.event_id, true);
    push_field(&mut out, "timestamp_utc", &format_timestamp(&event.timestamp), false);
    push_field(&mut out, "actor_type", &event.actor_type, false);
    push_field(&mut out, "actor_id", &event.actor_id, false);
    push_field(&mut out, "event_type", &event.event_type, false);
    push_field(&mut out, "decision", &event.decision, false);

    let optional = [
        ("correlation_id", event.correlation_id.as_deref()),
        ("image_ref", event.image_ref.as_deref()),
        ("demo_step", event.demo_step.as_deref()),
        ("prev_hash", Some(event.prev_hash.as_str())),
        ("hash", Some(event.hash.as_str())),
    ];
    for (key, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            push_field(&mut out, key, value, false);
        }
    }

    out.push('}');
    out
}

/// The bytes the content commitment is computed over: the canonical
/// encoding with `hash` left out.
pub fn encode_for_commitment(event: &EvidenceEvent) -> String {
    if event.hash.is_empty() {
        return encode_canonical(event);
    }
    let unsealed = EvidenceEvent {
        hash: String::new(),
        ..event.clone()
    };
    encode_canonical(&unsealed)
}

/// Parse one log line into an event.
///
/// Returns `MalformedRecord` for anything that is not a JSON object matching
/// the event schema, including unknown keys.
pub fn decode_line(line: &str) -> EvidenceResult<EvidenceEvent> {
    serde_json::from_str(line).map_err(|e| EvidenceError::MalformedRecord {
        reason: e.to_string(),
    })
}

/// Lines that are empty or whitespace-only are never records.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// RFC 3339 in UTC with the shortest exact fractional second.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    let mut out = ts.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = ts.timestamp_subsec_nanos();
    if nanos != 0 {
        let frac = format!("{:09}", nanos);
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out.push('Z');
    out
}

fn push_field(out: &mut String, key: &str, value: &str, first: bool) {
    if !first {
        out.push(',');
    }
    push_json_string(out, key);
    out.push(':');
    push_json_string(out, value);
}

fn push_json_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' | '>' | '&' | '\u{2028}' | '\u{2029}' => push_unicode_escape(out, c),
            c if (c as u32) < 0x20 => push_unicode_escape(out, c),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn push_unicode_escape(out: &mut String, c: char) {
    out.push_str(&format!("\\u{:04x}", c as u32));
}
