//! # prufwerk-contracts
//!
//! Shared types and error contracts for the PRUFWERK evidence log.
//!
//! Every crate in the workspace imports from here. No I/O lives in this
//! crate, only the event schema, the decision enum, and the error types.

pub mod decision;
pub mod error;
pub mod event;

pub use decision::Decision;
pub use error::{EvidenceError, EvidenceResult, VerifyFailure};
pub use event::{Actor, EvidenceEvent};

#[cfg(test)]
mod tests {
    use super::*;

    // ── Decision ─────────────────────────────────────────────────────────────

    #[test]
    fn decision_parses_case_insensitively() {
        assert_eq!("ALLOW".parse::<Decision>().unwrap(), Decision::Allow);
        assert_eq!("deny".parse::<Decision>().unwrap(), Decision::Deny);
        assert_eq!(" Allow ".parse::<Decision>().unwrap(), Decision::Allow);
    }

    #[test]
    fn decision_rejects_unknown_values() {
        let err = "MAYBE".parse::<Decision>().unwrap_err();
        assert_eq!(
            err,
            EvidenceError::InvalidDecision {
                value: "MAYBE".to_string()
            }
        );
        assert!(err.to_string().contains("MAYBE"));
    }

    #[test]
    fn decision_displays_uppercase() {
        assert_eq!(Decision::Allow.to_string(), "ALLOW");
        assert_eq!(String::from(Decision::Deny), "DENY");
        assert_eq!(serde_json::to_string(&Decision::Deny).unwrap(), "\"DENY\"");
    }

    // ── EvidenceEvent ────────────────────────────────────────────────────────

    #[test]
    fn new_event_is_unchained_with_fresh_id() {
        let actor = Actor::default();
        let a = EvidenceEvent::new(&actor, EvidenceEvent::ADMISSION_DECISION, Decision::Allow);
        let b = EvidenceEvent::new(&actor, EvidenceEvent::ADMISSION_DECISION, Decision::Allow);

        assert_ne!(a.event_id, b.event_id);
        assert!(uuid::Uuid::parse_str(&a.event_id).is_ok());
        assert!(a.is_genesis());
        assert!(a.hash.is_empty());
        assert_eq!(a.actor_type, "system");
        assert_eq!(a.actor_id, "i1log-cli");
        assert_eq!(a.decision, "ALLOW");
    }

    #[test]
    fn builders_drop_empty_optionals() {
        let event = EvidenceEvent::new(&Actor::default(), "X", "DENY")
            .with_correlation_id("")
            .with_image_ref("repo/img:tag")
            .with_demo_step("");

        assert_eq!(event.correlation_id, None);
        assert_eq!(event.image_ref.as_deref(), Some("repo/img:tag"));
        assert_eq!(event.demo_step, None);
    }

    #[test]
    fn event_parse_defaults_missing_chain_fields() {
        let line = r#"{"event_id":"e1","timestamp_utc":"2025-01-02T03:04:05.5Z","actor_type":"system","actor_id":"t","event_type":"ADMISSION_DECISION","decision":"ALLOW"}"#;
        let event: EvidenceEvent = serde_json::from_str(line).unwrap();

        assert_eq!(event.prev_hash, "");
        assert_eq!(event.hash, "");
        assert_eq!(event.image_ref, None);
        assert_eq!(event.timestamp.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn event_parse_rejects_unknown_fields() {
        let line = r#"{"event_id":"e1","timestamp_utc":"2025-01-02T03:04:05Z","actor_type":"system","actor_id":"t","event_type":"E","decision":"ALLOW","extra":"x"}"#;
        assert!(serde_json::from_str::<EvidenceEvent>(line).is_err());
    }

    #[test]
    fn event_parse_rejects_explicit_null_optional() {
        let line = r#"{"event_id":"e1","timestamp_utc":"2025-01-02T03:04:05Z","actor_type":"system","actor_id":"t","event_type":"E","decision":"ALLOW","image_ref":null}"#;
        let err = serde_json::from_str::<EvidenceEvent>(line).unwrap_err();
        assert!(err.to_string().contains("null"), "got: {err}");
    }

    // ── Error display ────────────────────────────────────────────────────────

    #[test]
    fn chain_broken_display_names_both_hashes() {
        let err = EvidenceError::ChainBroken {
            index: 3,
            observed: "aa".to_string(),
            expected: "bb".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("\"aa\""));
        assert!(msg.contains("\"bb\""));
        assert_eq!(err.index(), Some(3));
    }

    #[test]
    fn verify_failure_reports_count_and_index() {
        let failure = VerifyFailure::new(
            1,
            EvidenceError::ContentTampered {
                index: 2,
                stored: "x".to_string(),
                recomputed: "y".to_string(),
            },
        );
        assert_eq!(failure.index(), Some(2));
        assert!(failure.to_string().contains("1 event(s) verified"));
        assert!(std::error::Error::source(&failure).is_some());
    }

    #[test]
    fn append_errors_have_no_index() {
        let err = EvidenceError::AppendIo {
            path: "/tmp/x".to_string(),
            reason: "disk full".to_string(),
        };
        assert_eq!(err.index(), None);
        assert!(err.to_string().contains("disk full"));
    }
}
