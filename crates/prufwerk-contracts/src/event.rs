//! Evidence event and actor types.
//!
//! `EvidenceEvent` is a single line in a hash-chained evidence log. Its
//! canonical byte encoding lives in `prufwerk-evidence::codec`; this crate
//! only defines the shape and the parse-side schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Who or what produced an evidence event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Coarse category, e.g. "system" or "operator".
    pub actor_type: String,
    /// Concrete identity within the category, e.g. a CLI tool name.
    pub actor_id: String,
}

impl Actor {
    pub fn new(actor_type: impl Into<String>, actor_id: impl Into<String>) -> Self {
        Self {
            actor_type: actor_type.into(),
            actor_id: actor_id.into(),
        }
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new("system", "i1log-cli")
    }
}

/// One record in an evidence log.
///
/// `prev_hash` links to the previous record (empty for the first one) and
/// `hash` commits to every other field. Both are filled in by the appender;
/// a freshly built event has them empty.
///
/// Unknown keys are rejected on parse: a field the encoder does not know
/// about would be silently dropped from the recomputed commitment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvidenceEvent {
    /// UUID v4, generated when the event is created.
    pub event_id: String,

    /// Creation instant (UTC).
    #[serde(rename = "timestamp_utc")]
    pub timestamp: DateTime<Utc>,

    pub actor_type: String,
    pub actor_id: String,

    /// Short classification tag, e.g. `ADMISSION_DECISION`.
    pub event_type: String,

    /// Outcome value. Validated by the caller, not by the log.
    pub decision: String,

    #[serde(default, deserialize_with = "present_string")]
    pub correlation_id: Option<String>,
    #[serde(default, deserialize_with = "present_string")]
    pub image_ref: Option<String>,
    #[serde(default, deserialize_with = "present_string")]
    pub demo_step: Option<String>,

    /// Hash of the preceding record, or empty for the first record.
    #[serde(default)]
    pub prev_hash: String,

    /// SHA-256 (hex) of this record's canonical encoding without `hash`.
    #[serde(default)]
    pub hash: String,
}

impl EvidenceEvent {
    /// Conventional event type for admission-control outcomes.
    pub const ADMISSION_DECISION: &'static str = "ADMISSION_DECISION";

    /// Build a new, unchained event with a fresh id and the current time.
    pub fn new(actor: &Actor, event_type: impl Into<String>, decision: impl Into<String>) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            actor_type: actor.actor_type.clone(),
            actor_id: actor.actor_id.clone(),
            event_type: event_type.into(),
            decision: decision.into(),
            correlation_id: None,
            image_ref: None,
            demo_step: None,
            prev_hash: String::new(),
            hash: String::new(),
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = non_empty(id.into());
        self
    }

    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = non_empty(image_ref.into());
        self
    }

    pub fn with_demo_step(mut self, step: impl Into<String>) -> Self {
        self.demo_step = non_empty(step.into());
        self
    }

    /// True for the first record of a log.
    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_empty()
    }
}

/// Optional fields are absent or a string; an explicit `null` is a schema
/// error because the encoder never writes one.
fn present_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
