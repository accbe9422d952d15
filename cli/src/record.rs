//! `i1log`: append one admission decision to an evidence log.

use std::path::PathBuf;

use clap::Parser;

use prufwerk_contracts::{Actor, Decision, EvidenceError, EvidenceEvent, EvidenceResult};
use prufwerk_evidence::{EvidenceWriter, JsonlEvidenceLog};

use crate::config::CliConfig;

/// Append a hash-chained admission decision event to a JSONL evidence file.
#[derive(Debug, Parser)]
#[command(name = "i1log", about = "Append an admission decision to an evidence log")]
pub struct RecordArgs {
    /// Path to the evidence JSONL file (falls back to `log_path` in the config).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Decision outcome: ALLOW or DENY.
    #[arg(long)]
    pub decision: Decision,

    /// Container image reference, e.g. docker.io/org/app:latest.
    #[arg(long = "image-ref", alias = "image_ref")]
    pub image_ref: String,

    /// Demo step label, e.g. C6_SIGNED_PATH.
    #[arg(long = "demo-step", alias = "demo_step")]
    pub demo_step: String,

    /// Correlation id for this run.
    #[arg(long = "correlation-id", alias = "correlation_id")]
    pub correlation_id: Option<String>,

    /// Event type tag [default: ADMISSION_DECISION].
    #[arg(long = "event-type")]
    pub event_type: Option<String>,

    /// Actor type [default: system].
    #[arg(long = "actor-type")]
    pub actor_type: Option<String>,

    /// Actor id [default: i1log-cli].
    #[arg(long = "actor-id")]
    pub actor_id: Option<String>,

    /// Optional TOML file with defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A fully resolved append request.
#[derive(Debug)]
pub struct Recorded {
    pub path: PathBuf,
    pub event: EvidenceEvent,
}

/// Validate `args`, merge in `config`, and append exactly one event.
pub fn run(args: RecordArgs, config: &CliConfig) -> EvidenceResult<Recorded> {
    let path = args
        .out
        .or_else(|| config.log_path.clone())
        .ok_or_else(|| missing("--out <evidence-file-path>"))?;
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(missing("--out <evidence-file-path>"));
    }
    if args.image_ref.trim().is_empty() {
        return Err(missing("--image-ref"));
    }
    if args.demo_step.trim().is_empty() {
        return Err(missing("--demo-step"));
    }

    let defaults = config.actor();
    let actor = Actor::new(
        args.actor_type.unwrap_or(defaults.actor_type),
        args.actor_id.unwrap_or(defaults.actor_id),
    );
    let event_type = args
        .event_type
        .or_else(|| config.event_type.clone())
        .unwrap_or_else(|| EvidenceEvent::ADMISSION_DECISION.to_string());

    let event = EvidenceEvent::new(&actor, event_type, args.decision)
        .with_correlation_id(args.correlation_id.unwrap_or_default())
        .with_image_ref(args.image_ref)
        .with_demo_step(args.demo_step);

    let event = JsonlEvidenceLog::new(&path).append(event)?;
    Ok(Recorded { path, event })
}

fn missing(flag: &str) -> EvidenceError {
    EvidenceError::MissingArgument {
        flag: flag.to_string(),
    }
}
