//! Append one admission decision to an evidence log.
//!
//! Usage:
//!   i1log --out evidence/i1.jsonl --decision ALLOW \
//!         --image-ref docker.io/org/app:latest --demo-step C6_SIGNED_PATH

use clap::Parser;

use prufwerk_cli::{
    config::CliConfig,
    init_tracing,
    record::{self, RecordArgs},
};

fn main() {
    init_tracing();

    let args = RecordArgs::parse();
    let decision = args.decision;
    let image_ref = args.image_ref.clone();
    let demo_step = args.demo_step.clone();
    let correlation_id = args.correlation_id.clone().unwrap_or_default();

    let result =
        CliConfig::load(args.config.as_deref()).and_then(|config| record::run(args, &config));

    match result {
        Ok(recorded) => {
            println!(
                "[I1] Appended event: decision={} image={} step={} correlation_id={} -> {}",
                decision,
                image_ref,
                demo_step,
                correlation_id,
                recorded.path.display()
            );
            println!("[I1] hash={}", recorded.event.hash);
        }
        Err(e) => {
            eprintln!("append admission decision evidence: {}", e);
            std::process::exit(1);
        }
    }
}
