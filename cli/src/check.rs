//! `i1chaincheck`: replay and verify an evidence log.

use std::path::PathBuf;

use clap::Parser;

use prufwerk_contracts::VerifyFailure;
use prufwerk_evidence::{verify_summary, ChainSummary};

/// Verify the hash chain of a JSONL evidence file.
#[derive(Debug, Parser)]
#[command(name = "i1chaincheck", about = "Verify the hash chain of an evidence log")]
pub struct CheckArgs {
    /// Path to the evidence JSONL file.
    #[arg(long)]
    pub file: PathBuf,
}

pub fn run(args: &CheckArgs) -> Result<ChainSummary, VerifyFailure> {
    verify_summary(&args.file)
}
