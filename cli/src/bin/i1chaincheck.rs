//! Verify the hash chain of an evidence log.
//!
//! Usage:
//!   i1chaincheck --file evidence/i1.jsonl

use clap::Parser;

use prufwerk_cli::{
    check::{self, CheckArgs},
    init_tracing,
};

fn main() {
    init_tracing();

    let args = CheckArgs::parse();

    match check::run(&args) {
        Ok(summary) => {
            println!("[I1 hash-chain] OK: {} event(s) verified", summary.verified);
            if !summary.terminal_hash.is_empty() {
                println!("[I1 hash-chain] terminal hash: {}", summary.terminal_hash);
            }
        }
        Err(failure) => {
            eprintln!("[I1 hash-chain] FAIL: {}", failure);
            std::process::exit(1);
        }
    }
}
