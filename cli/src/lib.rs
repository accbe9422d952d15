//! # prufwerk-cli
//!
//! Shared plumbing for the `i1log` and `i1chaincheck` binaries: argument
//! definitions, TOML defaults, and logging setup. The binaries are thin
//! wrappers that print results and map failures to exit status 1.

pub mod check;
pub mod config;
pub mod record;

use tracing_subscriber::EnvFilter;

/// Initialize structured logging on stderr. Set RUST_LOG=debug for verbose
/// output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

// ── Tests ─────────────────────────────────────────────────────────────────────
