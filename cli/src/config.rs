//! Optional TOML defaults for the evidence CLI tools.
//!
//! ```toml
//! log_path = "evidence/i1.jsonl"
//! event_type = "ADMISSION_DECISION"
//!
//! [actor]
//! actor_type = "system"
//! actor_id = "i1log-cli"
//! ```
//!
//! Every key is optional. Command-line flags win over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use prufwerk_contracts::{Actor, EvidenceError, EvidenceResult};

/// Defaults loaded from a TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Evidence log used when `--out` is not given.
    pub log_path: Option<PathBuf>,
    /// Event type used when `--event-type` is not given.
    pub event_type: Option<String>,
    #[serde(default)]
    pub actor: ActorConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorConfig {
    pub actor_type: Option<String>,
    pub actor_id: Option<String>,
}

impl CliConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `EvidenceError::ConfigError` if the TOML is malformed or has
    /// keys this config does not know.
    pub fn from_toml_str(s: &str) -> EvidenceResult<Self> {
        toml::from_str(s).map_err(|e| EvidenceError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    /// Read and parse the config file at `path`.
    pub fn from_file(path: &Path) -> EvidenceResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| EvidenceError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` if given, otherwise return the empty config.
    pub fn load(path: Option<&Path>) -> EvidenceResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// The actor to record, filling gaps from `Actor::default()`.
    pub fn actor(&self) -> Actor {
        let fallback = Actor::default();
        Actor::new(
            self.actor
                .actor_type
                .clone()
                .unwrap_or(fallback.actor_type),
            self.actor.actor_id.clone().unwrap_or(fallback.actor_id),
        )
    }
}
