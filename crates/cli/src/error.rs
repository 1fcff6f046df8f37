//! Failures surfaced by the `particle-systems` binary.
//!
//! | code | meaning |
//! |------|---------|
//! | 2    | argument parsing (clap exits before `run`) |
//! | 10   | simulation: bad config, unknown scenario, failed tick |
//! | 11   | filesystem: config unreadable, frames unwritable |
//! | 12   | arguments clap accepts but `render` cannot use |
//! | 13   | JSON encoding of a summary |

use particle_systems_core::EngineError;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(EngineError),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Input(String),

    #[error("json: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Filesystem failure on `path`.
    pub fn io(path: &Path, err: impl Display) -> Self {
        CliError::Io(format!("{}: {err}", path.display()))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

/// Output failures inside the engines crate keep their filesystem exit code.
impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            other => CliError::Engine(other),
        }
    }
}
