// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by display lifecycle operations.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("display is already running")]
    AlreadyRunning,
    #[error("display is not running")]
    NotRunning,
    /// The server exited during the startup grace period. Its output is not
    /// captured, so there is nothing more specific to report.
    #[error("display has quit unexpectedly")]
    Crashed,
    #[error("display {display} is in use, please remove the lockfile at {}", .path.display())]
    DisplayInUse { display: u32, path: PathBuf },
    #[error("xephyr requires a running x server on display :{0}")]
    NoHostDisplay(u32),
    #[error("timeout of {0}s has been exceeded")]
    Timeout(u64),
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to signal process {pid}: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: nix::Error,
    },
    #[error("failed to wait for display process: {0}")]
    Wait(#[source] std::io::Error),
    #[error("failed to run readiness probe {program}: {source}")]
    Probe {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{name} not found in PATH: {source}")]
    MissingDependency {
        name: String,
        #[source]
        source: which::Error,
    },
}

pub type Result<T> = std::result::Result<T, DisplayError>;
