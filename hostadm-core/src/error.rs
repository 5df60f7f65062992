use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy for maintenance actions. Every variant aborts a single
/// menu action, never the session.
#[derive(Debug, Error)]
pub enum MaintError {
    #[error("this operation requires root privileges")]
    PermissionDenied,

    #[error("user '{0}' does not exist")]
    MissingUser(String),

    #[error("user '{0}' already exists")]
    UserExists(String),

    #[error("path '{}' does not exist", .0.display())]
    MissingPath(PathBuf),

    #[error("no process with PID {0}")]
    NoSuchProcess(u32),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{command} failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
