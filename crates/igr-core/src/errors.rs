use std::path::PathBuf;

/// Core error type for the relay.
///
/// Adapter crates map their specific errors into this type so the relay can
/// turn any failure into a user-facing reply instead of a process fault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("remote operation failed: {0}")]
    Remote(String),

    #[error("local file missing: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("malformed direct message: {0}")]
    DirectMessageFormat(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
