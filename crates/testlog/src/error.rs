use std::path::PathBuf;
use thiserror::Error;

/// Core error type for testlog operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),

    #[error("Unknown log level {0:?}")]
    InvalidLevel(String),

    #[error(transparent)]
    Rotate(#[from] testlog_rotate::RotateError),
}
