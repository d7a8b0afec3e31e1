use thiserror::Error;

/// Errors returned when opening a rotating log file.
#[derive(Error, Debug)]
pub enum RotateError {
    #[error("invalid max size {0}: must not be negative")]
    InvalidSize(i64),

    #[error(transparent)]
    Init(#[from] tracing_appender::rolling::InitError),
}
