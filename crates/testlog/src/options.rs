use crate::encoder::EncoderConfig;
use crate::field::Field;
use crate::level::Severity;
use std::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Options understood by [`Logger::with_options`](crate::Logger::with_options).
pub enum LogOption {
    /// Record the caller's file and line.
    AddCaller,
    WithCaller(bool),
    /// Append fields to every entry.
    Fields(Vec<Field>),
    /// Append a name segment; segments join with `.`.
    Named(String),
    /// Capture a stacktrace for entries at or above this severity.
    AddStacktrace(Severity),
    /// Where internal errors such as failed sink writes are reported.
    ErrorOutput(BoxMakeWriter),
    /// Replace the sink entries are written to.
    WrapSink(BoxMakeWriter),
    /// Raise the minimum level. Lowering it has no effect.
    IncreaseLevel(Severity),
    /// Replace the encoder entries are formatted with.
    Encoder(EncoderConfig),
}

impl fmt::Debug for LogOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddCaller => f.write_str("AddCaller"),
            Self::WithCaller(v) => f.debug_tuple("WithCaller").field(v).finish(),
            Self::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::AddStacktrace(level) => f.debug_tuple("AddStacktrace").field(level).finish(),
            Self::ErrorOutput(_) => f.write_str("ErrorOutput(..)"),
            Self::WrapSink(_) => f.write_str("WrapSink(..)"),
            Self::IncreaseLevel(level) => f.debug_tuple("IncreaseLevel").field(level).finish(),
            Self::Encoder(encoder) => f.debug_tuple("Encoder").field(encoder).finish(),
        }
    }
}

/// Configures the logger built by [`new_logger`](crate::new_logger).
///
/// ```
/// use testlog::{LogOption, LoggerOptions, Severity};
///
/// let opts = LoggerOptions::default()
///     .level(Severity::Warn)
///     .wrap_options([LogOption::AddCaller]);
/// assert_eq!(opts.min_level(), Severity::Warn);
/// ```
#[derive(Debug, Default)]
pub struct LoggerOptions {
    level: Severity,
    log_options: Vec<LogOption>,
}

impl LoggerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum severity the logger writes. Defaults to [`Severity::Debug`].
    #[must_use]
    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Logger options applied after the test defaults. Replaces any list set
    /// earlier.
    #[must_use]
    pub fn wrap_options(mut self, options: impl IntoIterator<Item = LogOption>) -> Self {
        self.log_options = options.into_iter().collect();
        self
    }

    #[must_use]
    pub fn min_level(&self) -> Severity {
        self.level
    }

    #[must_use]
    pub fn log_options(&self) -> &[LogOption] {
        &self.log_options
    }

    pub(crate) fn into_parts(self) -> (Severity, Vec<LogOption>) {
        (self.level, self.log_options)
    }
}
