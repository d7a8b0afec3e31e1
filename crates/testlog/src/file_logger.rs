use crate::encoder::EncoderConfig;
use crate::engine::Core;
use crate::error::Error;
use crate::level::Severity;
use crate::logger::Logger;
use crate::options::LogOption;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Settings for a logger writing to rotated files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggerConfig {
    /// Base file name; rotated files get a date suffix.
    pub filename: PathBuf,
    pub max_age_days: u32,
    pub rotation_hours: u32,
    pub max_size: i64,
    pub level: Severity,
    pub name: Option<String>,
    pub add_caller: bool,
    pub stacktrace_level: Option<Severity>,
    pub encoder: EncoderConfig,
}

impl Default for FileLoggerConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::from("./log"),
            max_age_days: 10,
            rotation_hours: 1,
            max_size: 1000,
            level: Severity::Debug,
            name: None,
            add_caller: true,
            stacktrace_level: Some(Severity::Error),
            encoder: EncoderConfig::file(),
        }
    }
}

impl FileLoggerConfig {
    #[must_use]
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_retention(mut self, max_age_days: u32, rotation_hours: u32) -> Self {
        self.max_age_days = max_age_days;
        self.rotation_hours = rotation_hours;
        self
    }

    #[must_use]
    pub fn with_stacktrace_level(mut self, level: Option<Severity>) -> Self {
        self.stacktrace_level = level;
        self
    }
}

/// Build a logger writing to rotated files described by `config`.
///
/// Internal write errors are reported on stderr.
pub fn new_file_logger(config: &FileLoggerConfig) -> Result<Logger, Error> {
    let appender = testlog_rotate::rotating_writer(
        &config.filename,
        config.max_age_days,
        config.rotation_hours,
        config.max_size,
    )?;

    let core = Core::new(
        config.encoder.clone(),
        BoxMakeWriter::new(appender),
        BoxMakeWriter::new(std::io::stderr),
        config.level,
    );

    let mut options = vec![LogOption::WithCaller(config.add_caller)];
    if let Some(name) = &config.name {
        options.push(LogOption::Named(name.clone()));
    }
    if let Some(level) = config.stacktrace_level {
        options.push(LogOption::AddStacktrace(level));
    }

    debug!(
        filename = %config.filename.display(),
        level = %config.level,
        "built file logger"
    );
    Ok(Logger::new(core).with_options(options))
}
