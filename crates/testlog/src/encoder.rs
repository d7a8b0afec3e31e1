//! Console encoding of log entries.
//!
//! One entry becomes one tab-separated line:
//!
//! ```text
//! 2026-10-19T13:03:01.000+0000	INFO	name	dir/file.rs:12	message	{"k": "v"}
//! ```
//!
//! The name, caller and field columns are left out when empty. A captured
//! stacktrace follows on the next lines.

use crate::field::Field;
use crate::level::Severity;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write;

/// Time layout used by [`EncoderConfig::development`].
pub const DEVELOPMENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Time layout used by [`EncoderConfig::file`].
pub const FILE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// How the severity column is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelFormat {
    /// `INFO`
    #[default]
    Capital,
    /// `[INFO]`
    Bracketed,
    /// `info`
    Lowercase,
}

impl LevelFormat {
    fn render(self, severity: Severity, out: &mut String) {
        match self {
            Self::Capital => out.push_str(severity.capital_str()),
            Self::Bracketed => {
                out.push('[');
                out.push_str(severity.capital_str());
                out.push(']');
            }
            Self::Lowercase => out.push_str(severity.as_str()),
        }
    }
}

/// Console encoder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// chrono `strftime` layout for the time column.
    pub time_format: String,
    pub level_format: LevelFormat,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl EncoderConfig {
    /// ISO8601 times with milliseconds and capital levels.
    #[must_use]
    pub fn development() -> Self {
        Self {
            time_format: DEVELOPMENT_TIME_FORMAT.to_string(),
            level_format: LevelFormat::Capital,
        }
    }

    /// Local times without offset and bracketed levels, for log files.
    #[must_use]
    pub fn file() -> Self {
        Self {
            time_format: FILE_TIME_FORMAT.to_string(),
            level_format: LevelFormat::Bracketed,
        }
    }

    #[must_use]
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    #[must_use]
    pub fn with_level_format(mut self, format: LevelFormat) -> Self {
        self.level_format = format;
        self
    }

    /// Render `time` with the configured layout, falling back to RFC 3339
    /// when the layout is invalid.
    pub(crate) fn render_time(&self, time: &DateTime<Local>, out: &mut String) {
        let start = out.len();
        if write!(out, "{}", time.format(&self.time_format)).is_err() {
            out.truncate(start);
            out.push_str(&time.to_rfc3339());
        }
    }

    /// Encode `entry` as one newline-terminated line.
    #[must_use]
    pub fn encode(&self, entry: &Entry) -> String {
        let mut line = String::with_capacity(128);

        self.render_time(&entry.time, &mut line);
        line.push('\t');
        self.level_format.render(entry.severity, &mut line);

        if let Some(name) = entry.name.as_deref().filter(|n| !n.is_empty()) {
            line.push('\t');
            line.push_str(name);
        }
        if let Some(caller) = &entry.caller {
            line.push('\t');
            caller.render_short(&mut line);
        }

        line.push('\t');
        line.push_str(&entry.message);

        if !entry.fields.is_empty() {
            line.push('\t');
            render_fields(&entry.fields, &mut line);
        }

        if let Some(stack) = &entry.stacktrace {
            line.push('\n');
            line.push_str(stack.trim_end_matches('\n'));
        }

        line.push('\n');
        line
    }
}

/// Source location of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    #[must_use]
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Caller of the current `#[track_caller]` chain.
    #[must_use]
    #[track_caller]
    pub fn here() -> Self {
        let location = std::panic::Location::caller();
        Self::new(location.file(), location.line())
    }

    /// The last two path components, e.g. `tests/logger.rs`.
    #[must_use]
    pub fn short_file(&self) -> &'static str {
        let file = self.file;
        let Some(last) = file.rfind(['/', '\\']) else {
            return file;
        };
        match file[..last].rfind(['/', '\\']) {
            Some(prev) => &file[prev + 1..],
            None => file,
        }
    }

    fn render_short(&self, out: &mut String) {
        let _ = write!(out, "{}:{}", self.short_file(), self.line);
    }
}

/// A fully assembled log entry, ready to encode.
#[derive(Debug, Clone)]
pub struct Entry {
    pub time: DateTime<Local>,
    pub severity: Severity,
    pub name: Option<String>,
    pub caller: Option<Caller>,
    pub message: String,
    pub fields: Vec<Field>,
    pub stacktrace: Option<String>,
}

impl Entry {
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            severity,
            name: None,
            caller: None,
            message: message.into(),
            fields: Vec::new(),
            stacktrace: None,
        }
    }
}

fn render_fields(fields: &[Field], out: &mut String) {
    out.push('{');
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}: {}", Value::from(field.key.as_str()), field.value);
    }
    out.push('}');
}
