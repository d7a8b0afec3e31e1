use crate::encoder::{Caller, EncoderConfig, Entry};
use crate::engine::Core;
use crate::field::Field;
use crate::layer::LoggerLayer;
use crate::level::Severity;
use crate::options::{LogOption, LoggerOptions};
use crate::writer::{TestingT, TestingWriter};
use std::backtrace::Backtrace;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;

/// Build a logger that writes every entry to `t`.
///
/// Entries at [`Severity::Debug`] and above are written unless
/// [`LoggerOptions::level`] says otherwise. Internal errors, such as a sink
/// that fails to write, are reported to `t` as well and fail the test.
///
/// ```
/// use testlog::{new_logger, LoggerOptions, Severity, TestReporter};
///
/// let logger = new_logger(TestReporter::new(), LoggerOptions::default().level(Severity::Info));
/// logger.debug("not written");
/// logger.info("written to the test output");
/// ```
pub fn new_logger(t: Arc<dyn TestingT>, opts: LoggerOptions) -> Logger {
    let (level, options) = opts.into_parts();
    let writer = TestingWriter::new(t);

    let core = Core::new(
        EncoderConfig::development(),
        BoxMakeWriter::new(writer.clone()),
        BoxMakeWriter::new(writer.with_mark_failed(true)),
        level,
    );

    Logger::new(core).with_options(options)
}

/// Structured logger writing through a [`Core`].
///
/// Clones share the core; child loggers made with [`Logger::with`],
/// [`Logger::named`] or [`Logger::with_options`] leave the parent untouched.
#[derive(Debug, Clone)]
pub struct Logger {
    core: Core,
    name: Option<String>,
    fields: Vec<Field>,
    add_caller: bool,
    stacktrace_level: Option<Severity>,
}

impl Logger {
    #[must_use]
    pub fn new(core: Core) -> Self {
        Self {
            core,
            name: None,
            fields: Vec::new(),
            add_caller: false,
            stacktrace_level: None,
        }
    }

    #[must_use]
    pub fn core(&self) -> &Core {
        &self.core
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn enabled(&self, severity: Severity) -> bool {
        self.core.enabled(severity)
    }

    /// A copy of this logger with `options` applied in order.
    #[must_use]
    pub fn with_options(&self, options: impl IntoIterator<Item = LogOption>) -> Self {
        let mut logger = self.clone();
        for option in options {
            logger.apply(option);
        }
        logger
    }

    fn apply(&mut self, option: LogOption) {
        match option {
            LogOption::AddCaller => self.add_caller = true,
            LogOption::WithCaller(v) => self.add_caller = v,
            LogOption::Fields(fields) => self.fields.extend(fields),
            LogOption::Named(name) => self.push_name(&name),
            LogOption::AddStacktrace(level) => self.stacktrace_level = Some(level),
            LogOption::ErrorOutput(w) => self.core = self.core.with_error_output(w),
            LogOption::WrapSink(w) => self.core = self.core.with_sink(w),
            LogOption::IncreaseLevel(level) => self.core = self.core.with_min_level(level),
            LogOption::Encoder(encoder) => self.core = self.core.with_encoder(encoder),
        }
    }

    fn push_name(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        self.name = Some(match self.name.take() {
            Some(parent) => format!("{parent}.{name}"),
            None => name.to_string(),
        });
    }

    /// A child logger whose entries carry `fields` after this logger's own.
    #[must_use]
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        let mut logger = self.clone();
        logger.fields.extend(fields);
        logger
    }

    /// A child logger with `name` appended to this logger's name.
    #[must_use]
    pub fn named(&self, name: &str) -> Self {
        let mut logger = self.clone();
        logger.push_name(name);
        logger
    }

    /// Write an entry at `severity`.
    ///
    /// `Panic` entries panic with `msg` once written, `Fatal` entries exit
    /// the process with status 1.
    #[track_caller]
    pub fn log(&self, severity: Severity, msg: &str, fields: &[Field]) {
        self.emit(severity, msg.to_string(), fields.to_vec(), Some(Caller::here()));
        match severity {
            Severity::Panic => panic!("{msg}"),
            Severity::Fatal => std::process::exit(1),
            _ => {}
        }
    }

    #[track_caller]
    pub fn debug(&self, msg: &str) {
        self.log(Severity::Debug, msg, &[]);
    }

    #[track_caller]
    pub fn info(&self, msg: &str) {
        self.log(Severity::Info, msg, &[]);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str) {
        self.log(Severity::Warn, msg, &[]);
    }

    #[track_caller]
    pub fn error(&self, msg: &str) {
        self.log(Severity::Error, msg, &[]);
    }

    /// Write a `Panic` entry, then panic with `msg`.
    #[track_caller]
    pub fn panic(&self, msg: &str) -> ! {
        self.emit(Severity::Panic, msg.to_string(), Vec::new(), Some(Caller::here()));
        panic!("{msg}")
    }

    /// Write a `Fatal` entry, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str) -> ! {
        self.emit(Severity::Fatal, msg.to_string(), Vec::new(), Some(Caller::here()));
        std::process::exit(1)
    }

    /// Flush the sink.
    ///
    /// # Errors
    /// Returns the sink's flush error.
    pub fn sync(&self) -> std::io::Result<()> {
        self.core.sync()
    }

    pub(crate) fn emit(
        &self,
        severity: Severity,
        message: String,
        fields: Vec<Field>,
        caller: Option<Caller>,
    ) {
        if !self.core.enabled(severity) {
            return;
        }

        let mut entry = Entry::new(severity, message);
        entry.name.clone_from(&self.name);
        if self.add_caller {
            entry.caller = caller;
        }
        entry.fields = self.fields.iter().cloned().chain(fields).collect();
        if self.stacktrace_level.is_some_and(|level| severity >= level) {
            entry.stacktrace = Some(Backtrace::force_capture().to_string());
        }

        self.core.write(&entry);
    }

    /// A `tracing` layer feeding events into this logger.
    #[must_use]
    pub fn layer(&self) -> LoggerLayer {
        LoggerLayer::new(self.clone())
    }

    /// Route `tracing` events on the current thread into this logger until
    /// the guard is dropped.
    #[must_use = "events are only routed while the guard is alive"]
    pub fn set_default(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.layer()))
    }

    /// Run `f` with `tracing` events routed into this logger.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::subscriber::with_default(tracing_subscriber::registry().with(self.layer()), f)
    }
}
