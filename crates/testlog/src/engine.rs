use crate::encoder::{EncoderConfig, Entry};
use crate::level::Severity;
use chrono::Utc;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

/// Encoder, sink and level shared by every clone of a logger.
#[derive(Clone)]
pub struct Core {
    encoder: Arc<EncoderConfig>,
    sink: Arc<BoxMakeWriter>,
    error_output: Arc<BoxMakeWriter>,
    level: Severity,
}

impl Core {
    pub fn new(
        encoder: EncoderConfig,
        sink: BoxMakeWriter,
        error_output: BoxMakeWriter,
        level: Severity,
    ) -> Self {
        Self {
            encoder: Arc::new(encoder),
            sink: Arc::new(sink),
            error_output: Arc::new(error_output),
            level,
        }
    }

    #[must_use]
    pub fn enabled(&self, severity: Severity) -> bool {
        severity.enabled(self.level)
    }

    #[must_use]
    pub fn level(&self) -> Severity {
        self.level
    }

    #[must_use]
    pub fn encoder(&self) -> &EncoderConfig {
        &self.encoder
    }

    /// A copy of this core encoding entries with `encoder`.
    #[must_use]
    pub fn with_encoder(&self, encoder: EncoderConfig) -> Self {
        Self {
            encoder: Arc::new(encoder),
            ..self.clone()
        }
    }

    /// A copy of this core writing to `sink`.
    #[must_use]
    pub fn with_sink(&self, sink: BoxMakeWriter) -> Self {
        Self {
            sink: Arc::new(sink),
            ..self.clone()
        }
    }

    /// A copy of this core reporting internal errors to `error_output`.
    #[must_use]
    pub fn with_error_output(&self, error_output: BoxMakeWriter) -> Self {
        Self {
            error_output: Arc::new(error_output),
            ..self.clone()
        }
    }

    /// A copy of this core with a level no lower than `level`.
    #[must_use]
    pub fn with_min_level(&self, level: Severity) -> Self {
        Self {
            level: self.level.max(level),
            ..self.clone()
        }
    }

    /// Encode `entry` and write it to the sink in one call.
    ///
    /// Sink failures go to the error output; the caller never sees them.
    pub fn write(&self, entry: &Entry) {
        let line = self.encoder.encode(entry);
        let mut writer = self.sink.make_writer();
        if let Err(err) = writer.write_all(line.as_bytes()) {
            self.report_error(&err);
        }
    }

    /// Flush a writer from the sink.
    pub fn sync(&self) -> std::io::Result<()> {
        self.sink.make_writer().flush()
    }

    pub(crate) fn report_error(&self, err: &dyn fmt::Display) {
        let message = format!(
            "{} write error: {err}\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S%.6f %z")
        );
        // Nowhere left to report a failing error output.
        let _ = self.error_output.make_writer().write_all(message.as_bytes());
    }
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core")
            .field("encoder", &self.encoder)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("disk on fire"))
        }
    }

    fn make_core(sink: BoxMakeWriter, errors: &Buffer, level: Severity) -> Core {
        let errors = errors.clone();
        Core::new(
            EncoderConfig::file(),
            sink,
            BoxMakeWriter::new(move || errors.clone()),
            level,
        )
    }

    #[test]
    fn test_enabled() {
        let errors = Buffer::default();
        let core = make_core(BoxMakeWriter::new(io::sink), &errors, Severity::Warn);
        assert!(!core.enabled(Severity::Info));
        assert!(core.enabled(Severity::Warn));
        assert!(core.enabled(Severity::Fatal));
    }

    #[test]
    fn test_write_to_sink() {
        let out = Buffer::default();
        let errors = Buffer::default();
        let sink = out.clone();
        let core = make_core(BoxMakeWriter::new(move || sink.clone()), &errors, Severity::Debug);

        core.write(&Entry::new(Severity::Info, "hello"));
        assert!(out.contents().ends_with("\t[INFO]\thello\n"));
        assert_eq!(errors.contents(), "");
    }

    #[test]
    fn test_write_failure_goes_to_error_output() {
        let errors = Buffer::default();
        let core = make_core(BoxMakeWriter::new(|| Broken), &errors, Severity::Debug);

        core.write(&Entry::new(Severity::Info, "lost"));
        let reported = errors.contents();
        assert!(reported.ends_with(" write error: disk on fire\n"), "got {reported}");
        assert!(!reported.contains('\t'));
        assert!(core.sync().is_err());
    }

    #[test]
    fn test_write_error_time_is_utc() {
        let errors = Buffer::default();
        let core = make_core(BoxMakeWriter::new(|| Broken), &errors, Severity::Debug);

        core.write(&Entry::new(Severity::Info, "lost"));
        assert!(errors.contents().contains(" +0000 write error: "), "got {}", errors.contents());
    }

    #[test]
    fn test_with_encoder_changes_output() {
        let out = Buffer::default();
        let errors = Buffer::default();
        let sink = out.clone();
        let core = make_core(BoxMakeWriter::new(move || sink.clone()), &errors, Severity::Debug)
            .with_encoder(EncoderConfig::development());

        core.write(&Entry::new(Severity::Warn, "plain"));
        assert!(out.contents().ends_with("\tWARN\tplain\n"), "got {}", out.contents());
    }

    #[test]
    fn test_with_min_level_only_raises() {
        let errors = Buffer::default();
        let core = make_core(BoxMakeWriter::new(io::sink), &errors, Severity::Warn);
        assert_eq!(core.with_min_level(Severity::Error).level(), Severity::Error);
        assert_eq!(core.with_min_level(Severity::Debug).level(), Severity::Warn);
    }

    #[test]
    fn test_with_sink_keeps_error_output() {
        let errors = Buffer::default();
        let core = make_core(BoxMakeWriter::new(io::sink), &errors, Severity::Debug)
            .with_sink(BoxMakeWriter::new(|| Broken));

        core.write(&Entry::new(Severity::Error, "lost"));
        assert!(errors.contents().contains("write error"));
    }
}
