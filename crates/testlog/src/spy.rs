//! A capturing [`TestingT`] for asserting on what a logger wrote.

use crate::writer::{TestReporter, TestingT};
use regex_lite::Regex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Records every logged line, minus its timestamp column.
///
/// Lines are also forwarded to the libtest output, so a failing test still
/// shows what was logged.
#[derive(Debug, Default)]
pub struct LogSpy {
    out: TestReporter,
    failed: AtomicBool,
    messages: Mutex<Vec<String>>,
}

impl LogSpy {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        // A panicking assertion must not hide the messages from later ones.
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Snapshot of the captured messages, in logging order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Assert the captured messages equal `expected`, in order.
    ///
    /// # Panics
    /// Panics when they differ.
    #[track_caller]
    pub fn assert_messages(&self, expected: &[&str]) {
        assert_eq!(
            self.messages(),
            expected,
            "logged messages did not match"
        );
    }

    /// Assert message `index` matches the regular expression `pattern`.
    ///
    /// # Panics
    /// Panics when there is no such message, the pattern is invalid, or the
    /// message does not match.
    #[track_caller]
    pub fn assert_message_matches(&self, index: usize, pattern: &str) {
        let re = Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"));
        let messages = self.messages();
        let Some(message) = messages.get(index) else {
            panic!(
                "expected a message at index {index}, only {} logged",
                messages.len()
            );
        };
        assert!(
            re.is_match(message),
            "message {index} {message:?} does not match {pattern:?}"
        );
    }

    /// # Panics
    /// Panics if the test was marked failed.
    #[track_caller]
    pub fn assert_passed(&self) {
        assert!(!self.failed(), "expected test to pass");
    }

    /// # Panics
    /// Panics if the test was not marked failed.
    #[track_caller]
    pub fn assert_failed(&self) {
        assert!(self.failed(), "expected test to fail");
    }
}

impl TestingT for LogSpy {
    fn log(&self, line: &str) {
        // Lines start with a timestamp column, which tests cannot predict.
        let message = match line.find('\t') {
            Some(i) => &line[i + 1..],
            None => line,
        };
        self.lock().push(message.to_string());
        self.out.log(message);
    }

    fn fail(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }

    fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

/// A writer whose every write and flush fails with `failed`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailWriter;

impl io::Write for FailWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("failed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("failed"))
    }
}
