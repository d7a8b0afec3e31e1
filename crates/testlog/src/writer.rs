//! Writer adapter relaying formatted log lines into a test report.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// The subset of a test handle a logger needs.
///
/// Implementations are shared between threads, so every method takes `&self`.
pub trait TestingT: Send + Sync {
    /// Record one line of test output.
    fn log(&self, line: &str);

    /// Mark the test as failed without stopping it.
    fn fail(&self);

    fn failed(&self) -> bool;
}

/// `TestingT` backed by the libtest harness.
///
/// Lines go through `println!`, which libtest captures and only shows for
/// failing tests or under `--nocapture`. A reporter that was marked failed
/// panics when dropped, failing the test that owns it.
#[derive(Debug, Default)]
pub struct TestReporter {
    failed: AtomicBool,
}

impl TestReporter {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl TestingT for TestReporter {
    fn log(&self, line: &str) {
        println!("{line}");
    }

    fn fail(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }

    fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.failed() && !std::thread::panicking() {
            panic!("test marked as failed by its logger");
        }
    }
}

/// An [`io::Write`] that relays each write to a [`TestingT`] as one line.
#[derive(Clone)]
pub struct TestingWriter {
    t: Arc<dyn TestingT>,
    // Fail the test on every write.
    mark_failed: bool,
}

impl TestingWriter {
    pub fn new(t: Arc<dyn TestingT>) -> Self {
        Self {
            t,
            mark_failed: false,
        }
    }

    /// A copy of this writer with `mark_failed` set to `v`.
    #[must_use]
    pub fn with_mark_failed(&self, v: bool) -> Self {
        Self {
            t: Arc::clone(&self.t),
            mark_failed: v,
        }
    }

    #[must_use]
    pub fn marks_failed(&self) -> bool {
        self.mark_failed
    }
}

impl std::fmt::Debug for TestingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestingWriter")
            .field("mark_failed", &self.mark_failed)
            .finish_non_exhaustive()
    }
}

impl io::Write for TestingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len();

        // The report adds its own line ending.
        let mut end = n;
        while end > 0 && buf[end - 1] == b'\n' {
            end -= 1;
        }

        self.t.log(&String::from_utf8_lossy(&buf[..end]));
        if self.mark_failed {
            self.t.fail();
        }

        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for TestingWriter {
    type Writer = TestingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
