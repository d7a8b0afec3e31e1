#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]

//! Structured logging for tests.
//!
//! [`new_logger`] builds a [`Logger`] whose output lands in a test report
//! instead of stdout, and [`LogSpy`] captures that output for assertions:
//!
//! ```
//! use testlog::{new_logger, LoggerOptions, LogSpy, Severity};
//!
//! let spy = LogSpy::new();
//! let logger = new_logger(spy.clone(), LoggerOptions::default().level(Severity::Info));
//!
//! logger.debug("starting work");
//! logger.info("received work order");
//!
//! spy.assert_messages(&["INFO\treceived work order"]);
//! spy.assert_passed();
//! ```
//!
//! Code that logs through `tracing` macros is routed the same way with
//! [`Logger::set_default`] or [`Logger::in_scope`].

pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod field;
pub mod file_logger;
pub mod layer;
pub mod level;
pub mod logger;
pub mod options;
pub mod spy;
pub mod writer;

pub use config::LoggerConfig;
pub use encoder::{Caller, EncoderConfig, Entry, LevelFormat};
pub use engine::Core;
pub use error::Error;
pub use field::Field;
pub use file_logger::{new_file_logger, FileLoggerConfig};
pub use layer::LoggerLayer;
pub use level::Severity;
pub use logger::{new_logger, Logger};
pub use options::{LogOption, LoggerOptions};
pub use spy::{FailWriter, LogSpy};
pub use writer::{TestReporter, TestingT, TestingWriter};

/// Type-erased writer factory accepted by [`LogOption::ErrorOutput`] and
/// [`LogOption::WrapSink`].
pub use tracing_subscriber::fmt::writer::BoxMakeWriter;
