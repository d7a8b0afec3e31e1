#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Rotating log file handles for testlog.
//!
//! File naming and retention are owned by `tracing-appender`; this crate only
//! translates age/interval/size parameters into an appender.

pub mod error;
pub mod rotate;

pub use error::RotateError;
pub use rotate::{rotating_writer, RotationPlan};
pub use tracing_appender::rolling::{RollingFileAppender, Rotation};
