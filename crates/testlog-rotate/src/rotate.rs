use crate::error::RotateError;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// How a base filename and retention parameters map onto a rolling appender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPlan {
    /// Directory the rotated files live in.
    pub directory: PathBuf,
    /// File name prefix; the appender appends the date suffix.
    pub prefix: String,
    pub rotation: Rotation,
    /// Number of rotated files to keep, `None` keeps everything.
    pub max_files: Option<usize>,
}

impl RotationPlan {
    /// Plan rotation for `filename`.
    ///
    /// A zero interval never rotates. Intervals that are a multiple of a day
    /// rotate daily, everything else rotates hourly. Retention is expressed as
    /// a file count covering `max_age_days`.
    #[must_use]
    pub fn new(filename: &Path, max_age_days: u32, rotation_hours: u32) -> Self {
        let directory = match filename.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = filename
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (rotation, period_hours) = match rotation_hours {
            0 => (Rotation::NEVER, None),
            h if h % 24 == 0 => (Rotation::DAILY, Some(24u64)),
            _ => (Rotation::HOURLY, Some(1u64)),
        };

        let max_files = match period_hours {
            Some(period) if max_age_days > 0 => {
                let hours = u64::from(max_age_days) * 24;
                usize::try_from(hours.div_ceil(period)).ok()
            }
            _ => None,
        };

        Self {
            directory,
            prefix,
            rotation,
            max_files,
        }
    }

    /// Build the appender described by this plan.
    ///
    /// # Errors
    /// Returns the appender's initialization error unchanged.
    pub fn build(&self) -> Result<RollingFileAppender, RotateError> {
        let mut builder = RollingFileAppender::builder()
            .rotation(self.rotation.clone())
            .filename_prefix(self.prefix.clone());

        if let Some(max_files) = self.max_files {
            builder = builder.max_log_files(max_files);
        }

        Ok(builder.build(&self.directory)?)
    }
}

/// Open a rotating, write-capable handle for `filename`.
///
/// `max_size` is checked but not enforced: rotation is purely time based.
///
/// # Errors
/// Returns [`RotateError::InvalidSize`] for a negative `max_size`, or the
/// appender's own error if the directory or file cannot be set up.
pub fn rotating_writer(
    filename: impl AsRef<Path>,
    max_age_days: u32,
    rotation_hours: u32,
    max_size: i64,
) -> Result<RollingFileAppender, RotateError> {
    if max_size < 0 {
        return Err(RotateError::InvalidSize(max_size));
    }

    let plan = RotationPlan::new(filename.as_ref(), max_age_days, rotation_hours);
    debug!(
        directory = %plan.directory.display(),
        prefix = %plan.prefix,
        rotation = ?plan.rotation,
        max_files = ?plan.max_files,
        "opening rotating log file"
    );
    plan.build()
}
