use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log severity, ordered from least to most important.
///
/// `Panic` entries raise a panic once written and `Fatal` entries exit the
/// process.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
    Panic,
    Fatal,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Panic,
        Self::Fatal,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Panic => "panic",
            Self::Fatal => "fatal",
        }
    }

    #[must_use]
    pub fn capital_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Panic => "PANIC",
            Self::Fatal => "FATAL",
        }
    }

    /// Whether an entry at this severity passes a `min` threshold.
    #[must_use]
    pub fn enabled(self, min: Severity) -> bool {
        self >= min
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.capital_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "panic" => Ok(Self::Panic),
            "fatal" => Ok(Self::Fatal),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

impl From<&tracing::Level> for Severity {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        for pair in Severity::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_enabled() {
        assert!(Severity::Warn.enabled(Severity::Warn));
        assert!(Severity::Panic.enabled(Severity::Warn));
        assert!(!Severity::Info.enabled(Severity::Warn));
    }

    #[test]
    fn test_parse() {
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("WARNING".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!(" Fatal ".parse::<Severity>().unwrap(), Severity::Fatal);
        assert!(matches!(
            "verbose".parse::<Severity>(),
            Err(Error::InvalidLevel(s)) if s == "verbose"
        ));
    }

    #[test]
    fn test_names_round_trip() {
        for level in Severity::ALL {
            assert_eq!(level.as_str().parse::<Severity>().unwrap(), level);
            assert_eq!(level.to_string(), level.as_str().to_uppercase());
        }
    }

    #[test]
    fn test_from_tracing_level() {
        assert_eq!(Severity::from(&tracing::Level::TRACE), Severity::Debug);
        assert_eq!(Severity::from(&tracing::Level::WARN), Severity::Warn);
        assert_eq!(Severity::from(&tracing::Level::ERROR), Severity::Error);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Severity::Panic).unwrap();
        assert_eq!(json, "\"panic\"");
        let level: Severity = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(level, Severity::Info);
    }
}
