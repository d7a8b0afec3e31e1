use crate::encoder::EncoderConfig;
use crate::error::Error;
use crate::field::Field;
use crate::level::Severity;
use crate::options::{LogOption, LoggerOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable overriding the configured level.
pub const LEVEL_ENV: &str = "TESTLOG_LEVEL";

/// Logger settings that can be loaded from JSON.
///
/// ```json
/// {"level": "warn", "name": "svc", "add_caller": true, "fields": {"k1": "v1"}}
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: Severity,
    pub name: Option<String>,
    pub add_caller: bool,
    pub stacktrace_level: Option<Severity>,
    /// Fields attached to every entry, in key order.
    pub fields: BTreeMap<String, Value>,
    pub encoder: EncoderConfig,
}

impl LoggerConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::ConfigParse)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Apply `TESTLOG_LEVEL` if it is set.
    pub fn with_env_overrides(mut self) -> Result<Self, Error> {
        if let Ok(level) = std::env::var(LEVEL_ENV) {
            self.level = level.parse()?;
        }
        Ok(self)
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
    pub fn with_caller(mut self, add_caller: bool) -> Self {
        self.add_caller = add_caller;
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// The wrapped logger options this config describes.
    ///
    /// An encoder other than the development one becomes
    /// [`LogOption::Encoder`].
    #[must_use]
    pub fn log_options(&self) -> Vec<LogOption> {
        let mut options = Vec::new();
        if let Some(name) = &self.name {
            options.push(LogOption::Named(name.clone()));
        }
        if self.add_caller {
            options.push(LogOption::AddCaller);
        }
        if let Some(level) = self.stacktrace_level {
            options.push(LogOption::AddStacktrace(level));
        }
        if !self.fields.is_empty() {
            let fields = self
                .fields
                .iter()
                .map(|(k, v)| Field::new(k.clone(), v.clone()))
                .collect();
            options.push(LogOption::Fields(fields));
        }
        if self.encoder != EncoderConfig::development() {
            options.push(LogOption::Encoder(self.encoder.clone()));
        }
        options
    }

    #[must_use]
    pub fn into_options(self) -> LoggerOptions {
        LoggerOptions::new()
            .level(self.level)
            .wrap_options(self.log_options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::LevelFormat;
    use crate::new_logger;
    use crate::spy::LogSpy;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, Severity::Debug);
        assert!(!config.add_caller);
        assert!(config.log_options().is_empty());
        assert_eq!(config.encoder, EncoderConfig::development());
    }

    #[test]
    fn test_parse_partial_json() {
        let config = LoggerConfig::from_json_str(
            r#"{"level": "warn", "name": "svc", "fields": {"k1": "v1"}, "encoder": {"level_format": "bracketed"}}"#,
        )
        .unwrap();

        assert_eq!(config.level, Severity::Warn);
        assert_eq!(config.name.as_deref(), Some("svc"));
        assert_eq!(config.fields["k1"], Value::String("v1".into()));
        assert_eq!(config.encoder.level_format, LevelFormat::Bracketed);
        assert_eq!(config.encoder.time_format, EncoderConfig::development().time_format);
    }

    #[test]
    fn test_parse_error() {
        let err = LoggerConfig::from_json_str(r#"{"level": "loud"}"#).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.json");
        std::fs::write(&path, r#"{"add_caller": true, "stacktrace_level": "error"}"#).unwrap();

        let config = LoggerConfig::from_path(&path).unwrap();
        assert!(config.add_caller);
        assert_eq!(config.stacktrace_level, Some(Severity::Error));
        assert_eq!(config.log_options().len(), 2);
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = LoggerConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { path: p, .. } if p == path));
    }

    #[test]
    fn test_log_options_order() {
        let options = LoggerConfig::default()
            .with_name("svc")
            .with_caller(true)
            .with_field("b", Value::from(2))
            .with_field("a", Value::from(1))
            .log_options();

        assert!(matches!(&options[0], LogOption::Named(n) if n == "svc"));
        assert!(matches!(options[1], LogOption::AddCaller));
        let LogOption::Fields(fields) = &options[2] else {
            panic!("expected fields, got {:?}", options[2]);
        };
        let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_encoder_reaches_logger() {
        let spy = LogSpy::new();
        let config =
            LoggerConfig::from_json_str(r#"{"encoder": {"level_format": "bracketed"}}"#).unwrap();
        assert!(matches!(config.log_options().as_slice(), [LogOption::Encoder(_)]));

        new_logger(spy.clone(), config.into_options()).info("x");
        spy.assert_messages(&["[INFO]\tx"]);
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var(LEVEL_ENV, "error");
        let config = LoggerConfig::default().with_env_overrides();
        std::env::remove_var(LEVEL_ENV);

        assert_eq!(config.unwrap().level, Severity::Error);
    }

    #[test]
    #[serial]
    fn test_env_override_invalid() {
        std::env::set_var(LEVEL_ENV, "chatty");
        let result = LoggerConfig::default().with_env_overrides();
        std::env::remove_var(LEVEL_ENV);

        assert!(matches!(result, Err(Error::InvalidLevel(s)) if s == "chatty"));
    }

    #[test]
    #[serial]
    fn test_env_unset_keeps_level() {
        std::env::remove_var(LEVEL_ENV);
        let config = LoggerConfig::default()
            .with_level(Severity::Info)
            .with_env_overrides()
            .unwrap();
        assert_eq!(config.level, Severity::Info);
    }
}
