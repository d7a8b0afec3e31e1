use serde::Serialize;
use serde_json::Value;

/// A structured key/value pair attached to a log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    #[must_use]
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    #[must_use]
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    #[must_use]
    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::from(value))
    }

    #[must_use]
    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, Value::from(value))
    }

    /// Non-finite floats have no JSON form and are stored as strings.
    #[must_use]
    pub fn float(key: impl Into<String>, value: f64) -> Self {
        let value = serde_json::Number::from_f64(value)
            .map_or_else(|| Value::String(value.to_string()), Value::Number);
        Self::new(key, value)
    }

    #[must_use]
    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    /// An error under the conventional `error` key.
    #[must_use]
    pub fn error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::string("error", err.to_string())
    }

    /// Any serializable value. Serialization failures are recorded in place
    /// of the value.
    #[must_use]
    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("<unserializable: {e}>")));
        Self::new(key, value)
    }
}
